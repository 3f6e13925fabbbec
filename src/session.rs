use crate::error::InvalidActionError;
use crate::history::SessionSummary;
use crate::models::{Difficulty, Letter, Phase, Question};
use crate::stats::StatsTracker;
use log::{debug, info};
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    /// letters picked so far, one per answered question
    answers: Vec<Letter>,
    current_index: usize,
    score: usize,
    difficulty: Difficulty,
    started_at: Instant,
    question_started_at: Instant,
}

impl QuizSession {
    /// Keeps the first `question_count` questions. Returns `None` when that
    /// leaves nothing to ask.
    pub fn new(
        mut questions: Vec<Question>,
        difficulty: Difficulty,
        question_count: usize,
        now: Instant,
    ) -> Option<Self> {
        questions.truncate(question_count);
        if questions.is_empty() {
            return None;
        }
        Some(Self {
            questions,
            answers: Vec::new(),
            current_index: 0,
            score: 0,
            difficulty,
            started_at: now,
            question_started_at: now,
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[cfg(test)]
    pub fn answers(&self) -> &[Letter] {
        &self.answers
    }

    /// Each answered question paired with the letter picked for it.
    pub fn review(&self) -> impl Iterator<Item = (&Question, Letter)> + '_ {
        self.questions.iter().zip(self.answers.iter().copied())
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn question_started_at(&self) -> Instant {
        self.question_started_at
    }

    fn is_last(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    fn summary(&self, completed: bool, answered: usize, now: Instant) -> SessionSummary {
        SessionSummary::new(
            completed,
            self.difficulty,
            self.score,
            self.questions.len(),
            answered,
            now.saturating_duration_since(self.started_at),
        )
    }
}

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Idle,
    InProgress(QuizSession),
    Results(QuizSession),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub selected: Letter,
    pub correct: Letter,
    pub was_correct: bool,
    pub finished: bool,
}

/// Quiz lifecycle: Idle → InProgress → Results → Idle. A rejected action
/// leaves the state exactly as it was.
#[derive(Debug, Default)]
pub struct SessionMachine {
    state: SessionState,
}

impl SessionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            SessionState::Idle => Phase::Idle,
            SessionState::InProgress(_) => Phase::InProgress,
            SessionState::Results(_) => Phase::Results,
        }
    }

    pub fn session(&self) -> Option<&QuizSession> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::InProgress(session) | SessionState::Results(session) => Some(session),
        }
    }

    fn wrong_phase(&self, action: &'static str) -> InvalidActionError {
        InvalidActionError::WrongPhase {
            action,
            phase: self.phase(),
        }
    }

    pub fn start(&mut self, session: QuizSession) -> Result<(), InvalidActionError> {
        if !matches!(self.state, SessionState::Idle) {
            return Err(self.wrong_phase("start a quiz"));
        }
        info!(
            "session started: {} {} questions",
            session.len(),
            session.difficulty
        );
        self.state = SessionState::InProgress(session);
        Ok(())
    }

    pub fn answer(
        &mut self,
        selected: char,
        now: Instant,
        stats: &mut StatsTracker,
    ) -> Result<AnswerOutcome, InvalidActionError> {
        let phase = self.phase();
        let SessionState::InProgress(session) = &mut self.state else {
            return Err(InvalidActionError::WrongPhase {
                action: "answer",
                phase,
            });
        };
        let letter = Letter::from_char(selected).ok_or(InvalidActionError::UnknownLetter(selected))?;

        let elapsed = now
            .saturating_duration_since(session.question_started_at)
            .as_secs_f64();
        let question = &session.questions[session.current_index];
        let correct = question.correct;
        let was_correct = stats.record_answer(letter, question, elapsed, session.difficulty);
        if was_correct {
            session.score += 1;
        }
        session.answers.push(letter);

        let finished = session.is_last();
        debug!(
            "answered question {} with {} ({})",
            session.current_index + 1,
            letter,
            if was_correct { "correct" } else { "wrong" }
        );

        if finished {
            if let SessionState::InProgress(session) = std::mem::take(&mut self.state) {
                stats.record_session(session.summary(true, session.len(), now));
                info!("session finished: {}/{}", session.score, session.len());
                self.state = SessionState::Results(session);
            }
        } else {
            session.current_index += 1;
            session.question_started_at = now;
        }

        Ok(AnswerOutcome {
            selected: letter,
            correct,
            was_correct,
            finished,
        })
    }

    pub fn restart(&mut self) -> Result<(), InvalidActionError> {
        if !matches!(self.state, SessionState::Results(_)) {
            return Err(self.wrong_phase("restart"));
        }
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Drops an unfinished session. Answers already given stay in the stats.
    pub fn abandon(&mut self, now: Instant, stats: &mut StatsTracker) -> Result<(), InvalidActionError> {
        if !matches!(self.state, SessionState::InProgress(_)) {
            return Err(self.wrong_phase("abandon"));
        }
        if let SessionState::InProgress(session) = std::mem::take(&mut self.state) {
            info!(
                "session abandoned after {} of {} questions",
                session.current_index,
                session.len()
            );
            stats.record_session(session.summary(false, session.current_index, now));
        }
        Ok(())
    }
}
