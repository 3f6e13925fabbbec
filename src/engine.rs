use crate::error::{ConfigError, GenerationError, InvalidActionError, QuizError};
use crate::generator::{QuestionCache, QuizGenerator};
use crate::models::{Difficulty, Phase};
use crate::session::{AnswerOutcome, QuizSession, SessionMachine};
use crate::stats::StatsTracker;
use log::{debug, warn};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Generate {
        text: String,
        difficulty: Difficulty,
        question_count: usize,
    },
    Answer(char),
    Restart,
    Abandon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started { questions: usize },
    Answered(AnswerOutcome),
    Restarted,
    Abandoned,
}

/// Owns the session, the aggregate stats and the question cache, and applies
/// one action at a time to them.
pub struct QuizEngine {
    machine: SessionMachine,
    stats: StatsTracker,
    cache: QuestionCache,
    generator: Result<QuizGenerator, ConfigError>,
}

impl QuizEngine {
    pub fn new(generator: Result<QuizGenerator, ConfigError>, cache_failures: bool) -> Self {
        Self {
            machine: SessionMachine::new(),
            stats: StatsTracker::new(),
            cache: QuestionCache::new(cache_failures),
            generator,
        }
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.machine.session()
    }

    pub fn stats(&self) -> &StatsTracker {
        &self.stats
    }

    /// Why generation is unavailable, if it is.
    pub fn config_error(&self) -> Option<&ConfigError> {
        self.generator.as_ref().err()
    }

    pub fn is_cached(&self, text: &str, difficulty: Difficulty) -> bool {
        self.cache.contains(text, difficulty)
    }

    pub fn dispatch(&mut self, action: Action) -> Result<Transition, QuizError> {
        self.dispatch_at(action, Instant::now())
    }

    pub fn dispatch_at(&mut self, action: Action, now: Instant) -> Result<Transition, QuizError> {
        let result = match action {
            Action::Generate {
                text,
                difficulty,
                question_count,
            } => self.generate(&text, difficulty, question_count, now),
            Action::Answer(letter) => self
                .machine
                .answer(letter, now, &mut self.stats)
                .map(Transition::Answered)
                .map_err(QuizError::from),
            Action::Restart => self
                .machine
                .restart()
                .map(|_| Transition::Restarted)
                .map_err(QuizError::from),
            Action::Abandon => self
                .machine
                .abandon(now, &mut self.stats)
                .map(|_| Transition::Abandoned)
                .map_err(QuizError::from),
        };

        if let Err(QuizError::InvalidAction(e)) = &result {
            debug!("rejected action: {}", e);
        }
        result
    }

    fn generate(
        &mut self,
        text: &str,
        difficulty: Difficulty,
        question_count: usize,
        now: Instant,
    ) -> Result<Transition, QuizError> {
        let phase = self.machine.phase();
        if phase != Phase::Idle {
            return Err(InvalidActionError::WrongPhase {
                action: "generate a quiz",
                phase,
            }
            .into());
        }
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyInput.into());
        }
        if question_count == 0 {
            return Err(InvalidActionError::NoQuestionsRequested.into());
        }

        let generator = self.generator.as_ref().map_err(|e| QuizError::Config(e.clone()))?;
        let questions = self
            .cache
            .get_or_generate(text, difficulty, |text, difficulty| {
                generator.generate(text, difficulty)
            })
            .map_err(|e| {
                warn!("quiz generation failed: {}", e);
                e
            })?;

        let session = QuizSession::new(questions, difficulty, question_count, now)
            .ok_or(GenerationError::NoQuestions)?;
        let count = session.len();
        self.machine.start(session)?;
        Ok(Transition::Started { questions: count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::generator::client::fixtures::{ScriptedClient, SAMPLE_RESPONSE};
    use crate::generator::PromptBuilder;
    use crate::models::Letter;
    use serde_json::json;
    use std::rc::Rc;
    use std::time::Duration;

    fn engine_with(client: Rc<ScriptedClient>, cache_failures: bool) -> QuizEngine {
        let prompts = PromptBuilder::new(&GenerationConfig::default()).unwrap();
        QuizEngine::new(Ok(QuizGenerator::new(prompts, Box::new(client))), cache_failures)
    }

    fn generate(text: &str, difficulty: Difficulty, question_count: usize) -> Action {
        Action::Generate {
            text: text.to_string(),
            difficulty,
            question_count,
        }
    }

    fn five_questions() -> String {
        let items: Vec<_> = (0..5)
            .map(|i| {
                json!({
                    "mcq": format!("Question {}", i),
                    "options": {"a": "w", "b": "x", "c": "y", "d": "z"},
                    "correct": "b",
                })
            })
            .collect();
        json!({ "mcqs": items }).to_string()
    }

    #[test]
    fn test_generate_starts_session() {
        let client = Rc::new(ScriptedClient::replying(SAMPLE_RESPONSE));
        let mut engine = engine_with(client.clone(), true);

        let transition = engine
            .dispatch(generate("Photosynthesis uses sunlight", Difficulty::Easy, 3))
            .unwrap();

        assert_eq!(transition, Transition::Started { questions: 1 });
        assert_eq!(engine.phase(), Phase::InProgress);
        let session = engine.session().unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
        let q = session.current_question();
        assert_eq!(q.prompt, "Sample question 1");
        assert_eq!(q.option(Letter::B), "Choice 2");
        assert_eq!(q.correct, Letter::A);
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn test_question_count_limits_session() {
        let client = Rc::new(ScriptedClient::replying(&five_questions()));
        let mut engine = engine_with(client, true);
        engine.dispatch(generate("text", Difficulty::Hard, 2)).unwrap();
        assert_eq!(engine.session().unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_response_stays_idle() {
        let client = Rc::new(ScriptedClient::replying("Here is your quiz!"));
        let mut engine = engine_with(client.clone(), true);

        let err = engine
            .dispatch(generate("Photosynthesis uses sunlight", Difficulty::Easy, 3))
            .unwrap_err();
        assert!(matches!(err, QuizError::Generation(GenerationError::MalformedJson(_))));
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.session().is_none());

        // the failure is remembered; no second call for the same key
        let again = engine.dispatch(generate("Photosynthesis uses sunlight", Difficulty::Easy, 3));
        assert!(again.is_err());
        assert_eq!(client.calls(), 1);
        assert!(engine.is_cached("Photosynthesis uses sunlight", Difficulty::Easy));
    }

    #[test]
    fn test_failed_generation_retries_when_failures_not_cached() {
        let client = Rc::new(ScriptedClient::new(vec![
            Err(GenerationError::Service("timed out".to_string())),
            Ok(SAMPLE_RESPONSE.to_string()),
        ]));
        let mut engine = engine_with(client.clone(), false);

        assert!(engine.dispatch(generate("cells", Difficulty::Medium, 1)).is_err());
        assert_eq!(engine.phase(), Phase::Idle);
        engine.dispatch(generate("cells", Difficulty::Medium, 1)).unwrap();
        assert_eq!(engine.phase(), Phase::InProgress);
        assert_eq!(client.calls(), 2);
    }

    #[test]
    fn test_cached_generation_skips_service() {
        let client = Rc::new(ScriptedClient::replying(SAMPLE_RESPONSE));
        let mut engine = engine_with(client.clone(), true);

        engine.dispatch(generate("cells", Difficulty::Easy, 1)).unwrap();
        engine.dispatch(Action::Answer('a')).unwrap();
        engine.dispatch(Action::Restart).unwrap();
        engine.dispatch(generate("cells", Difficulty::Easy, 1)).unwrap();

        assert_eq!(client.calls(), 1);
        assert_eq!(engine.phase(), Phase::InProgress);
    }

    #[test]
    fn test_empty_text_never_reaches_service() {
        let client = Rc::new(ScriptedClient::replying(SAMPLE_RESPONSE));
        let mut engine = engine_with(client.clone(), true);

        let err = engine.dispatch(generate("  \n ", Difficulty::Easy, 3)).unwrap_err();
        assert_eq!(err, QuizError::Generation(GenerationError::EmptyInput));
        assert_eq!(client.calls(), 0);
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_zero_questions_requested_is_invalid() {
        let client = Rc::new(ScriptedClient::replying(SAMPLE_RESPONSE));
        let mut engine = engine_with(client.clone(), true);
        let err = engine.dispatch(generate("cells", Difficulty::Easy, 0)).unwrap_err();
        assert_eq!(err, QuizError::InvalidAction(InvalidActionError::NoQuestionsRequested));
        assert_eq!(client.calls(), 0);
    }

    #[test]
    fn test_missing_credential_disables_generation() {
        let mut engine = QuizEngine::new(
            Err(ConfigError::MissingCredential("GITHUB_TOKEN".to_string())),
            true,
        );
        assert!(engine.config_error().is_some());

        let err = engine.dispatch(generate("cells", Difficulty::Easy, 3)).unwrap_err();
        assert!(matches!(err, QuizError::Config(ConfigError::MissingCredential(_))));
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_generate_while_in_progress_is_rejected() {
        let client = Rc::new(ScriptedClient::replying(SAMPLE_RESPONSE));
        let mut engine = engine_with(client.clone(), true);
        engine.dispatch(generate("cells", Difficulty::Easy, 1)).unwrap();

        let err = engine.dispatch(generate("other text", Difficulty::Easy, 1)).unwrap_err();
        assert!(matches!(
            err,
            QuizError::InvalidAction(InvalidActionError::WrongPhase { phase: Phase::InProgress, .. })
        ));
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn test_single_question_scenario() {
        let client = Rc::new(ScriptedClient::replying(SAMPLE_RESPONSE));
        let mut engine = engine_with(client, true);
        let t0 = Instant::now();

        engine
            .dispatch_at(generate("Photosynthesis uses sunlight", Difficulty::Easy, 3), t0)
            .unwrap();
        let transition = engine
            .dispatch_at(Action::Answer('a'), t0 + Duration::from_millis(1500))
            .unwrap();

        match transition {
            Transition::Answered(outcome) => {
                assert!(outcome.was_correct);
                assert!(outcome.finished);
            }
            other => panic!("unexpected transition {:?}", other),
        }
        assert_eq!(engine.phase(), Phase::Results);
        assert_eq!(engine.session().unwrap().score(), 1);

        let s = engine.stats().stats();
        assert_eq!(s.correct_answered, 1);
        assert_eq!(s.current_streak, 1);
        assert!((s.average_time_per_question - 1.5).abs() < 1e-9);
        assert_eq!(s.difficulty_counts[&Difficulty::Easy], 1);
    }

    #[test]
    fn test_best_streak_non_decreasing_across_sessions() {
        let client = Rc::new(ScriptedClient::replying(&five_questions()));
        let mut engine = engine_with(client, true);
        let answers = ["bbxbbb", "bbbaa", "abbbb"];
        let mut best_seen = 0;

        for plan in answers {
            engine.dispatch(generate("streaks", Difficulty::Medium, 5)).unwrap();
            for c in plan.chars() {
                let result = engine.dispatch(Action::Answer(c));
                if c == 'x' {
                    assert!(result.is_err());
                    continue;
                }
                let s = engine.stats().stats();
                assert!(s.best_streak >= best_seen);
                assert!(s.best_streak >= s.current_streak);
                best_seen = s.best_streak;
            }
            engine.dispatch(Action::Restart).unwrap();
        }

        let s = engine.stats().stats();
        // the streak carries over from the first session into the second
        assert_eq!(s.best_streak, 8);
        assert_eq!(s.current_streak, 4);
        assert_eq!(s.total_answered, 15);
        assert_eq!(s.history.len(), 3);
        assert!((engine.stats().accuracy_percent() - 100.0 * 12.0 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_abandon_and_restart_phases() {
        let client = Rc::new(ScriptedClient::replying(&five_questions()));
        let mut engine = engine_with(client, true);

        assert!(engine.dispatch(Action::Abandon).is_err());
        engine.dispatch(generate("abandon me", Difficulty::Hard, 5)).unwrap();
        engine.dispatch(Action::Answer('b')).unwrap();
        assert!(engine.dispatch(Action::Restart).is_err());

        assert_eq!(engine.dispatch(Action::Abandon).unwrap(), Transition::Abandoned);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.stats().stats().total_answered, 1);
    }
}
