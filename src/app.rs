use crate::config::Theme;
use crate::engine::{Action, QuizEngine, Transition};
use crate::error::QuizError;
use crate::models::{Difficulty, Letter, Phase};
use crate::session::AnswerOutcome;
use log::{debug, info};
use std::time::Instant;

pub const MAX_QUESTIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Info, text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Warning, text: text.into() }
    }
}

pub struct App {
    pub should_quit: bool,
    pub theme: Theme,
    pub engine: QuizEngine,

    pub input: String,
    pub difficulty: Difficulty,
    pub question_count: usize,

    /// highlighted option on the question screen
    pub cursor: Letter,
    pub last_outcome: Option<AnswerOutcome>,
    pub notice: Option<Notice>,
    pub generating: bool,

    pub terminal_width: u16,
}

impl App {
    pub fn new(
        engine: QuizEngine,
        theme: Theme,
        input: String,
        difficulty: Difficulty,
        question_count: usize,
    ) -> Self {
        let notice = engine
            .config_error()
            .map(|e| Notice::warning(format!("{}. Check your .env file.", e)));

        Self {
            should_quit: false,
            theme,
            engine,
            input,
            difficulty,
            question_count: question_count.clamp(1, MAX_QUESTIONS),
            cursor: Letter::A,
            last_outcome: None,
            notice,
            generating: false,
            terminal_width: 80,
        }
    }

    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    pub fn quit(&mut self) { self.should_quit = true; }
    pub fn resize(&mut self, width: u16, _height: u16) { self.terminal_width = width; }

    /// Seconds spent on the current question so far.
    pub fn question_elapsed(&self) -> u64 {
        self.engine
            .session()
            .map(|s| Instant::now().saturating_duration_since(s.question_started_at()).as_secs())
            .unwrap_or(0)
    }

    pub fn on_key(&mut self, c: char) {
        match self.phase() {
            Phase::Idle => {
                if !self.generating {
                    self.input.push(c);
                }
            }
            Phase::InProgress => self.answer(c),
            Phase::Results => {
                if c == 'r' {
                    self.restart();
                }
            }
        }
    }

    pub fn on_paste(&mut self, text: &str) {
        if self.phase() == Phase::Idle && !self.generating {
            self.input.push_str(text);
        }
    }

    pub fn on_backspace(&mut self) {
        if self.phase() == Phase::Idle && !self.generating {
            self.input.pop();
        }
    }

    pub fn on_enter(&mut self) {
        match self.phase() {
            Phase::Idle => self.request_generation(),
            Phase::InProgress => self.answer(self.cursor.as_char()),
            Phase::Results => {}
        }
    }

    pub fn on_tab(&mut self) {
        match self.phase() {
            Phase::Idle => self.difficulty = self.difficulty.next(),
            Phase::InProgress => self.abandon(),
            Phase::Results => self.restart(),
        }
    }

    pub fn on_up(&mut self) {
        match self.phase() {
            Phase::Idle => self.question_count = (self.question_count + 1).min(MAX_QUESTIONS),
            Phase::InProgress => self.cursor = Letter::from_index(self.cursor.index() + 3),
            Phase::Results => {}
        }
    }

    pub fn on_down(&mut self) {
        match self.phase() {
            Phase::Idle => self.question_count = self.question_count.saturating_sub(1).max(1),
            Phase::InProgress => self.cursor = Letter::from_index(self.cursor.index() + 1),
            Phase::Results => {}
        }
    }

    /// Marks a generation as pending so the next frame can show progress
    /// before the blocking call runs.
    fn request_generation(&mut self) {
        if self.generating {
            return;
        }
        self.generating = true;
        self.notice = Some(Notice::info("Generating quiz..."));
    }

    pub fn run_pending_generation(&mut self) {
        if !self.generating {
            return;
        }
        self.generating = false;

        let action = Action::Generate {
            text: self.input.clone(),
            difficulty: self.difficulty,
            question_count: self.question_count,
        };
        match self.engine.dispatch(action) {
            Ok(_) => {
                self.notice = None;
                self.cursor = Letter::A;
                self.last_outcome = None;
            }
            Err(e) => self.notice = Some(Notice::warning(describe_failure(&e))),
        }
    }

    fn answer(&mut self, c: char) {
        // letters outside a-d are rejected by the engine and ignored here
        if let Ok(Transition::Answered(outcome)) = self.engine.dispatch(Action::Answer(c)) {
            self.last_outcome = Some(outcome);
            self.cursor = Letter::A;
        }
    }

    fn restart(&mut self) {
        if self.engine.dispatch(Action::Restart).is_ok() {
            self.last_outcome = None;
            self.notice = None;
        }
    }

    fn abandon(&mut self) {
        if self.engine.dispatch(Action::Abandon).is_ok() {
            self.last_outcome = None;
            self.notice = Some(Notice::info("Quiz abandoned. Answers so far still count."));
        }
    }

    /// Records an unfinished session before the program exits.
    pub fn finish(&mut self) {
        if self.phase() == Phase::InProgress {
            info!("abandoning in-progress session on exit");
            if let Err(e) = self.engine.dispatch(Action::Abandon) {
                debug!("could not abandon session on exit: {}", e);
            }
        }
    }
}

fn describe_failure(error: &QuizError) -> String {
    match error {
        QuizError::Generation(crate::error::GenerationError::EmptyInput) => {
            "Paste or type some text first.".to_string()
        }
        QuizError::Generation(_) => format!("Failed to generate quiz. Please try again. ({})", error),
        _ => error.to_string(),
    }
}
