//! Error types for the generation pipeline and the session engine.

use crate::models::Phase;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("credential `{0}` is not set; quiz generation is disabled")]
    MissingCredential(String),
    #[error("could not set up the completion client: {0}")]
    ClientSetup(String),
}

/// A decoded question element failed schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("question {index} is invalid: {reason}")]
pub struct ValidationError {
    pub index: usize,
    pub reason: String,
}

impl ValidationError {
    pub fn new(index: usize, reason: impl Into<String>) -> Self {
        Self {
            index,
            reason: reason.into(),
        }
    }
}

/// Failures of a single generation attempt. Clone so the cache can hand out
/// a stored failure more than once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("no source text was provided")]
    EmptyInput,
    #[error("completion service failed: {0}")]
    Service(String),
    #[error("response was not valid JSON: {0}")]
    MalformedJson(String),
    #[error("response did not contain any questions")]
    NoQuestions,
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidActionError {
    #[error("cannot {action} while {phase}")]
    WrongPhase { action: &'static str, phase: Phase },
    #[error("`{0}` is not one of a, b, c, d")]
    UnknownLetter(char),
    #[error("at least one question must be requested")]
    NoQuestionsRequested,
}

/// Everything the quiz controller can reject an action with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    InvalidAction(#[from] InvalidActionError),
}
