//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::ValidationError;

/// Errors emitted by the quiz loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions available for quiz")]
    Empty,
    #[error("too many questions for a single quiz: {len}")]
    TooManyQuestions { len: usize },
    #[error("question '{code}' appears more than once in the quiz")]
    DuplicateQuestion { code: String },
    #[error("quiz already completed")]
    Completed,
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
