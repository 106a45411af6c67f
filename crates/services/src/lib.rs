#![forbid(unsafe_code)]

pub mod error;
pub mod quiz_loop;

pub use quiz_core::Clock;

pub use error::QuizError;
pub use quiz_loop::{QuizAnswerResult, QuizLoopService, QuizRun};
