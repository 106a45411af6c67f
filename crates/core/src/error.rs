use chrono::{DateTime, Utc};
use thiserror::Error;

/// Domain rule violation raised by choices, answers and sessions.
///
/// Every variant names the rule that failed; callers decide how to recover
/// (re-prompt, reject the request, pick another question).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("choice code must not be blank")]
    BlankChoiceCode,

    #[error("choice text must not be empty")]
    EmptyChoiceText,

    #[error("question code must not be blank")]
    BlankQuestionCode,

    #[error("question text must not be empty")]
    EmptyQuestionText,

    #[error("question '{question}' has no choices")]
    NoChoices { question: String },

    #[error("question '{question}' offers choice '{code}' more than once")]
    DuplicateChoice { question: String, code: String },

    #[error("correct choice '{code}' is not offered by question '{question}'")]
    UnknownCorrectChoice { question: String, code: String },

    #[error("selected choice code must not be empty")]
    EmptySelectedChoice,

    #[error("choice '{code}' does not belong to question '{question}'")]
    UnknownChoice { question: String, code: String },

    #[error("answered_at must be a valid timestamp")]
    InvalidAnsweredAt,

    #[error("session id must be set")]
    MissingSessionId,

    #[error("question count must be greater than 0")]
    InvalidQuestionCount,

    #[error("started_at must be a valid timestamp")]
    InvalidStartedAt,

    #[error("finished_at ({finished_at}) is before started_at ({started_at})")]
    FinishedBeforeStart {
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    },

    #[error("session is closed")]
    SessionClosed,

    #[error("question '{question}' already answered")]
    QuestionAlreadyAnswered { question: String },

    #[error("duplicate answers for questions: {}", .questions.join(", "))]
    DuplicateAnswers { questions: Vec<String> },

    #[error("answer time ({answered_at}) is before session start ({started_at})")]
    AnsweredBeforeStart {
        answered_at: DateTime<Utc>,
        started_at: DateTime<Utc>,
    },

    #[error("answer time ({answered_at}) is after session end ({finished_at})")]
    AnsweredAfterFinish {
        answered_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    },

    #[error("answer count ({answers}) exceeds question count ({question_count})")]
    ExceedsQuestionCount { answers: usize, question_count: u32 },
}
