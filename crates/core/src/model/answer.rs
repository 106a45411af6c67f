use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::model::question::Question;
use crate::time;

/// One submitted choice for one question.
///
/// Correctness is never stored: `is_correct` asks the question every time,
/// so it always reflects the question's current definition.
#[derive(Debug, Clone)]
pub struct Answer {
    question: Arc<dyn Question>,
    selected_choice_code: String,
    answered_at: DateTime<Utc>,
}

impl Answer {
    /// Record an answer. The selected code is trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptySelectedChoice` if the trimmed code is
    /// empty, `ValidationError::UnknownChoice` if the question does not offer
    /// it, and `ValidationError::InvalidAnsweredAt` for the zero timestamp.
    pub fn new(
        question: Arc<dyn Question>,
        selected_choice_code: &str,
        answered_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let selected_choice_code = selected_choice_code.trim();

        if selected_choice_code.is_empty() {
            return Err(ValidationError::EmptySelectedChoice);
        }
        if !question.has_choice(selected_choice_code) {
            return Err(ValidationError::UnknownChoice {
                question: question.code().to_string(),
                code: selected_choice_code.to_string(),
            });
        }
        if !time::is_set(answered_at) {
            return Err(ValidationError::InvalidAnsweredAt);
        }

        Ok(Self {
            selected_choice_code: selected_choice_code.to_string(),
            question,
            answered_at,
        })
    }

    #[must_use]
    pub fn question(&self) -> &dyn Question {
        &*self.question
    }

    #[must_use]
    pub fn question_code(&self) -> &str {
        self.question.code()
    }

    #[must_use]
    pub fn selected_choice_code(&self) -> &str {
        &self.selected_choice_code
    }

    #[must_use]
    pub fn answered_at(&self) -> DateTime<Utc> {
        self.answered_at
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.question.is_correct(&self.selected_choice_code)
    }
}
