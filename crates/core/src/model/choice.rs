use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::ids::ChoiceId;

/// One selectable option of a question, e.g. `B: "Stockholm"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    id: ChoiceId,
    code: String,
    text: String,
}

impl Choice {
    /// Create a choice with a freshly generated id.
    ///
    /// The code is stored trimmed; the text is kept as given.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::BlankChoiceCode` if the code is blank and
    /// `ValidationError::EmptyChoiceText` if the text is empty.
    pub fn new(code: impl Into<String>, text: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into();
        let text = text.into();

        let code = code.trim();
        if code.is_empty() {
            return Err(ValidationError::BlankChoiceCode);
        }
        if text.is_empty() {
            return Err(ValidationError::EmptyChoiceText);
        }

        Ok(Self {
            id: ChoiceId::generate(),
            code: code.to_string(),
            text,
        })
    }

    #[must_use]
    pub fn id(&self) -> ChoiceId {
        self.id
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_keeps_code_and_text() {
        let choice = Choice::new(" B ", "Stockholm").unwrap();
        assert_eq!(choice.code(), "B");
        assert_eq!(choice.text(), "Stockholm");
    }

    #[test]
    fn choice_rejects_blank_code() {
        assert_eq!(
            Choice::new("   ", "text").unwrap_err(),
            ValidationError::BlankChoiceCode
        );
    }

    #[test]
    fn choice_rejects_empty_text() {
        assert_eq!(
            Choice::new("A", "").unwrap_err(),
            ValidationError::EmptyChoiceText
        );
    }

    #[test]
    fn each_choice_gets_its_own_id() {
        let a = Choice::new("A", "one").unwrap();
        let b = Choice::new("A", "one").unwrap();
        assert_ne!(a.id(), b.id());
    }
}
