use std::collections::HashSet;
use std::fmt;

use crate::error::ValidationError;
use crate::model::choice::Choice;

/// What an `Answer` and a `Session` need from a question.
///
/// Question banks, fixtures and test stubs implement this; answers hold an
/// `Arc<dyn Question>` and never own the question's definition.
pub trait Question: fmt::Debug + Send + Sync {
    /// Stable code identifying the question. Compared case-insensitively.
    fn code(&self) -> &str;

    /// Does the question offer a choice with this code?
    fn has_choice(&self, code: &str) -> bool;

    /// Is this code the correct answer?
    fn is_correct(&self, code: &str) -> bool;
}

/// Key under which two question codes count as the same question.
///
/// Case is ignored; whitespace is significant, so `"Q1 "` and `"Q1"` differ.
#[must_use]
pub fn question_key(code: &str) -> String {
    code.to_lowercase()
}

/// Canonical form used when comparing choice codes: trimmed, case ignored.
pub(crate) fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase()
}

pub(crate) fn codes_match(a: &str, b: &str) -> bool {
    normalize_code(a) == normalize_code(b)
}

/// A question with a fixed list of choices and exactly one correct code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleChoiceQuestion {
    code: String,
    text: String,
    choices: Vec<Choice>,
    correct_code: String,
}

impl MultipleChoiceQuestion {
    /// Build a question from its choices.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the code is blank, the text empty, there
    /// are no choices, two choices share a code, or `correct_code` is not one
    /// of the choices.
    pub fn new(
        code: impl Into<String>,
        text: impl Into<String>,
        choices: Vec<Choice>,
        correct_code: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let code = code.into().trim().to_string();
        let text = text.into();
        let correct_code = correct_code.into().trim().to_string();

        if code.is_empty() {
            return Err(ValidationError::BlankQuestionCode);
        }
        if text.is_empty() {
            return Err(ValidationError::EmptyQuestionText);
        }
        if choices.is_empty() {
            return Err(ValidationError::NoChoices { question: code });
        }

        let mut seen = HashSet::new();
        for choice in &choices {
            if !seen.insert(normalize_code(choice.code())) {
                return Err(ValidationError::DuplicateChoice {
                    question: code,
                    code: choice.code().to_string(),
                });
            }
        }

        if !seen.contains(&normalize_code(&correct_code)) {
            return Err(ValidationError::UnknownCorrectChoice {
                question: code,
                code: correct_code,
            });
        }

        Ok(Self {
            code,
            text,
            choices,
            correct_code,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    #[must_use]
    pub fn correct_code(&self) -> &str {
        &self.correct_code
    }
}

impl Question for MultipleChoiceQuestion {
    fn code(&self) -> &str {
        &self.code
    }

    fn has_choice(&self, code: &str) -> bool {
        self.choices.iter().any(|c| codes_match(c.code(), code))
    }

    fn is_correct(&self, code: &str) -> bool {
        codes_match(&self.correct_code, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Vec<Choice> {
        vec![
            Choice::new("A", "Oslo").unwrap(),
            Choice::new("B", "Stockholm").unwrap(),
            Choice::new("C", "Helsinki").unwrap(),
        ]
    }

    #[test]
    fn question_answers_membership_and_correctness() {
        let q = MultipleChoiceQuestion::new("Q1", "Capital of Sweden?", abc(), "B").unwrap();

        assert_eq!(q.code(), "Q1");
        assert!(q.has_choice("A"));
        assert!(q.has_choice(" c "));
        assert!(!q.has_choice("D"));
        assert!(q.is_correct("b"));
        assert!(!q.is_correct("A"));
    }

    #[test]
    fn question_requires_choices() {
        let err = MultipleChoiceQuestion::new("Q1", "?", Vec::new(), "A").unwrap_err();
        assert!(matches!(err, ValidationError::NoChoices { .. }));
    }

    #[test]
    fn question_rejects_duplicate_choice_codes() {
        let choices = vec![
            Choice::new("A", "one").unwrap(),
            Choice::new("a", "two").unwrap(),
        ];
        let err = MultipleChoiceQuestion::new("Q1", "?", choices, "A").unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateChoice { .. }));
    }

    #[test]
    fn question_rejects_unknown_correct_code() {
        let err = MultipleChoiceQuestion::new("Q1", "?", abc(), "D").unwrap_err();
        assert!(matches!(err, ValidationError::UnknownCorrectChoice { .. }));
    }

    #[test]
    fn question_key_ignores_case_but_not_whitespace() {
        assert_eq!(question_key("Q1"), question_key("q1"));
        assert_ne!(question_key("Q1 "), question_key("Q1"));
    }

    #[test]
    fn question_rejects_blank_code() {
        let err = MultipleChoiceQuestion::new("  ", "?", abc(), "A").unwrap_err();
        assert_eq!(err, ValidationError::BlankQuestionCode);
    }
}
