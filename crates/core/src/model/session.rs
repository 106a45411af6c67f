use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::ValidationError;
use crate::model::answer::Answer;
use crate::model::ids::SessionId;
use crate::model::question::{Question, question_key};
use crate::time;

/// Whether a session still accepts answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No `finished_at`; submissions are accepted.
    Active,
    /// `finished_at` is set; every submission is rejected.
    Finished,
}

/// One timed attempt at answering a fixed number of questions.
///
/// All mutation goes through [`Session::submit_answer`] and [`Session::finish`].
/// Both re-check the whole invariant set and leave the session untouched
/// when a rule is broken:
///
/// 1. the id is set
/// 2. `question_count > 0`
/// 3. `started_at` is a real timestamp
/// 4. `finished_at`, when set, is not before `started_at`
/// 5. no two answers share a question code (case-insensitive)
/// 6. every answer lies within `started_at..=finished_at`
/// 7. there are no more answers than questions
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    question_count: u32,
    answers: Vec<Answer>,
}

impl Session {
    /// Start a session now (UTC).
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidQuestionCount` if `question_count` is 0.
    pub fn create(question_count: u32) -> Result<Self, ValidationError> {
        Self::create_at(question_count, Utc::now())
    }

    /// Start a session at an explicit time, typically taken from a `Clock`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidQuestionCount` if `question_count` is 0
    /// and `ValidationError::InvalidStartedAt` for the zero timestamp.
    pub fn create_at(
        question_count: u32,
        started_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if question_count == 0 {
            return Err(ValidationError::InvalidQuestionCount);
        }
        if !time::is_set(started_at) {
            return Err(ValidationError::InvalidStartedAt);
        }

        Ok(Self {
            id: SessionId::generate(),
            started_at,
            finished_at: None,
            question_count,
            answers: Vec::new(),
        })
    }

    /// Rehydrate a session from stored state.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` the stored state violates.
    pub fn from_persisted(
        id: SessionId,
        started_at: DateTime<Utc>,
        finished_at: Option<DateTime<Utc>>,
        question_count: u32,
        answers: Vec<Answer>,
    ) -> Result<Self, ValidationError> {
        let session = Self {
            id,
            started_at,
            finished_at,
            question_count,
            answers,
        };
        session.ensure_valid()?;
        Ok(session)
    }

    /// Record an answer for `question`.
    ///
    /// Either the answer is appended and every invariant holds, or the error
    /// is returned and the session is exactly as it was before the call.
    ///
    /// # Errors
    ///
    /// - `ValidationError::SessionClosed` once the session is finished
    /// - `ValidationError::QuestionAlreadyAnswered` for a repeated question code
    /// - any `Answer` construction error
    /// - any invariant violation, e.g. `ExceedsQuestionCount` or
    ///   `AnsweredBeforeStart`
    pub fn submit_answer(
        &mut self,
        question: Arc<dyn Question>,
        selected_choice_code: &str,
        answered_at: DateTime<Utc>,
    ) -> Result<&Answer, ValidationError> {
        self.ensure_active()?;

        if self.has_answered(question.code()) {
            debug!(session_id = %self.id, question = question.code(), "question already answered");
            return Err(ValidationError::QuestionAlreadyAnswered {
                question: question.code().to_string(),
            });
        }

        let answer = Answer::new(question, selected_choice_code, answered_at)?;
        self.answers.push(answer);

        if let Err(err) = self.ensure_valid() {
            self.answers.pop();
            debug!(session_id = %self.id, error = %err, "answer rejected");
            return Err(err);
        }

        let answer = &self.answers[self.answers.len() - 1];
        debug!(
            session_id = %self.id,
            question = answer.question_code(),
            correct = answer.is_correct(),
            "answer recorded"
        );
        Ok(answer)
    }

    /// Close the session at `at`. No answers are accepted afterwards.
    ///
    /// # Errors
    ///
    /// - `ValidationError::SessionClosed` if already finished
    /// - `ValidationError::FinishedBeforeStart` if `at` precedes `started_at`
    /// - `ValidationError::AnsweredAfterFinish` if an answer is later than `at`
    pub fn finish(&mut self, at: DateTime<Utc>) -> Result<(), ValidationError> {
        self.ensure_active()?;

        self.finished_at = Some(at);
        if let Err(err) = self.ensure_valid() {
            self.finished_at = None;
            return Err(err);
        }

        debug!(session_id = %self.id, score = self.score(), "session finished");
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Number of answers whose question reports the selected code as correct.
    #[must_use]
    pub fn score(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct()).count()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.finished_at.is_some() {
            SessionState::Finished
        } else {
            SessionState::Active
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state() == SessionState::Finished
    }

    /// Questions still unanswered.
    #[must_use]
    pub fn remaining(&self) -> usize {
        let total = usize::try_from(self.question_count).unwrap_or(usize::MAX);
        total.saturating_sub(self.answers.len())
    }

    /// True once every question has an answer.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    #[must_use]
    pub fn has_answered(&self, question_code: &str) -> bool {
        self.answers
            .iter()
            .any(|a| question_key(a.question_code()) == question_key(question_code))
    }

    fn ensure_started(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::MissingSessionId);
        }
        if !time::is_set(self.started_at) {
            return Err(ValidationError::InvalidStartedAt);
        }
        if self.question_count == 0 {
            return Err(ValidationError::InvalidQuestionCount);
        }
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), ValidationError> {
        self.ensure_started()?;
        if self.finished_at.is_some() {
            return Err(ValidationError::SessionClosed);
        }
        Ok(())
    }

    fn ensure_valid(&self) -> Result<(), ValidationError> {
        self.ensure_started()?;

        if let Some(finished_at) = self.finished_at {
            if finished_at < self.started_at {
                return Err(ValidationError::FinishedBeforeStart {
                    started_at: self.started_at,
                    finished_at,
                });
            }
        }

        // First-appearance order.
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut per_question: Vec<(&str, usize)> = Vec::new();
        for answer in &self.answers {
            let slot = *index
                .entry(question_key(answer.question_code()))
                .or_insert_with(|| {
                    per_question.push((answer.question_code(), 0));
                    per_question.len() - 1
                });
            per_question[slot].1 += 1;
        }
        let duplicates: Vec<String> = per_question
            .iter()
            .filter(|(_, count)| *count > 1)
            .map(|(code, _)| (*code).to_string())
            .collect();
        if !duplicates.is_empty() {
            return Err(ValidationError::DuplicateAnswers {
                questions: duplicates,
            });
        }

        for answer in &self.answers {
            if answer.answered_at() < self.started_at {
                return Err(ValidationError::AnsweredBeforeStart {
                    answered_at: answer.answered_at(),
                    started_at: self.started_at,
                });
            }
            if let Some(finished_at) = self.finished_at {
                if answer.answered_at() > finished_at {
                    return Err(ValidationError::AnsweredAfterFinish {
                        answered_at: answer.answered_at(),
                        finished_at,
                    });
                }
            }
        }

        let total = usize::try_from(self.question_count).unwrap_or(usize::MAX);
        if self.answers.len() > total {
            return Err(ValidationError::ExceedsQuestionCount {
                answers: self.answers.len(),
                question_count: self.question_count,
            });
        }

        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
