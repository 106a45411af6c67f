use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use quiz_core::model::{Question, Session, question_key};
use rand::rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::Clock;
use crate::error::QuizError;

/// Result of answering a single question in a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAnswerResult {
    pub question_code: String,
    pub is_correct: bool,
    pub score: usize,
    pub is_complete: bool,
    /// Whether the session was closed by this answer (auto-finish).
    pub finished: bool,
}

/// Starts quizzes over a fixed question set.
#[derive(Debug, Clone)]
pub struct QuizLoopService {
    clock: Clock,
    questions: Vec<Arc<dyn Question>>,
    shuffle: bool,
    auto_finish: bool,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, questions: Vec<Arc<dyn Question>>) -> Self {
        Self {
            clock,
            questions,
            shuffle: false,
            auto_finish: true,
        }
    }

    /// Present questions in random order.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Close the session as soon as the last question is answered (default on).
    #[must_use]
    pub fn with_auto_finish(mut self, auto_finish: bool) -> Self {
        self.auto_finish = auto_finish;
        self
    }

    /// Start a new quiz with one session sized to the question set.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` when there are no questions,
    /// `QuizError::DuplicateQuestion` when two codes differ only by case and
    /// `QuizError::TooManyQuestions` when the count does not fit a session.
    pub fn start(&self) -> Result<QuizRun, QuizError> {
        if self.questions.is_empty() {
            return Err(QuizError::Empty);
        }
        let mut seen = HashSet::new();
        for question in &self.questions {
            if !seen.insert(question_key(question.code())) {
                return Err(QuizError::DuplicateQuestion {
                    code: question.code().to_string(),
                });
            }
        }
        let count = u32::try_from(self.questions.len()).map_err(|_| {
            QuizError::TooManyQuestions {
                len: self.questions.len(),
            }
        })?;

        let mut questions = self.questions.clone();
        if self.shuffle {
            questions.as_mut_slice().shuffle(&mut rng());
        }

        let session = Session::create_at(count, self.clock.now())?;
        info!(session_id = %session.id(), questions = count, "quiz started");

        Ok(QuizRun {
            clock: self.clock,
            questions,
            current: 0,
            session,
            auto_finish: self.auto_finish,
        })
    }
}

/// One quiz in progress: a session plus the cursor over its questions.
#[derive(Debug)]
pub struct QuizRun {
    clock: Clock,
    questions: Vec<Arc<dyn Question>>,
    current: usize,
    session: Session,
    auto_finish: bool,
}

impl QuizRun {
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&dyn Question> {
        if self.session.is_finished() {
            return None;
        }
        self.questions.get(self.current).map(|q| &**q)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_finished() || self.current >= self.questions.len()
    }

    /// Moves a fixed clock forward; the system clock is unaffected.
    pub fn advance_clock(&mut self, delta: Duration) {
        self.clock.advance(delta);
    }

    /// Answer the current question at the clock's current time.
    ///
    /// A rejected answer leaves the cursor where it was so the caller can
    /// retry with another choice. Once the answer is recorded the call
    /// succeeds; if auto-finish cannot close the session, `finished` is
    /// false and the caller may retry with [`QuizRun::finish`].
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` when no question is left and
    /// `QuizError::Validation` when the session rejects the answer.
    pub fn answer_current(&mut self, choice_code: &str) -> Result<QuizAnswerResult, QuizError> {
        if self.session.is_finished() {
            return Err(QuizError::Completed);
        }
        let question = self
            .questions
            .get(self.current)
            .cloned()
            .ok_or(QuizError::Completed)?;

        let now = self.clock.now();
        let is_correct = self
            .session
            .submit_answer(question.clone(), choice_code, now)?
            .is_correct();
        self.current += 1;

        debug!(
            session_id = %self.session.id(),
            question = question.code(),
            correct = is_correct,
            "quiz answer"
        );

        let is_complete = self.current >= self.questions.len();
        let mut finished = false;
        if is_complete && self.auto_finish {
            match self.finish_session(now) {
                Ok(()) => finished = true,
                Err(err) => {
                    warn!(session_id = %self.session.id(), error = %err, "auto-finish failed");
                }
            }
        }

        Ok(QuizAnswerResult {
            question_code: question.code().to_string(),
            is_correct,
            score: self.session.score(),
            is_complete,
            finished,
        })
    }

    /// Stop the quiz early; unanswered questions stay unanswered.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` if the session is already finished.
    pub fn finish(&mut self) -> Result<(), QuizError> {
        if self.session.is_finished() {
            return Err(QuizError::Completed);
        }
        self.finish_session(self.clock.now())
    }

    fn finish_session(&mut self, at: DateTime<Utc>) -> Result<(), QuizError> {
        self.session.finish(at)?;
        info!(
            session_id = %self.session.id(),
            score = self.session.score(),
            answered = self.session.answers().len(),
            "quiz finished"
        );
        Ok(())
    }
}
