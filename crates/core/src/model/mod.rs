mod answer;
mod choice;
mod ids;
mod question;
mod session;

pub use ids::{ChoiceId, ParseIdError, SessionId};

pub use answer::Answer;
pub use choice::Choice;
pub use question::{MultipleChoiceQuestion, Question, question_key};
pub use session::{Session, SessionState};
