use std::sync::Arc;

use chrono::Duration;
use quiz_core::model::{Choice, MultipleChoiceQuestion, Question};
use quiz_core::time::fixed_now;
use services::{Clock, QuizLoopService};

fn capitals() -> Vec<Arc<dyn Question>> {
    let rows = [
        ("SE", "Capital of Sweden?", "B"),
        ("NO", "Capital of Norway?", "A"),
        ("FI", "Capital of Finland?", "C"),
    ];
    rows.iter()
        .map(|(code, text, correct)| {
            let choices = vec![
                Choice::new("A", "Oslo").unwrap(),
                Choice::new("B", "Stockholm").unwrap(),
                Choice::new("C", "Helsinki").unwrap(),
            ];
            Arc::new(MultipleChoiceQuestion::new(*code, *text, choices, *correct).unwrap())
                as Arc<dyn Question>
        })
        .collect()
}

#[test]
fn quiz_loop_scores_a_full_session() {
    let svc = QuizLoopService::new(Clock::fixed(fixed_now()), capitals());
    let mut run = svc.start().unwrap();

    for choice in ["B", "A", "A"] {
        run.advance_clock(Duration::minutes(1));
        run.answer_current(choice).unwrap();
    }

    let session = run.session();
    assert!(session.is_finished());
    assert_eq!(session.answers().len(), 3);
    assert_eq!(session.score(), 2);
    assert_eq!(
        session.score(),
        session.answers().iter().filter(|a| a.is_correct()).count()
    );
    assert_eq!(session.finished_at(), Some(fixed_now() + Duration::minutes(3)));
}
