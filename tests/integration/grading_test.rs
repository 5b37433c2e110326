//! Grading behaviour through the public API.

use super::common::{school_session, tiny_session};
use sql_quizzer::db::Value;
use sql_quizzer::grading::grade_quiz;
use sql_quizzer::quiz::QuizItem;

#[tokio::test]
async fn test_identical_text_short_circuits() {
    let (_dir, session) = tiny_session().await;

    let outcome = session
        .grade("SELECT id FROM t;", "SELECT id FROM t;")
        .await;

    assert!(outcome.correct);
    assert!(!outcome.was_executed());
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_ordering_is_significant() {
    let (_dir, session) = tiny_session().await;

    let outcome = session
        .grade(
            "SELECT id FROM t ORDER BY id;",
            "SELECT id FROM t ORDER BY id DESC;",
        )
        .await;

    assert!(!outcome.correct);
    assert!(outcome.model_valid && outcome.user_valid);
    assert_eq!(
        outcome.model_result.unwrap().rows,
        vec![vec![Value::Int(1)], vec![Value::Int(2)]]
    );
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_failing_user_answer_keeps_feedback() {
    let (_dir, session) = tiny_session().await;

    let outcome = session
        .grade("SELECT id FROM t ORDER BY id;", "SELECT idd FROM t;")
        .await;

    assert!(!outcome.correct);
    assert!(!outcome.user_valid);
    assert!(outcome.user_result.is_none());
    assert_eq!(outcome.model_result.unwrap().row_count(), 2);
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_different_columns_same_values_are_correct() {
    let (_dir, session) = school_session().await;

    let outcome = session
        .grade(
            "SELECT title FROM courses WHERE credits = 10 ORDER BY id;",
            "SELECT title AS course_name FROM courses WHERE credits < 15 AND credits > 5 ORDER BY title;",
        )
        .await;

    assert!(outcome.correct);
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_grading_a_whole_quiz() {
    let (_dir, session) = school_session().await;
    let items = vec![
        QuizItem::new(
            "Names of second-year students, alphabetically.",
            "SELECT name FROM students WHERE year = 2 ORDER BY name;",
        ),
        QuizItem::new(
            "Number of enrolments per course id.",
            "SELECT course_id, COUNT(*) FROM enrolments GROUP BY course_id ORDER BY course_id;",
        ),
        QuizItem::new(
            "Remove courses worth 5 credits.",
            "DELETE FROM courses WHERE credits = 5;",
        ),
    ];
    let answers = vec![
        "select name from students where year = 2 order by name;".to_string(),
        "SELECT course_id, COUNT(student_id) FROM enrolments GROUP BY course_id ORDER BY 1;".to_string(),
        "DELETE FROM courses WHERE title = 'Statistics'".to_string(),
    ];

    let report = grade_quiz(&session, &items, &answers).await;

    assert_eq!(report.total(), 3);
    assert!(report.outcomes[0].correct);
    assert!(!report.outcomes[0].was_executed());
    assert!(report.outcomes[1].correct);
    assert!(!report.outcomes[2].user_valid);
    assert_eq!(report.score(), 2);
    session.close().await.unwrap();
}
