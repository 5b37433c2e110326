//! Quiz generation against a live session.

use super::common::school_session;
use sql_quizzer::config::Config;
use sql_quizzer::grading::grade_quiz;
use sql_quizzer::quiz::{
    generate_quiz, FileQuizGenerator, GenerationOutcome, MockQuizGenerator, QuizRequest,
};
use tempfile::TempDir;

const QUIZ_DOCUMENT: &str = r#"Sure! Here is the quiz.
{
  "questions_and_answers": [
    {
      "quiz_question": "Return the title of every course worth 10 credits, ordered by title.",
      "correct_sql_answer": "SELECT title FROM courses WHERE credits = 10 ORDER BY title;"
    },
    {
      "quiz_question": "Return each student's name and number of enrolments, ordered by name.",
      "correct_sql_answer": "SELECT s.name, COUNT(e.course_id) FROM students s LEFT JOIN enrolments e ON e.student_id = s.id GROUP BY s.id ORDER BY s.name;"
    }
  ]
}"#;

fn request_for(config: &Config, session: &sql_quizzer::session::DatabaseSession) -> QuizRequest {
    QuizRequest::from_session(session, &config.quiz.topics, config.quiz.num_questions)
}

#[tokio::test]
async fn test_file_generator_round() {
    let (dir, session) = school_session().await;
    let path = dir.path().join("quiz.json");
    std::fs::write(&path, QUIZ_DOCUMENT).unwrap();
    let config = Config::default();

    let generator = FileQuizGenerator::new(&path);
    let items = generate_quiz(&session, &generator, &request_for(&config, &session))
        .await
        .into_items()
        .unwrap();
    assert_eq!(items.len(), 2);

    let answers = vec![
        "SELECT title FROM courses WHERE credits = 10 ORDER BY 1;".to_string(),
        "SELECT name FROM students ORDER BY name;".to_string(),
    ];
    let report = grade_quiz(&session, &items, &answers).await;

    assert_eq!(report.score(), 1);
    assert!(report.outcomes[1].user_valid);
    assert!(!report.outcomes[1].correct);
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_request_describes_database() {
    let (_dir, session) = school_session().await;

    let request = request_for(&Config::default(), &session);

    assert_eq!(request.rdbms, "SQLite");
    assert_eq!(request.num_questions, 5);
    assert!(request.schema.contains("CREATE TABLE enrolments"));
    assert!(!request.schema.contains("CREATE INDEX"));
    assert!(request.samples.contains("Table: students"));
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_generated_answers_never_persist() {
    let (_dir, session) = school_session().await;
    let bytes_before = std::fs::read(session.working_path()).unwrap();
    let generator = MockQuizGenerator::new().with_response(
        r#"{"questions_and_answers": [
            {"quiz_question": "Drop enrolments.", "correct_sql_answer": "DROP TABLE enrolments;"},
            {"quiz_question": "Clear enrolments.", "correct_sql_answer": "DELETE FROM enrolments;"}
        ]}"#,
    );

    let outcome = generate_quiz(
        &session,
        &generator,
        &request_for(&Config::default(), &session),
    )
    .await;

    assert!(matches!(outcome, GenerationOutcome::Generated { attempts: 1, .. }));
    assert_eq!(std::fs::read(session.working_path()).unwrap(), bytes_before);
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_generation_fails_after_retry() {
    let (_dir, session) = school_session().await;
    let generator = MockQuizGenerator::new()
        .with_failure("service unavailable")
        .with_response("{ not json }");

    let outcome = generate_quiz(
        &session,
        &generator,
        &request_for(&Config::default(), &session),
    )
    .await;

    match outcome {
        GenerationOutcome::Failed { reasons } => {
            assert_eq!(reasons.len(), 2);
            assert!(reasons[0].contains("service unavailable"));
            assert!(reasons[1].contains("malformed quiz document"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_missing_quiz_file() {
    let (_dir, session) = school_session().await;
    let empty = TempDir::new().unwrap();
    let generator = FileQuizGenerator::new(empty.path().join("quiz.json"));

    let outcome = generate_quiz(
        &session,
        &generator,
        &request_for(&Config::default(), &session),
    )
    .await;

    assert!(outcome.into_items().is_err());
    session.close().await.unwrap();
}
