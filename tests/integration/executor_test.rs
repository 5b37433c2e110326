//! Statement classification and execution through the public API.

use super::common::school_session;
use sql_quizzer::db::{Effect, Value};
use sql_quizzer::error::QuizError;
use sql_quizzer::safety::{extract_target, validate, Query, QueryClass};

#[test]
fn test_validate_examples() {
    assert_eq!(validate("SELECT * FROM t;"), QueryClass::Read);
    assert_eq!(validate("SELECT 1; DROP TABLE t;"), QueryClass::Invalid);
    assert_eq!(validate("select * from t"), QueryClass::Invalid);
    assert_eq!(validate("  update t set x = 1;\n"), QueryClass::Mutate);
    assert_eq!(validate("ALTER TABLE t ADD COLUMN y;"), QueryClass::Ddl);
    assert_eq!(validate("PRAGMA table_info(t);"), QueryClass::Invalid);
}

#[test]
fn test_extract_target_examples() {
    assert_eq!(
        extract_target("DELETE FROM orders WHERE id=1;")
            .unwrap()
            .to_string(),
        "ORDERS"
    );
    assert_eq!(
        extract_target("INSERT OR IGNORE INTO main.orders VALUES (1);")
            .unwrap()
            .to_string(),
        "MAIN.ORDERS"
    );
    assert!(Query::new("SELECT * FROM orders;").target().is_none());
}

#[tokio::test]
async fn test_read_returns_typed_rows() {
    let (_dir, session) = school_session().await;

    let result = session
        .execute("SELECT name, year, NULL AS nothing FROM students WHERE id = 2;")
        .await
        .unwrap();

    assert_eq!(result.effect, Effect::Rows);
    assert_eq!(result.column_names(), vec!["name", "year", "nothing"]);
    assert_eq!(
        result.rows,
        vec![vec![
            Value::String("Tomas".to_string()),
            Value::Int(2),
            Value::Null
        ]]
    );
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_aggregate_with_real_values() {
    let (_dir, session) = school_session().await;

    let result = session
        .execute("SELECT MAX(grade) FROM enrolments;")
        .await
        .unwrap();

    assert_eq!(result.rows, vec![vec![Value::Float(90.0)]]);
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_empty_read_is_success() {
    let (_dir, session) = school_session().await;

    let result = session
        .execute("SELECT * FROM students WHERE year > 10;")
        .await
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(result.columns.len(), 3);
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_insert_preview_includes_new_row() {
    let (_dir, session) = school_session().await;

    let result = session
        .execute("INSERT INTO courses (id, title, credits) VALUES (5, 'Graphics', 10);")
        .await
        .unwrap();

    assert_eq!(result.row_count(), 5);
    assert_eq!(result.rows[4][1], Value::String("Graphics".to_string()));

    let after = session.execute("SELECT COUNT(*) FROM courses;").await.unwrap();
    assert_eq!(after.rows[0][0], Value::Int(4));
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_ddl_preview_shows_new_definition() {
    let (_dir, session) = school_session().await;

    let result = session
        .execute("ALTER TABLE courses ADD COLUMN room TEXT;")
        .await
        .unwrap();

    assert_eq!(result.effect, Effect::Schema);
    let definitions: Vec<String> = result
        .rows
        .iter()
        .filter_map(|row| row[0].as_str().map(str::to_string))
        .collect();
    assert!(definitions.iter().any(|d| d.contains("room TEXT")));
    assert!(!session.get_schema().to_sql().contains("room TEXT"));
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_errors_are_classified() {
    let (_dir, session) = school_session().await;

    let invalid = session.execute("SELECT * FROM students").await.unwrap_err();
    assert!(matches!(invalid, QuizError::Validation(_)));

    let missing = session.execute("SELECT * FROM teachers;").await.unwrap_err();
    assert!(matches!(missing, QuizError::Execution(_)));
    assert_eq!(missing.user_message(), "query could not be executed");

    session.close().await.unwrap();
}
