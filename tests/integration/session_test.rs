//! Session lifecycle and persistence guarantees.

use super::common::{database_bytes, options_in, school_session, working_path, SCHOOL_SCRIPT};
use pretty_assertions::assert_eq;
use sql_quizzer::db::{Effect, QueryResult};
use sql_quizzer::error::QuizError;
use sql_quizzer::session::{DatabaseSession, SessionContext, SessionOptions};
use tempfile::TempDir;

const STATEMENTS: [&str; 12] = [
    "DELETE FROM enrolments WHERE grade < 60;",
    "UPDATE students SET year = year + 1;",
    "INSERT INTO courses VALUES (5, 'Graphics', 10);",
    "CREATE TABLE clubs (id INTEGER PRIMARY KEY, name TEXT);",
    "ALTER TABLE students ADD COLUMN email TEXT;",
    "DROP TABLE enrolments;",
    "WITH c AS (SELECT 1) SELECT * FROM c;",
    // Failing statements
    "INSERT INTO students VALUES (1, 'Dup', 1);",
    "UPDATE students SET name = 'Ines';",
    "DROP TABLE no_such_table;",
    "CREATE TABLE students (id INTEGER);",
    "ALTER TABLE students ADD COLUMN;",
];

async fn contents(session: &DatabaseSession) -> Vec<QueryResult> {
    let mut all = Vec::new();
    for table in session.tables() {
        let result = session
            .execute(&format!("SELECT * FROM {table};"))
            .await
            .unwrap();
        all.push(result);
    }
    all
}

#[tokio::test]
async fn test_statements_never_persist() {
    let (_dir, session) = school_session().await;
    let bytes_before = std::fs::read(session.working_path()).unwrap();
    let schema_before = session.introspector().get_schema().await.unwrap();
    let rows_before: Vec<_> = contents(&session).await.into_iter().map(|r| r.rows).collect();

    for sql in STATEMENTS {
        let _ = session.execute(sql).await;

        assert_eq!(
            std::fs::read(session.working_path()).unwrap(),
            bytes_before,
            "file changed after {sql}"
        );
        assert_eq!(
            session.introspector().get_schema().await.unwrap(),
            schema_before,
            "schema changed after {sql}"
        );
        let rows_after: Vec<_> = contents(&session).await.into_iter().map(|r| r.rows).collect();
        assert_eq!(rows_after, rows_before, "rows changed after {sql}");
    }

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_failing_statements_report_execution_errors() {
    let (_dir, session) = school_session().await;

    for sql in &STATEMENTS[7..] {
        let err = session.execute(sql).await.unwrap_err();
        assert!(
            matches!(err, QuizError::Execution(_)),
            "{sql} gave {err:?}"
        );
    }

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_repeated_ddl_observes_same_schema() {
    let (_dir, session) = school_session().await;
    let sql = "CREATE TABLE clubs (id INTEGER PRIMARY KEY, name TEXT);";

    let first = session.execute(sql).await.unwrap();
    let second = session.execute(sql).await.unwrap();

    assert_eq!(first.effect, Effect::Schema);
    assert_eq!(first.rows, second.rows);
    assert_eq!(first.row_count(), session.get_schema().len() + 1);

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_mutation_preview_shows_whole_table() {
    let (_dir, session) = school_session().await;

    let result = session
        .execute("DELETE FROM enrolments WHERE grade IS NULL;")
        .await
        .unwrap();

    match &result.effect {
        Effect::TableContents(table) => assert_eq!(table.object(), "ENROLMENTS"),
        other => panic!("unexpected effect: {other:?}"),
    }
    assert_eq!(result.row_count(), 5);

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_stacked_statements_rejected() {
    let (_dir, session) = school_session().await;

    let err = session
        .execute("DELETE FROM enrolments WHERE student_id = 1; DROP TABLE students;")
        .await
        .unwrap_err();

    assert!(matches!(err, QuizError::Validation(_)));
    assert_eq!(session.tables().len(), 3);
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_admission_thresholds() {
    let dir = TempDir::new().unwrap();
    let two_tables = database_bytes(
        "CREATE TABLE a (id INTEGER);
         CREATE TABLE b (id INTEGER);
         INSERT INTO a VALUES (1), (2), (3), (4);
         INSERT INTO b VALUES (1), (2), (3), (4);",
    )
    .await;

    let err = DatabaseSession::create(&two_tables, &options_in(&dir))
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::Admission(_)));

    let school = database_bytes(SCHOOL_SCRIPT).await;
    let session = DatabaseSession::create(&school, &options_in(&dir))
        .await
        .unwrap();
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_io_error_when_working_path_blocked() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let options = SessionOptions::with_working_path(blocker.join("user_db.db"));

    let err = DatabaseSession::create(&database_bytes(SCHOOL_SCRIPT).await, &options)
        .await
        .unwrap_err();

    assert!(matches!(err, QuizError::Io(_)));
}

#[tokio::test]
async fn test_context_replaces_working_copy() {
    let dir = TempDir::new().unwrap();
    let path = working_path(&dir);
    let mut context = SessionContext::new(options_in(&dir));

    let school = database_bytes(SCHOOL_SCRIPT).await;
    context.load(&school).await.unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), school);

    let err = context.load(b"just some text").await.unwrap_err();
    assert!(matches!(err, QuizError::InvalidFile(_)));
    assert!(!context.is_loaded());
    assert!(matches!(context.session(), Err(QuizError::InvalidFile(_))));

    context.load(&school).await.unwrap();
    assert_eq!(
        context.session().unwrap().tables(),
        ["students", "courses", "enrolments"]
    );
    context.unload().await.unwrap();
    assert!(!path.exists());
}
