//! SQLite driver glue.
//!
//! Opens the working copy through sqlx and converts sqlx rows into the
//! crate's `Row`/`Value` types.

use crate::db::{ColumnInfo, QueryResult, Row, Value};
use crate::error::{QuizError, Result};
use sqlx::sqlite::{
    SqliteColumn, SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePool,
    SqlitePoolOptions, SqliteRow,
};
use sqlx::{Column as SqlxColumn, Executor, Row as SqlxRow, TypeInfo, ValueRef};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

/// The 16-byte magic every SQLite database file starts with.
pub const SQLITE_HEADER: &[u8; 16] = b"SQLite format 3\0";

/// Opens a single-connection pool on an existing database file.
///
/// Rollback-journal mode is forced so that nothing but the database file
/// itself carries committed state.
pub(crate) async fn open_pool(path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(false)
        .journal_mode(SqliteJournalMode::Delete)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
        .map_err(|e| {
            QuizError::invalid_file(format!(
                "Failed to open database at {}: {}",
                path.display(),
                format_query_error(e)
            ))
        })
}

/// Runs SQLite's structural check on an opened database.
pub(crate) async fn quick_check(pool: &SqlitePool) -> Result<()> {
    let verdict: String = sqlx::query_scalar("PRAGMA quick_check(1)")
        .fetch_one(pool)
        .await
        .map_err(|e| QuizError::invalid_file(format!("Not a database: {}", format_query_error(e))))?;

    if verdict.eq_ignore_ascii_case("ok") {
        Ok(())
    } else {
        Err(QuizError::invalid_file(format!("Database is damaged: {verdict}")))
    }
}

/// Runs one statement on `conn` and collects every row it returns.
///
/// User text is never cached as a persistent prepared statement, including
/// the describe used to recover column names of an empty result.
pub(crate) async fn fetch_result(conn: &mut SqliteConnection, sql: &str) -> Result<QueryResult> {
    let start = Instant::now();

    let rows = sqlx::query(sql)
        .persistent(false)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| QuizError::execution(format_query_error(e)))?;

    let execution_time = start.elapsed();

    // Empty results carry no row to read column metadata from
    let columns = match rows.first() {
        Some(first) => column_info(first.columns()),
        None => match (&mut *conn).describe(sql).await {
            Ok(described) => column_info(described.columns()),
            Err(e) => {
                debug!("Could not describe columns for empty result: {e}");
                Vec::new()
            }
        },
    };

    let rows: Vec<Row> = rows.iter().map(convert_row).collect();

    Ok(QueryResult::with_data(columns, rows).with_execution_time(execution_time))
}

/// Runs one statement on `conn`, discarding any rows.
pub(crate) async fn execute_statement(conn: &mut SqliteConnection, sql: &str) -> Result<u64> {
    sqlx::query(sql)
        .persistent(false)
        .execute(&mut *conn)
        .await
        .map(|done| done.rows_affected())
        .map_err(|e| QuizError::execution(format_query_error(e)))
}

fn column_info(columns: &[SqliteColumn]) -> Vec<ColumnInfo> {
    columns
        .iter()
        .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
        .collect()
}

/// Converts a sqlx SqliteRow to our Row type.
pub fn convert_row(row: &SqliteRow) -> Row {
    (0..row.columns().len())
        .map(|i| convert_value(row, i))
        .collect()
}

/// Converts a single column value to our Value type.
///
/// SQLite is dynamically typed, so the storage class of each value decides
/// the conversion rather than the declared column type.
fn convert_value(row: &SqliteRow, index: usize) -> Value {
    let storage_class = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_uppercase(),
        Err(_) => return Value::Null,
    };

    let converted = match storage_class.as_str() {
        "INTEGER" | "INT" | "INT8" | "BIGINT" => row.try_get::<i64, _>(index).map(Value::Int),
        "REAL" | "FLOAT" | "DOUBLE" => row.try_get::<f64, _>(index).map(Value::Float),
        "BOOLEAN" => row.try_get::<bool, _>(index).map(Value::Bool),
        "BLOB" => row.try_get::<Vec<u8>, _>(index).map(Value::Bytes),
        _ => row.try_get::<String, _>(index).map(Value::String),
    };

    converted
        .or_else(|_| row.try_get_unchecked::<String, _>(index).map(Value::String))
        .unwrap_or(Value::Null)
}

/// Formats a driver error as a short, single-line message.
pub fn format_query_error(error: sqlx::Error) -> String {
    match error.as_database_error() {
        Some(db_error) => match db_error.code() {
            Some(code) => format!("{} (code {})", db_error.message(), code),
            None => db_error.message().to_string(),
        },
        None => error.to_string(),
    }
}
