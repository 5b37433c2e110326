//! Transactional statement execution.
//!
//! Every statement runs inside a transaction that is always rolled back, so
//! the database file is byte-identical before and after each call. Mutating
//! and DDL statements report what they would have done: the full contents of
//! the touched table, or the schema as it stood before the rollback.

use std::time::Instant;

use sqlx::sqlite::{SqliteConnection, SqlitePool};
use sqlx::{Sqlite, Transaction};
use tracing::{debug, warn};

use crate::db::{
    execute_statement, fetch_result, format_query_error, Dialect, Effect, QueryResult,
};
use crate::error::{QuizError, Result};
use crate::safety::{validate, ObjectName, Query, QueryClass};

/// Runs classified statements against a database handle without ever committing.
#[derive(Debug, Clone, Copy)]
pub struct QueryExecutor<'a> {
    pool: &'a SqlitePool,
    dialect: Dialect,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new query executor.
    pub fn new(pool: &'a SqlitePool, dialect: Dialect) -> Self {
        Self { pool, dialect }
    }

    /// Returns the dialect statements are written in.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Classifies and executes a statement.
    ///
    /// Invalid statements fail with `QuizError::Validation` before the
    /// database is touched. Driver failures surface as `QuizError::Execution`
    /// only after the rollback has completed.
    pub async fn execute(&self, sql: &str) -> Result<QueryResult> {
        let query = Query::new(sql);

        match query.class() {
            QueryClass::Invalid => Err(invalid_statement()),
            QueryClass::Read => self.read(query.text()).await,
            QueryClass::Mutate => self.preview_mutation(&query).await,
            QueryClass::Ddl => self.preview_ddl(query.text()).await,
        }
    }

    /// Runs a read statement and returns all of its rows.
    ///
    /// The read runs in a rolled-back transaction as well, so a read-classified
    /// statement with side effects (such as a data-modifying CTE) cannot persist.
    /// Anything that does not classify as a single read fails with
    /// `QuizError::Validation` before a transaction is opened.
    pub(crate) async fn read(&self, sql: &str) -> Result<QueryResult> {
        if validate(sql) != QueryClass::Read {
            return Err(invalid_statement());
        }
        self.catalog(sql).await
    }

    /// Runs a catalog query built by this crate from quoted identifiers.
    ///
    /// A quoted table name may itself contain `;`, so this text does not go
    /// through the single-statement check.
    pub(super) async fn catalog(&self, sql: &str) -> Result<QueryResult> {
        let mut tx = self.begin().await?;
        let outcome = fetch_result(&mut tx, sql).await;
        finish(tx, QueryClass::Read, outcome).await
    }

    async fn preview_mutation(&self, query: &Query) -> Result<QueryResult> {
        let target = query.target().ok_or_else(|| {
            QuizError::execution("could not determine which table the statement changes")
        })?;

        let mut tx = self.begin().await?;
        let outcome = observe_mutation(&mut tx, self.dialect, query.text(), target).await;
        finish(tx, QueryClass::Mutate, outcome).await
    }

    async fn preview_ddl(&self, sql: &str) -> Result<QueryResult> {
        let mut tx = self.begin().await?;
        let outcome = observe_ddl(&mut tx, self.dialect, sql).await;
        finish(tx, QueryClass::Ddl, outcome).await
    }

    async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        self.pool.begin().await.map_err(|e| {
            QuizError::execution(format!(
                "Failed to begin transaction: {}",
                format_query_error(e)
            ))
        })
    }
}

fn invalid_statement() -> QuizError {
    QuizError::validation(
        "statement must start with SELECT, WITH, INSERT, UPDATE, DELETE, CREATE, ALTER or DROP \
         and end with a single ';'",
    )
}

/// Applies a data change and reads back the whole target table.
async fn observe_mutation(
    conn: &mut SqliteConnection,
    dialect: Dialect,
    sql: &str,
    target: ObjectName,
) -> Result<QueryResult> {
    let start = Instant::now();
    let affected = execute_statement(conn, sql).await?;
    debug!("Statement affected {} rows of {}", affected, target);

    let contents = fetch_result(conn, &dialect.contents_query(&target.quoted())).await?;

    Ok(contents
        .with_effect(Effect::TableContents(target))
        .with_execution_time(start.elapsed()))
}

/// Applies a schema change and reads back the resulting definitions.
async fn observe_ddl(conn: &mut SqliteConnection, dialect: Dialect, sql: &str) -> Result<QueryResult> {
    let start = Instant::now();
    execute_statement(conn, sql).await?;

    let schema = fetch_result(conn, dialect.schema_query()).await?;

    Ok(schema
        .with_effect(Effect::Schema)
        .with_execution_time(start.elapsed()))
}

/// Rolls back `tx` and then returns `outcome`.
///
/// The rollback runs on every path. A statement error takes precedence over a
/// rollback error; a rollback error after a successful statement is reported
/// as an execution failure.
async fn finish(
    tx: Transaction<'static, Sqlite>,
    class: QueryClass,
    outcome: Result<QueryResult>,
) -> Result<QueryResult> {
    let rollback = tx.rollback().await;

    match (outcome, rollback) {
        (Ok(result), Ok(())) => {
            debug!("Rolled back {} statement ({} rows observed)", class, result.row_count());
            Ok(result)
        }
        (Err(e), Ok(())) => {
            debug!("Rolled back failed {} statement: {}", class, e);
            Err(e)
        }
        (Ok(_), Err(rollback_error)) => {
            warn!("Rollback of {} statement failed: {}", class, rollback_error);
            Err(QuizError::execution(format!(
                "Failed to roll back: {}",
                format_query_error(rollback_error)
            )))
        }
        (Err(e), Err(rollback_error)) => {
            // SQLite ends the transaction itself on some errors
            debug!("Rollback after failed {} statement: {}", class, rollback_error);
            Err(e)
        }
    }
}
