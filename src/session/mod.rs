//! Database sessions.
//!
//! A `DatabaseSession` owns the only live handle on the working copy of an
//! uploaded database. It is returned to callers only after the file has been
//! written, opened, introspected and admitted.

mod context;
pub mod working_copy;

pub use context::SessionContext;

use std::path::{Path, PathBuf};

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::{quick_check, Dialect, QueryResult, SampleData, SchemaSnapshot};
use crate::error::{QuizError, Result};
use crate::grading::{self, GradingOutcome};
use crate::query::{AdmissionPolicy, Introspector, QueryExecutor, DEFAULT_SAMPLE_ROWS};

/// Settings that shape session construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Fixed path of the working copy.
    pub working_path: PathBuf,
    /// Dialect of uploaded files.
    pub dialect: Dialect,
    /// Minimum dataset size.
    pub admission: AdmissionPolicy,
    /// Rows sampled per table for the quiz generator.
    pub sample_rows: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            working_path: working_copy::default_path(),
            dialect: Dialect::default(),
            admission: AdmissionPolicy::default(),
            sample_rows: DEFAULT_SAMPLE_ROWS,
        }
    }
}

impl SessionOptions {
    /// Returns default options with a different working path.
    pub fn with_working_path(path: impl Into<PathBuf>) -> Self {
        Self {
            working_path: path.into(),
            ..Self::default()
        }
    }
}

/// A live, admitted database ready for quizzing.
#[derive(Debug)]
pub struct DatabaseSession {
    dialect: Dialect,
    pool: SqlitePool,
    working_path: PathBuf,
    schema: SchemaSnapshot,
    tables: Vec<String>,
    sample_data: SampleData,
}

impl DatabaseSession {
    /// Builds a session from uploaded database bytes.
    ///
    /// Fails with `Io` if the working copy cannot be written, `InvalidFile`
    /// if it is not an openable database and `Admission` if it is too small.
    /// Nothing is returned until every step has succeeded.
    pub async fn create(bytes: &[u8], options: &SessionOptions) -> Result<Self> {
        let path = options.working_path.as_path();
        working_copy::replace(path, bytes)?;

        if !working_copy::has_sqlite_header(bytes) {
            return Err(QuizError::invalid_file("File is not a SQLite database"));
        }

        let pool = options.dialect.open(path).await?;

        match Self::inspect(&pool, options).await {
            Ok((schema, tables, sample_data)) => {
                info!(
                    "Session ready on {} ({} tables, {} definitions)",
                    path.display(),
                    tables.len(),
                    schema.len()
                );
                Ok(Self {
                    dialect: options.dialect,
                    pool,
                    working_path: path.to_path_buf(),
                    schema,
                    tables,
                    sample_data,
                })
            }
            Err(e) => {
                pool.close().await;
                Err(e)
            }
        }
    }

    /// Reads a database file from disk and builds a session from its bytes.
    pub async fn from_file(source: &Path, options: &SessionOptions) -> Result<Self> {
        let bytes = tokio::fs::read(source).await.map_err(|e| {
            QuizError::io(format!("Failed to read {}: {e}", source.display()))
        })?;
        Self::create(&bytes, options).await
    }

    async fn inspect(
        pool: &SqlitePool,
        options: &SessionOptions,
    ) -> Result<(SchemaSnapshot, Vec<String>, SampleData)> {
        quick_check(pool).await?;

        let introspector = Introspector::new(QueryExecutor::new(pool, options.dialect));
        let schema = introspector.get_schema().await.map_err(into_invalid_file)?;
        let tables = introspector.list_tables().await.map_err(into_invalid_file)?;

        introspector.admission_check(&options.admission).await?;

        let sample_data = introspector
            .sample_rows(&tables, options.sample_rows)
            .await?;

        Ok((schema, tables, sample_data))
    }

    /// Returns an executor bound to this session's handle.
    pub fn executor(&self) -> QueryExecutor<'_> {
        QueryExecutor::new(&self.pool, self.dialect)
    }

    /// Returns an introspector bound to this session's handle.
    pub fn introspector(&self) -> Introspector<'_> {
        Introspector::new(self.executor())
    }

    /// Validates and executes a statement without persisting anything.
    pub async fn execute(&self, sql: &str) -> Result<QueryResult> {
        self.executor().execute(sql).await
    }

    /// Grades a user's answer against the reference answer.
    pub async fn grade(&self, model_query: &str, user_query: &str) -> GradingOutcome {
        grading::grade(self, model_query, user_query).await
    }

    /// Returns the cached schema snapshot.
    ///
    /// Executed statements never persist, so this never goes stale.
    pub fn get_schema(&self) -> &SchemaSnapshot {
        &self.schema
    }

    /// Returns the cached table names in catalog order.
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// Returns the rows sampled at construction.
    pub fn sample_data(&self) -> &SampleData {
        &self.sample_data
    }

    /// Returns the dialect tag.
    pub fn rdbms(&self) -> Dialect {
        self.dialect
    }

    /// Returns the path of the working copy.
    pub fn working_path(&self) -> &Path {
        &self.working_path
    }

    /// Closes the handle and deletes the working copy.
    pub async fn close(self) -> Result<()> {
        self.pool.close().await;
        info!("Closed session on {}", self.working_path.display());
        working_copy::remove(&self.working_path)
    }
}

/// Catalog reads fail on files SQLite opened but cannot interpret.
fn into_invalid_file(e: QuizError) -> QuizError {
    match e {
        QuizError::Execution(msg) => {
            warn!("Catalog read failed: {msg}");
            QuizError::invalid_file(msg)
        }
        other => other,
    }
}
