//! Schema and table introspection.
//!
//! Every catalog read goes through the executor's read path.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::{SampleData, SchemaSnapshot};
use crate::error::{QuizError, Result};

use super::QueryExecutor;

/// Default number of rows sampled per table.
pub const DEFAULT_SAMPLE_ROWS: usize = 3;

/// Minimum dataset size accepted for quiz generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionPolicy {
    /// Minimum number of user tables.
    pub min_tables: usize,
    /// Minimum number of rows in every table.
    pub min_rows_per_table: i64,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            min_tables: 3,
            min_rows_per_table: 4,
        }
    }
}

/// Reads catalog state through a `QueryExecutor`.
#[derive(Debug, Clone, Copy)]
pub struct Introspector<'a> {
    executor: QueryExecutor<'a>,
}

impl<'a> Introspector<'a> {
    /// Creates an introspector on top of an executor.
    pub fn new(executor: QueryExecutor<'a>) -> Self {
        Self { executor }
    }

    /// Lists user table names in catalog order.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let result = self
            .executor
            .catalog(self.executor.dialect().list_tables_query())
            .await?;

        Ok(result
            .rows
            .iter()
            .filter_map(|row| row.first())
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect())
    }

    /// Fetches the raw definitions of all tables and views.
    pub async fn get_schema(&self) -> Result<SchemaSnapshot> {
        let result = self
            .executor
            .catalog(self.executor.dialect().schema_query())
            .await?;
        Ok(SchemaSnapshot::from_result(&result))
    }

    /// Fetches the first `limit` rows of each table.
    pub async fn sample_rows(&self, tables: &[String], limit: usize) -> Result<SampleData> {
        let mut samples = SampleData::new();
        for table in tables {
            let sql = self.executor.dialect().sample_query(table, limit);
            let result = self.executor.catalog(&sql).await?;
            samples.insert(table.clone(), result);
        }
        Ok(samples)
    }

    /// Counts the rows of one table.
    pub async fn count_rows(&self, table: &str) -> Result<i64> {
        let sql = self.executor.dialect().count_query(table);
        let result = self.executor.catalog(&sql).await?;
        result
            .rows
            .first()
            .and_then(|row| row.first())
            .and_then(|value| value.as_int())
            .ok_or_else(|| QuizError::execution(format!("Could not count rows of {table}")))
    }

    /// Fails with `QuizError::Admission` if the database is too small to quiz on.
    pub async fn admission_check(&self, policy: &AdmissionPolicy) -> Result<()> {
        let tables = self.list_tables().await?;

        if tables.len() < policy.min_tables {
            return Err(QuizError::admission(format!(
                "database contains {} tables ({} minimum)",
                tables.len(),
                policy.min_tables
            )));
        }

        for table in &tables {
            let rows = self.count_rows(table).await?;
            debug!("Table {} has {} rows", table, rows);
            if rows < policy.min_rows_per_table {
                return Err(QuizError::admission(format!(
                    "table {} contains {} rows ({} minimum)",
                    table, rows, policy.min_rows_per_table
                )));
            }
        }

        Ok(())
    }
}
