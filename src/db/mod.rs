//! Database abstraction layer.
//!
//! Each supported backend is a `Dialect` variant that knows how to open a
//! handle and which catalog queries to run for introspection.

#[cfg(test)]
pub(crate) mod fixtures;
mod schema;
mod sqlite;
mod types;

pub use schema::{SampleData, SchemaSnapshot};
pub use sqlite::{convert_row, format_query_error, SQLITE_HEADER};
pub(crate) use sqlite::{execute_statement, fetch_result, quick_check};
pub use types::{ColumnInfo, Effect, QueryResult, Row, Value};

use crate::error::Result;
use crate::safety::quote_ident;
use sqlx::SqlitePool;
use std::path::Path;

/// Supported database dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Sqlite,
}

impl Dialect {
    /// Returns the dialect as a string for persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
        }
    }

    /// Parses a dialect from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Some(Self::Sqlite),
            _ => None,
        }
    }

    /// Returns the name used when telling a quiz generator which syntax to write.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Sqlite => "SQLite",
        }
    }

    /// Opens a handle on the database file at `path`.
    ///
    /// The file must already exist; nothing is created.
    pub async fn open(&self, path: &Path) -> Result<SqlitePool> {
        match self {
            Self::Sqlite => sqlite::open_pool(path).await,
        }
    }

    /// Catalog query listing user tables in catalog order.
    pub fn list_tables_query(&self) -> &'static str {
        match self {
            Self::Sqlite => {
                "SELECT tbl_name FROM sqlite_schema WHERE type = 'table' AND name NOT LIKE 'sqlite_%';"
            }
        }
    }

    /// Catalog query returning the raw definitions of tables and views.
    pub fn schema_query(&self) -> &'static str {
        match self {
            Self::Sqlite => {
                "SELECT sql FROM sqlite_schema WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%';"
            }
        }
    }

    /// Query returning the first `limit` rows of `table`.
    pub fn sample_query(&self, table: &str, limit: usize) -> String {
        match self {
            Self::Sqlite => format!("SELECT * FROM {} LIMIT {};", quote_ident(table), limit),
        }
    }

    /// Query returning the number of rows in `table`.
    pub fn count_query(&self, table: &str) -> String {
        match self {
            Self::Sqlite => format!("SELECT COUNT(*) FROM {};", quote_ident(table)),
        }
    }

    /// Query returning the full contents of an object.
    pub fn contents_query(&self, quoted_object: &str) -> String {
        match self {
            Self::Sqlite => format!("SELECT * FROM {};", quoted_object),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
