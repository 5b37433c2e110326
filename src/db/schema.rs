//! Schema snapshot and sample data types.
//!
//! A snapshot is the ordered list of raw `CREATE` statements for tables and
//! views, as stored in the catalog.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::{QueryResult, Row};

/// Ordered raw object definitions of a database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSnapshot {
    /// One `CREATE TABLE`/`CREATE VIEW` statement per object, in catalog order.
    pub definitions: Vec<String>,
}

impl SchemaSnapshot {
    /// Creates a snapshot from definitions.
    pub fn new(definitions: Vec<String>) -> Self {
        Self { definitions }
    }

    /// Builds a snapshot from the rows of a schema catalog query.
    ///
    /// NULL definitions are skipped.
    pub fn from_result(result: &QueryResult) -> Self {
        let definitions = result
            .rows
            .iter()
            .filter_map(|row| row.first())
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect();
        Self { definitions }
    }

    /// Returns the number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if the database has no tables or views.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Returns the schema as SQL text, one terminated statement per object.
    pub fn to_sql(&self) -> String {
        self.definitions
            .iter()
            .map(|definition| format!("{};", definition.trim_end_matches(';')))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Returns a hash of the definitions for cheap change detection.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.definitions.hash(&mut hasher);
        hasher.finish()
    }
}

/// The first few rows of every table, in table order.
#[derive(Debug, Clone, Default)]
pub struct SampleData {
    tables: Vec<(String, QueryResult)>,
}

impl SampleData {
    /// Creates empty sample data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the sample for one table.
    pub fn insert(&mut self, table: impl Into<String>, result: QueryResult) {
        self.tables.push((table.into(), result));
    }

    /// Returns the sampled rows for `table`.
    pub fn get(&self, table: &str) -> Option<&[Row]> {
        self.tables
            .iter()
            .find(|(name, _)| name == table)
            .map(|(_, result)| result.rows.as_slice())
    }

    /// Iterates over `(table, result)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryResult)> {
        self.tables.iter().map(|(name, result)| (name.as_str(), result))
    }

    /// Returns the number of sampled tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if nothing was sampled.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Formats the samples for a quiz generator.
    ///
    /// Produces one block per table with a header line and one line per row.
    pub fn format_for_generator(&self) -> String {
        self.tables
            .iter()
            .map(|(name, result)| {
                let header = result.column_names().join(" | ");
                let rows = result
                    .rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|v| v.to_display_string())
                            .collect::<Vec<_>>()
                            .join(" | ")
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("Table: {}\n{}\n{}\n", name, header, rows)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
