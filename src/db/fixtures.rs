//! Database files for unit tests.

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode};
use sqlx::Connection;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Three tables that pass admission, plus one view.
pub const SHOP_SCRIPT: &str = "
CREATE TABLE customers (id INTEGER PRIMARY KEY, name TEXT NOT NULL, city TEXT);
CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT NOT NULL, price REAL NOT NULL);
CREATE TABLE orders (
    id INTEGER PRIMARY KEY,
    customer_id INTEGER NOT NULL REFERENCES customers(id),
    item_id INTEGER NOT NULL REFERENCES items(id),
    qty INTEGER DEFAULT 1
);
CREATE VIEW big_orders AS SELECT * FROM orders WHERE qty > 2;
INSERT INTO customers VALUES (1, 'Ada', 'London'), (2, 'Grace', 'New York'), (3, 'Alan', 'Manchester'), (4, 'Edsger', NULL);
INSERT INTO items VALUES (1, 'lamp', 19.5), (2, 'desk', 120.0), (3, 'chair', 45.25), (4, 'rug', 60.0), (5, 'mug', 4.0);
INSERT INTO orders VALUES (1, 1, 1, 1), (2, 1, 5, 4), (3, 2, 2, 1), (4, 3, 3, 2), (5, 4, 4, 3), (6, 2, 5, 1);
";

/// Two tables only.
pub const TWO_TABLE_SCRIPT: &str = "
CREATE TABLE a (id INTEGER);
CREATE TABLE b (id INTEGER);
INSERT INTO a VALUES (1), (2), (3), (4);
INSERT INTO b VALUES (1), (2), (3), (4);
";

/// Three tables, one of them with only three rows.
pub const SPARSE_SCRIPT: &str = "
CREATE TABLE a (id INTEGER);
CREATE TABLE b (id INTEGER);
CREATE TABLE c (id INTEGER);
INSERT INTO a VALUES (1), (2), (3), (4);
INSERT INTO b VALUES (1), (2), (3);
INSERT INTO c VALUES (1), (2), (3), (4);
";

/// Creates a database file at `path` by running each `;`-separated statement.
pub async fn build_database(path: &Path, script: &str) {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete);
    let mut conn = SqliteConnection::connect_with(&options).await.unwrap();

    for statement in script.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(statement).execute(&mut conn).await.unwrap();
    }

    conn.close().await.unwrap();
}

/// Builds a database from `script` in a fresh temp dir and returns its bytes.
pub async fn database_bytes(script: &str) -> Vec<u8> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("source.db");
    build_database(&path, script).await;
    std::fs::read(&path).unwrap()
}

/// Returns a temp dir and a working-copy path inside it.
pub fn working_path() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("work").join("user_db.db");
    (dir, path)
}
