//! The private on-disk copy of an uploaded database.
//!
//! There is exactly one working copy at a fixed path. It is deleted and
//! rewritten at the start of every session.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::db::SQLITE_HEADER;
use crate::error::{QuizError, Result};

/// Side files SQLite may leave next to a database.
const SIDE_FILE_SUFFIXES: [&str; 3] = ["-journal", "-wal", "-shm"];

/// Returns the default working-copy path for the current platform.
///
/// Uses the cache directory (`~/.cache/sql-quizzer/user_db.db` on Linux),
/// falling back to the temp directory.
pub fn default_path() -> PathBuf {
    if let Some(cache_dir) = dirs::cache_dir() {
        return cache_dir.join("sql-quizzer").join("user_db.db");
    }
    std::env::temp_dir().join("sql-quizzer").join("user_db.db")
}

/// Replaces whatever is at `path` with `bytes`.
///
/// Stale journal files are removed first; a leftover hot journal would
/// otherwise be replayed into the new copy.
pub fn replace(path: &Path, bytes: &[u8]) -> Result<()> {
    remove(path)?;
    ensure_parent_dirs(path)?;

    fs::write(path, bytes).map_err(|e| {
        QuizError::io(format!(
            "Database file could not be written to {}: {e}",
            path.display()
        ))
    })?;

    info!("Wrote {} byte working copy to {}", bytes.len(), path.display());
    Ok(())
}

/// Deletes the working copy and its side files, if present.
pub fn remove(path: &Path) -> Result<()> {
    remove_if_exists(path)?;
    for suffix in SIDE_FILE_SUFFIXES {
        remove_if_exists(&side_file(path, suffix))?;
    }
    Ok(())
}

/// Returns true if `bytes` start with the SQLite file header.
pub fn has_sqlite_header(bytes: &[u8]) -> bool {
    bytes.starts_with(SQLITE_HEADER)
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(QuizError::io(format!(
            "Failed to remove {}: {e}",
            path.display()
        ))),
    }
}

fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            QuizError::io(format!(
                "Failed to create directory {}: {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

fn side_file(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}
