//! Logging setup for sqlquiz.
//!
//! The filter comes from `SQLQUIZ_LOG`, then `RUST_LOG`, then `info`. Logs go
//! to stderr unless `--log-file` asks for the log file in the state dir.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Environment variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "SQLQUIZ_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// Picks the target for the `--log-file` flag.
    pub fn from_flag(log_file: bool) -> Self {
        if log_file {
            Self::File(get_log_path())
        } else {
            Self::Stderr
        }
    }
}

/// Installs the global subscriber.
///
/// A log file that cannot be opened falls back to stderr with a warning.
pub fn init(target: LogTarget) {
    let filter = filter_from(
        std::env::var(LOG_ENV)
            .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
            .ok(),
    );

    match target {
        LogTarget::File(path) => match open_log_file(&path) {
            Ok(file) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init(),
            Err(e) => {
                eprintln!("Warning: Could not open {}: {e}", path.display());
                init(LogTarget::Stderr);
            }
        },
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init(),
    }
}

/// Parses a filter directive, falling back to `info` when absent or malformed.
fn filter_from(directive: Option<String>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Creates the parent directory and truncates the file.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

/// Returns the path for the log file.
///
/// `~/.local/state/sql-quizzer/sqlquiz.log` on Linux, the config dir where
/// there is no state dir, and the temp dir as a last resort.
pub fn get_log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::config_dir)
        .map(|dir| dir.join("sql-quizzer"))
        .unwrap_or_else(std::env::temp_dir)
        .join("sqlquiz.log")
}
