//! Configuration management for sql-quizzer.
//!
//! Handles loading configuration from TOML files, with session and quiz
//! settings. Missing files and missing keys fall back to defaults.

use crate::error::{QuizError, Result};
use crate::query::{AdmissionPolicy, DEFAULT_SAMPLE_ROWS};
use crate::quiz::{DEFAULT_NUM_QUESTIONS, DEFAULT_TOPICS};
use crate::session::{working_copy, SessionOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Working copy and admission settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Quiz generation settings.
    #[serde(default)]
    pub quiz: QuizConfig,
}

/// Working copy and admission settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Where the working copy is written. Defaults to the platform cache dir.
    pub working_path: Option<PathBuf>,

    /// Minimum number of tables an uploaded database must have.
    #[serde(default = "default_min_tables")]
    pub min_tables: usize,

    /// Minimum number of rows each table must have.
    #[serde(default = "default_min_rows_per_table")]
    pub min_rows_per_table: i64,

    /// Rows sampled per table for the generator.
    #[serde(default = "default_sample_rows")]
    pub sample_rows: usize,
}

fn default_min_tables() -> usize {
    AdmissionPolicy::default().min_tables
}

fn default_min_rows_per_table() -> i64 {
    AdmissionPolicy::default().min_rows_per_table
}

fn default_sample_rows() -> usize {
    DEFAULT_SAMPLE_ROWS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            working_path: None,
            min_tables: default_min_tables(),
            min_rows_per_table: default_min_rows_per_table(),
            sample_rows: default_sample_rows(),
        }
    }
}

/// Quiz generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizConfig {
    /// Number of questions per quiz.
    #[serde(default = "default_num_questions")]
    pub num_questions: usize,

    /// Topics every reference answer should exercise.
    #[serde(default = "default_topics")]
    pub topics: Vec<String>,
}

fn default_num_questions() -> usize {
    DEFAULT_NUM_QUESTIONS
}

fn default_topics() -> Vec<String> {
    DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect()
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            num_questions: default_num_questions(),
            topics: default_topics(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sql-quizzer")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| QuizError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            QuizError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.quiz.num_questions == 0 {
            return Err(QuizError::config("quiz.num_questions must be at least 1"));
        }
        if self.session.min_rows_per_table < 0 {
            return Err(QuizError::config(
                "session.min_rows_per_table must not be negative",
            ));
        }
        Ok(())
    }

    /// Builds session options, with `working_path` taking precedence over the file.
    pub fn session_options(&self, working_path: Option<&Path>) -> SessionOptions {
        let working_path = working_path
            .map(Path::to_path_buf)
            .or_else(|| self.session.working_path.clone())
            .unwrap_or_else(working_copy::default_path);

        SessionOptions {
            working_path,
            admission: AdmissionPolicy {
                min_tables: self.session.min_tables,
                min_rows_per_table: self.session.min_rows_per_table,
            },
            sample_rows: self.session.sample_rows,
            ..SessionOptions::default()
        }
    }
}
