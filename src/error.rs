//! Error types for the quiz engine.
//!
//! Defines the main error enum used throughout the crate.

use thiserror::Error;

/// Main error type for quiz engine operations.
#[derive(Error, Debug)]
pub enum QuizError {
    /// Statement shape rejected before touching the database.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Driver-level failure (syntax error, constraint violation, missing object).
    #[error("Execution error: {0}")]
    Execution(String),

    /// Dataset below the minimum size thresholds.
    #[error("Admission error: {0}")]
    Admission(String),

    /// Working-copy write/read failure.
    #[error("IO error: {0}")]
    Io(String),

    /// Uploaded file is unopenable or not a valid database.
    #[error("Invalid file: {0}")]
    InvalidFile(String),

    /// Configuration errors (invalid config file, bad values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The quiz generator produced nothing usable.
    #[error("Generation error: {0}")]
    Generation(String),
}

impl QuizError {
    /// Creates a validation error with the given message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates an execution error with the given message.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Creates an admission error with the given message.
    pub fn admission(msg: impl Into<String>) -> Self {
        Self::Admission(msg.into())
    }

    /// Creates an IO error with the given message.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Creates an invalid-file error with the given message.
    pub fn invalid_file(msg: impl Into<String>) -> Self {
        Self::InvalidFile(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a generation error with the given message.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Validation Error",
            Self::Execution(_) => "Execution Error",
            Self::Admission(_) => "Admission Error",
            Self::Io(_) => "IO Error",
            Self::InvalidFile(_) => "Invalid File",
            Self::Config(_) => "Configuration Error",
            Self::Generation(_) => "Generation Error",
        }
    }

    /// Returns a short diagnostic suitable for showing to an end user.
    ///
    /// Driver messages stay in the logs; this never includes them.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(_) => {
                "query must start with a supported keyword and end with a single ';'"
            }
            Self::Execution(_) => "query could not be executed",
            Self::Admission(_) => {
                "database needs at least 3 tables with at least 4 rows each"
            }
            Self::Io(_) => "database file could not be written",
            Self::InvalidFile(_) => "invalid database uploaded, try another file",
            Self::Config(_) => "configuration could not be loaded",
            Self::Generation(_) => "quiz could not be generated",
        }
    }

    /// Returns true if this error came from the statement itself rather than the environment.
    pub fn is_query_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Execution(_))
    }
}

impl From<std::io::Error> for QuizError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Result type alias using QuizError.
pub type Result<T> = std::result::Result<T, QuizError>;
