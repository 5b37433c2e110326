//! Command-line argument parsing for sqlquiz.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Quiz yourself on SQL against your own SQLite database.
#[derive(Parser, Debug)]
#[command(name = "sqlquiz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Where to keep the private working copy of the database
    #[arg(long, global = true, value_name = "PATH", env = "SQLQUIZ_WORKING_COPY")]
    pub working_copy: Option<PathBuf>,

    /// Write logs to the log file instead of stderr
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Show the tables, definitions and sample rows of a database
    Schema {
        /// SQLite database file
        #[arg(value_name = "DB")]
        database: PathBuf,
    },

    /// Preview the effect of one statement without changing the database
    Run {
        /// SQLite database file
        #[arg(value_name = "DB")]
        database: PathBuf,

        /// A single statement ending in ';'
        #[arg(value_name = "SQL")]
        sql: String,
    },

    /// Grade an answer against a reference answer
    Grade {
        /// SQLite database file
        #[arg(value_name = "DB")]
        database: PathBuf,

        /// Reference answer
        #[arg(long, value_name = "SQL")]
        model: String,

        /// Answer to grade
        #[arg(long, value_name = "SQL")]
        answer: String,
    },

    /// Take a quiz, reading one answer per line from stdin
    Quiz {
        /// SQLite database file
        #[arg(value_name = "DB")]
        database: PathBuf,

        /// Quiz document with questions and reference answers
        #[arg(long, value_name = "PATH")]
        questions: PathBuf,
    },
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(sql_quizzer::config::Config::default_path)
    }

    /// Returns the database file named by the subcommand.
    pub fn database(&self) -> &Path {
        match &self.command {
            Command::Schema { database }
            | Command::Run { database, .. }
            | Command::Grade { database, .. }
            | Command::Quiz { database, .. } => database,
        }
    }
}
