//! Quiz generation.
//!
//! A `QuizGenerator` turns a description of the loaded database into a raw
//! response document. The document is parsed into question/answer pairs and
//! every reference answer is executed against the session before the quiz is
//! handed out.

pub mod file;
pub mod generate;
pub mod mock;
pub mod parser;

pub use file::FileQuizGenerator;
pub use generate::{generate_quiz, GenerationOutcome};
pub use mock::MockQuizGenerator;
pub use parser::parse_quiz_response;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::session::DatabaseSession;

/// Topics used when none are configured.
pub const DEFAULT_TOPICS: [&str; 3] = ["WHERE", "GROUP BY", "Joins (INNER, LEFT, RIGHT, OUTER)"];

/// Default number of questions per quiz.
pub const DEFAULT_NUM_QUESTIONS: usize = 5;

/// A question and its reference answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    #[serde(rename = "quiz_question")]
    pub question: String,
    #[serde(rename = "correct_sql_answer")]
    pub answer: String,
}

impl QuizItem {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Everything a generator needs to know about the loaded database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRequest {
    /// Table and view definitions.
    pub schema: String,
    /// A few rows per table, formatted as text.
    pub samples: String,
    /// Display name of the SQL dialect answers must be written in.
    pub rdbms: String,
    /// Topics every answer should exercise.
    pub topics: Vec<String>,
    /// Number of questions to produce.
    pub num_questions: usize,
}

impl QuizRequest {
    /// Builds a request from a session's cached catalog state.
    pub fn from_session(session: &DatabaseSession, topics: &[String], num_questions: usize) -> Self {
        Self {
            schema: session.get_schema().to_sql(),
            samples: session.sample_data().format_for_generator(),
            rdbms: session.rdbms().display_name().to_string(),
            topics: topics.to_vec(),
            num_questions,
        }
    }
}

/// Source of raw quiz documents.
///
/// Implementations must be thread-safe (Send + Sync) to support async operations.
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    /// Produces a response document for the request.
    ///
    /// `correction` describes what was wrong with the previous attempt, if
    /// there was one.
    async fn generate(&self, request: &QuizRequest, correction: Option<&str>) -> Result<String>;
}
