//! Mock quiz generator for testing.
//!
//! Returns scripted responses in order and records what it was asked.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{QuizError, Result};

use super::{QuizGenerator, QuizRequest};

#[derive(Debug, Clone)]
enum Scripted {
    Response(String),
    Failure(String),
}

/// Quiz generator that replays a fixed script.
///
/// Used for unit testing without a real generator.
#[derive(Debug, Default)]
pub struct MockQuizGenerator {
    script: Mutex<VecDeque<Scripted>>,
    corrections: Mutex<Vec<Option<String>>>,
}

impl MockQuizGenerator {
    /// Creates a mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a response document to the script.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.push(Scripted::Response(response.into()));
        self
    }

    /// Appends a generator failure to the script.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(Scripted::Failure(message.into()));
        self
    }

    fn push(&self, entry: Scripted) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(entry);
        }
    }

    /// Number of times `generate` was called.
    pub fn calls(&self) -> usize {
        self.corrections.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Correction notes received, one per call.
    pub fn corrections(&self) -> Vec<Option<String>> {
        self.corrections
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QuizGenerator for MockQuizGenerator {
    async fn generate(&self, _request: &QuizRequest, correction: Option<&str>) -> Result<String> {
        if let Ok(mut corrections) = self.corrections.lock() {
            corrections.push(correction.map(str::to_string));
        }

        let next = self
            .script
            .lock()
            .map_err(|_| QuizError::generation("mock script poisoned"))?
            .pop_front();

        match next {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Failure(message)) => Err(QuizError::generation(message)),
            None => Err(QuizError::generation("mock script exhausted")),
        }
    }
}
