//! Generator backed by a response document on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{QuizError, Result};

use super::{QuizGenerator, QuizRequest};

/// Serves a pre-written quiz document.
///
/// The file is re-read on every call, so a corrected document can be dropped
/// in place between attempts.
#[derive(Debug, Clone)]
pub struct FileQuizGenerator {
    path: PathBuf,
}

impl FileQuizGenerator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuizGenerator for FileQuizGenerator {
    async fn generate(&self, request: &QuizRequest, correction: Option<&str>) -> Result<String> {
        if let Some(note) = correction {
            debug!("Ignoring correction for file generator: {note}");
        }
        debug!(
            "Reading {} questions from {}",
            request.num_questions,
            self.path.display()
        );

        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            QuizError::generation(format!(
                "Failed to read quiz file {}: {e}",
                self.path.display()
            ))
        })
    }
}
