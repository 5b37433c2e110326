//! Explicit session lifecycle.
//!
//! Holds at most one `DatabaseSession` at a time. Loading a new database
//! destroys the previous session before the next one is created.

use tracing::{info, warn};

use crate::error::{QuizError, Result};

use super::{DatabaseSession, SessionOptions};

/// The caller-owned slot carrying the active session between interactions.
#[derive(Debug)]
pub struct SessionContext {
    options: SessionOptions,
    session: Option<DatabaseSession>,
}

impl SessionContext {
    /// Creates an empty context.
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            session: None,
        }
    }

    /// Returns the options sessions are created with.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Replaces the active session with one built from `bytes`.
    ///
    /// The previous session is closed first, so on failure the context is
    /// left empty rather than holding a stale session.
    pub async fn load(&mut self, bytes: &[u8]) -> Result<&DatabaseSession> {
        self.unload().await?;

        let session = DatabaseSession::create(bytes, &self.options).await?;
        info!("Loaded database with {} tables", session.tables().len());
        Ok(self.session.insert(session))
    }

    /// Closes the active session, if any.
    pub async fn unload(&mut self) -> Result<()> {
        if let Some(previous) = self.session.take() {
            if let Err(e) = previous.close().await {
                warn!("Failed to clean up previous session: {e}");
                return Err(e);
            }
        }
        Ok(())
    }

    /// Returns the active session.
    pub fn session(&self) -> Result<&DatabaseSession> {
        self.session
            .as_ref()
            .ok_or_else(|| QuizError::invalid_file("no database loaded"))
    }

    /// Returns true if a session is active.
    pub fn is_loaded(&self) -> bool {
        self.session.is_some()
    }
}
