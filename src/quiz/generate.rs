//! Quiz generation with a single corrective retry.

use tracing::{debug, info, warn};

use crate::error::{QuizError, Result};
use crate::session::DatabaseSession;

use super::{parse_quiz_response, QuizGenerator, QuizItem, QuizRequest};

/// Result of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Every reference answer parsed and executed.
    Generated {
        items: Vec<QuizItem>,
        /// Number of generator calls made (1 or 2).
        attempts: usize,
    },
    /// Both attempts were rejected; one reason per attempt.
    Failed { reasons: Vec<String> },
}

impl GenerationOutcome {
    /// Returns the generated items, or a `Generation` error listing the reasons.
    pub fn into_items(self) -> Result<Vec<QuizItem>> {
        match self {
            Self::Generated { items, .. } => Ok(items),
            Self::Failed { reasons } => Err(QuizError::generation(reasons.join("; "))),
        }
    }
}

enum Attempt {
    First,
    Retry { correction: String },
}

/// Asks `generator` for a quiz and checks every answer against the session.
///
/// A rejected first response is retried once with a note describing what was
/// wrong with it.
pub async fn generate_quiz(
    session: &DatabaseSession,
    generator: &dyn QuizGenerator,
    request: &QuizRequest,
) -> GenerationOutcome {
    let mut reasons = Vec::new();
    let mut state = Attempt::First;

    loop {
        let (attempt, correction) = match &state {
            Attempt::First => (1, None),
            Attempt::Retry { correction } => (2, Some(correction.as_str())),
        };

        match try_generate(session, generator, request, correction).await {
            Ok(items) => {
                info!("Generated {} questions on attempt {}", items.len(), attempt);
                return GenerationOutcome::Generated {
                    items,
                    attempts: attempt,
                };
            }
            Err(e) => {
                warn!("Quiz attempt {} rejected: {}", attempt, e);
                let reason = e.to_string();
                state = match state {
                    Attempt::First => Attempt::Retry {
                        correction: correction_note(&reason),
                    },
                    Attempt::Retry { .. } => {
                        reasons.push(reason);
                        return GenerationOutcome::Failed { reasons };
                    }
                };
                reasons.push(reason);
            }
        }
    }
}

async fn try_generate(
    session: &DatabaseSession,
    generator: &dyn QuizGenerator,
    request: &QuizRequest,
    correction: Option<&str>,
) -> Result<Vec<QuizItem>> {
    let response = generator.generate(request, correction).await?;
    let mut items = parse_quiz_response(&response)?;

    if items.len() > request.num_questions {
        debug!(
            "Generator returned {} questions, keeping {}",
            items.len(),
            request.num_questions
        );
        items.truncate(request.num_questions);
    }

    for (i, item) in items.iter().enumerate() {
        if let Err(e) = session.execute(&item.answer).await {
            return Err(QuizError::generation(format!(
                "answer to question {} does not run ({}): {}",
                i + 1,
                e.user_message(),
                item.answer
            )));
        }
    }

    Ok(items)
}

fn correction_note(reason: &str) -> String {
    format!(
        "The previous response was rejected: {reason}. Return only the JSON document, \
         with every answer a single statement that runs against this database."
    )
}
