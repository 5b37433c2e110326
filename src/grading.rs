//! Result comparison and grading.
//!
//! A user's answer is correct when it matches the reference answer textually
//! (after normalization) or when both execute and return exactly the same
//! rows in the same order. Column names are not compared.

use tracing::{debug, info};

use crate::db::QueryResult;
use crate::error::QuizError;
use crate::quiz::QuizItem;
use crate::session::DatabaseSession;

/// The verdict for a single answer.
#[derive(Debug, Clone, Default)]
pub struct GradingOutcome {
    /// Whether the answer is graded correct.
    pub correct: bool,
    /// Result of the reference answer, if it was executed and succeeded.
    pub model_result: Option<QueryResult>,
    /// Result of the user's answer, if it was executed and succeeded.
    pub user_result: Option<QueryResult>,
    /// False if the reference answer failed to execute.
    pub model_valid: bool,
    /// False if the user's answer failed to execute.
    pub user_valid: bool,
    /// Short diagnostic for a failed reference answer.
    pub model_error: Option<String>,
    /// Short diagnostic for a failed user answer.
    pub user_error: Option<String>,
    /// True if the verdict came from text comparison alone.
    pub textual_match: bool,
}

impl GradingOutcome {
    fn textual_match() -> Self {
        Self {
            correct: true,
            model_valid: true,
            user_valid: true,
            textual_match: true,
            ..Self::default()
        }
    }

    /// Returns true if nothing was executed.
    pub fn was_executed(&self) -> bool {
        !self.textual_match
    }
}

/// Lowercases and collapses whitespace so trivially different texts compare equal.
pub fn normalize(sql: &str) -> String {
    sql.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Grades `user_query` against `model_query`.
///
/// Never fails: execution errors on either side are folded into the outcome.
/// The two statements run one after the other.
pub async fn grade(session: &DatabaseSession, model_query: &str, user_query: &str) -> GradingOutcome {
    if normalize(model_query) == normalize(user_query) {
        debug!("Answer matches reference text");
        return GradingOutcome::textual_match();
    }

    let mut outcome = GradingOutcome {
        model_valid: true,
        user_valid: true,
        ..GradingOutcome::default()
    };

    match session.execute(model_query).await {
        Ok(result) => outcome.model_result = Some(result),
        Err(e) => {
            info!("Reference answer failed: {}", e);
            outcome.model_valid = false;
            outcome.model_error = Some(short_message(&e));
        }
    }

    match session.execute(user_query).await {
        Ok(result) => outcome.user_result = Some(result),
        Err(e) => {
            debug!("User answer failed: {}", e);
            outcome.user_valid = false;
            outcome.user_error = Some(short_message(&e));
        }
    }

    outcome.correct = match (&outcome.model_result, &outcome.user_result) {
        (Some(model), Some(user)) => model.same_rows(user),
        _ => false,
    };

    outcome
}

fn short_message(e: &QuizError) -> String {
    e.user_message().to_string()
}

/// Outcomes for a whole quiz, in question order.
#[derive(Debug, Clone, Default)]
pub struct QuizReport {
    pub outcomes: Vec<GradingOutcome>,
}

impl QuizReport {
    /// Number of correct answers.
    pub fn score(&self) -> usize {
        self.outcomes.iter().filter(|o| o.correct).count()
    }

    /// Number of graded questions.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Indices of questions whose reference answer did not execute.
    pub fn defective_questions(&self) -> Vec<usize> {
        self.outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| !o.model_valid)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Grades every answer against its question.
///
/// A missing answer is graded as an empty, invalid statement. Each question is
/// graded independently.
pub async fn grade_quiz(
    session: &DatabaseSession,
    items: &[QuizItem],
    answers: &[String],
) -> QuizReport {
    let mut outcomes = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let answer = answers.get(i).map(String::as_str).unwrap_or("");
        outcomes.push(grade(session, &item.answer, answer).await);
    }

    let report = QuizReport { outcomes };
    info!("Graded quiz: {}/{}", report.score(), report.total());
    report
}
