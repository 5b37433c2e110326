//! Parsing of generator responses.
//!
//! Generators tend to wrap the document in prose or code fences, so the
//! widest `{...}` span in the text is taken as the document.

use regex::Regex;
use serde::Deserialize;

use crate::error::{QuizError, Result};
use crate::safety::validate;

use super::QuizItem;

#[derive(Debug, Deserialize)]
struct QuizDocument {
    questions_and_answers: Vec<QuizItem>,
}

const JSON_OBJECT: &str = r"(?s)\{.*\}";

/// Parses a response document into quiz items.
///
/// Fails with `QuizError::Generation` if no document is found, it does not
/// decode, it holds no questions, or any answer is not a valid statement.
pub fn parse_quiz_response(response: &str) -> Result<Vec<QuizItem>> {
    let pattern = Regex::new(JSON_OBJECT).map_err(|e| QuizError::generation(e.to_string()))?;
    let json = pattern
        .find(response)
        .ok_or_else(|| QuizError::generation("no JSON object found in response"))?;

    let document: QuizDocument = serde_json::from_str(json.as_str())
        .map_err(|e| QuizError::generation(format!("malformed quiz document: {e}")))?;

    if document.questions_and_answers.is_empty() {
        return Err(QuizError::generation("quiz document contains no questions"));
    }

    for (i, item) in document.questions_and_answers.iter().enumerate() {
        if !validate(&item.answer).is_valid() {
            return Err(QuizError::generation(format!(
                "answer to question {} is not a valid statement: {}",
                i + 1,
                item.answer
            )));
        }
    }

    Ok(document.questions_and_answers)
}
