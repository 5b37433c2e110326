//! Statement shape validation.
//!
//! A statement is accepted only if its first word is a supported verb and the
//! text ends with the one and only statement terminator. The single-terminator
//! rule rejects stacked statements such as `SELECT 1; DROP TABLE t;`.

use super::{QueryClass, Verb};

/// The statement terminator.
pub const TERMINATOR: char = ';';

/// Classifies raw SQL text.
///
/// Leading and trailing whitespace is ignored. A terminator inside a string
/// literal still counts as a terminator.
pub fn validate(text: &str) -> QueryClass {
    let trimmed = text.trim();

    let Some(first_word) = trimmed.split_whitespace().next() else {
        return QueryClass::Invalid;
    };

    let Some(verb) = Verb::from_keyword(&first_word.to_uppercase()) else {
        return QueryClass::Invalid;
    };

    if !trimmed.ends_with(TERMINATOR) || trimmed.matches(TERMINATOR).count() != 1 {
        return QueryClass::Invalid;
    }

    verb.class()
}
