//! Target object extraction for non-read statements.
//!
//! Uses sqlparser's tokenizer (not its parser) so that quoted identifiers and
//! `schema.table` names survive as single objects. Unquoted words are
//! uppercased; quoted words keep their exact text.

use std::fmt;

use sqlparser::dialect::SQLiteDialect;
use sqlparser::tokenizer::{Token, Tokenizer, Word};

use super::Verb;

/// Object-kind keywords skipped before the target name.
const OBJECT_KINDS: [&str; 2] = ["TABLE", "VIEW"];

/// Prepositions skipped before the target name.
const PREPOSITIONS: [&str; 2] = ["FROM", "INTO"];

/// Conflict clauses allowed after `INSERT OR` / `UPDATE OR`.
const CONFLICT_ACTIONS: [&str; 5] = ["ROLLBACK", "ABORT", "REPLACE", "FAIL", "IGNORE"];

/// A possibly schema-qualified object name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectName {
    parts: Vec<String>,
}

impl ObjectName {
    /// Creates a single-part name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            parts: vec![name.into()],
        }
    }

    /// Creates a name from its dot-separated parts.
    pub fn from_parts(parts: Vec<String>) -> Self {
        Self { parts }
    }

    /// Returns the dot-separated parts.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Returns the unqualified object name.
    pub fn object(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or("")
    }

    /// Renders the name with every part double-quoted.
    pub fn quoted(&self) -> String {
        self.parts
            .iter()
            .map(|part| quote_ident(part))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join("."))
    }
}

/// Double-quotes an identifier, escaping embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Returns the object a Mutate or DDL statement targets.
///
/// Walks the statement head: the verb, then `OR <conflict>` after INSERT or
/// UPDATE, `TEMP`/`TEMPORARY` after CREATE, the object kind, `IF [NOT]
/// EXISTS` after the kind, and FROM/INTO. Modifier words are only skipped
/// where the grammar allows them, so a table named `fail` or `temp` is still
/// found. Returns `None` if the text cannot be tokenized, does not start with
/// a known verb, or the name position is not an identifier.
pub fn extract_target(text: &str) -> Option<ObjectName> {
    let tokens: Vec<Token> = Tokenizer::new(&SQLiteDialect {}, text)
        .tokenize()
        .ok()?
        .into_iter()
        .filter(|token| !matches!(token, Token::Whitespace(_)))
        .collect();
    let mut cursor = Cursor { tokens, pos: 0 };

    let verb = Verb::from_keyword(&cursor.keyword_at(0)?)?;
    cursor.advance(1);

    if matches!(verb, Verb::Insert | Verb::Update)
        && cursor.keyword_at(0).as_deref() == Some("OR")
        && cursor.keyword_in(1, &CONFLICT_ACTIONS)
    {
        cursor.advance(2);
    }

    if verb == Verb::Create && cursor.keyword_in(0, &["TEMP", "TEMPORARY"]) {
        cursor.advance(1);
    }

    if cursor.keyword_in(0, &OBJECT_KINDS) {
        cursor.advance(1);
        if cursor.keyword_at(0).as_deref() == Some("IF") {
            if cursor.keyword_at(1).as_deref() == Some("EXISTS") {
                cursor.advance(2);
            } else if cursor.keyword_at(1).as_deref() == Some("NOT")
                && cursor.keyword_at(2).as_deref() == Some("EXISTS")
            {
                cursor.advance(3);
            }
        }
    }

    if cursor.keyword_in(0, &PREPOSITIONS) {
        cursor.advance(1);
    }

    let mut parts = vec![ident_text(cursor.word_at(0)?)];
    cursor.advance(1);
    while cursor.tokens.get(cursor.pos) == Some(&Token::Period) {
        parts.push(ident_text(cursor.word_at(1)?));
        cursor.advance(2);
    }

    Some(ObjectName::from_parts(parts))
}

struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    fn word_at(&self, offset: usize) -> Option<&Word> {
        match self.tokens.get(self.pos + offset) {
            Some(Token::Word(word)) => Some(word),
            _ => None,
        }
    }

    /// Uppercased text of an unquoted word; quoted words are never keywords.
    fn keyword_at(&self, offset: usize) -> Option<String> {
        self.word_at(offset)
            .filter(|word| word.quote_style.is_none())
            .map(|word| word.value.to_uppercase())
    }

    fn keyword_in(&self, offset: usize, keywords: &[&str]) -> bool {
        self.keyword_at(offset)
            .is_some_and(|keyword| keywords.contains(&keyword.as_str()))
    }
}

fn ident_text(word: &Word) -> String {
    match word.quote_style {
        Some(_) => word.value.clone(),
        None => word.value.to_uppercase(),
    }
}
