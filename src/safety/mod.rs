//! Query validation and classification.
//!
//! Accepts or rejects raw SQL text by its leading verb and terminator, and
//! derives the object a non-read statement targets.

mod extractor;
mod validator;

pub use extractor::{extract_target, quote_ident, ObjectName};
pub use validator::{validate, TERMINATOR};

use std::fmt;

/// How a statement is run by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryClass {
    /// Read-only queries (SELECT, WITH).
    Read,
    /// Data modification (INSERT, UPDATE, DELETE).
    Mutate,
    /// Schema changes (CREATE, ALTER, DROP).
    Ddl,
    /// Rejected before touching the database.
    Invalid,
}

impl QueryClass {
    /// Returns true for statements that run inside a rolled-back transaction
    /// and report an observed effect.
    pub fn is_previewed(&self) -> bool {
        matches!(self, Self::Mutate | Self::Ddl)
    }

    /// Returns true if the statement was accepted.
    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

impl fmt::Display for QueryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "Read"),
            Self::Mutate => write!(f, "Mutate"),
            Self::Ddl => write!(f, "DDL"),
            Self::Invalid => write!(f, "Invalid"),
        }
    }
}

/// The leading verb of an accepted statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Select,
    With,
    Insert,
    Update,
    Delete,
    Create,
    Alter,
    Drop,
}

impl Verb {
    /// All accepted verbs.
    pub const ALL: [Verb; 8] = [
        Verb::Select,
        Verb::With,
        Verb::Insert,
        Verb::Update,
        Verb::Delete,
        Verb::Create,
        Verb::Alter,
        Verb::Drop,
    ];

    /// Parses an already-uppercased keyword.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "SELECT" => Some(Self::Select),
            "WITH" => Some(Self::With),
            "INSERT" => Some(Self::Insert),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            "CREATE" => Some(Self::Create),
            "ALTER" => Some(Self::Alter),
            "DROP" => Some(Self::Drop),
            _ => None,
        }
    }

    /// Returns the keyword as it appears in SQL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::With => "WITH",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Create => "CREATE",
            Self::Alter => "ALTER",
            Self::Drop => "DROP",
        }
    }

    /// Returns the execution class this verb belongs to.
    pub fn class(&self) -> QueryClass {
        match self {
            Self::Select | Self::With => QueryClass::Read,
            Self::Insert | Self::Update | Self::Delete => QueryClass::Mutate,
            Self::Create | Self::Alter | Self::Drop => QueryClass::Ddl,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw SQL text together with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
    class: QueryClass,
}

impl Query {
    /// Classifies the given text.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let class = validate(&text);
        Self { text, class }
    }

    /// Returns the raw text as supplied.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the derived classification.
    pub fn class(&self) -> QueryClass {
        self.class
    }

    /// Returns the leading verb, if the statement was accepted.
    pub fn verb(&self) -> Option<Verb> {
        if !self.class.is_valid() {
            return None;
        }
        self.text
            .split_whitespace()
            .next()
            .and_then(|word| Verb::from_keyword(&word.to_uppercase()))
    }

    /// Returns the object a Mutate/DDL statement targets.
    pub fn target(&self) -> Option<ObjectName> {
        if self.class.is_previewed() {
            extract_target(&self.text)
        } else {
            None
        }
    }
}
