use serde::Serialize;

use crate::parse::span::CharSpan;

/// Classification of a token produced by the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Plain whitespace-delimited text
    Word,
    /// `<...>` group, or a `[...]` group whose content is a date expression
    Date,
    /// Any other `[...]` group, e.g. `[#A]`
    Priority,
}

/// A token of a single outline line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Exact text consumed, brackets included
    pub value: String,
    pub kind: TokenKind,
    pub span: CharSpan,
}

impl Token {
    pub fn is_date(&self) -> bool {
        self.kind == TokenKind::Date
    }

    pub fn is_priority(&self) -> bool {
        self.kind == TokenKind::Priority
    }
}
