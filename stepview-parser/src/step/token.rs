//! Core token types shared by the lexer, the forest builder and the output formats.
//!
//! A token is a verbatim slice of one line plus its classification. Tokens are never
//! normalized or trimmed: joining the tokens of a line gives the line back.

use serde::Serialize;
use std::fmt;

/// The closed set of token classifications.
///
/// Declaration order matches the classification priority used by
/// [classify](crate::step::lexing::classify::classify).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// All-uppercase identifier such as an entity name: `IFCWALL`
    Keyword,
    /// Signed integer or real with optional exponent: `-1.5E-3`
    Number,
    /// Single-quoted literal: `'abc'`
    String,
    /// Enumeration or boolean marker: `.T.`
    Flag,
    /// Reference to another record: `#42`
    Reference,
    /// Unset (`$`) or derived (`*`) value
    Sign,
    /// One of `= ( ) , ;`
    Separator,
    /// Anything else, including the empty text between adjacent delimiters
    Unknown,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Flag => "flag",
            TokenKind::Reference => "reference",
            TokenKind::Sign => "sign",
            TokenKind::Separator => "separator",
            TokenKind::Unknown => "unknown",
        }
    }

    /// All kinds, in classification priority order
    pub const ALL: [TokenKind; 8] = [
        TokenKind::Keyword,
        TokenKind::Number,
        TokenKind::String,
        TokenKind::Flag,
        TokenKind::Reference,
        TokenKind::Sign,
        TokenKind::Separator,
        TokenKind::Unknown,
    ];
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified slice of a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Token {
            text: text.into(),
            kind,
        }
    }

    /// The identifier named by a `reference` token.
    ///
    /// Returns None for other kinds, and for references too large for `u64`.
    pub fn reference_target(&self) -> Option<u64> {
        if self.kind != TokenKind::Reference {
            return None;
        }
        self.text.strip_prefix('#')?.parse().ok()
    }

    /// Width of the token in characters (used for cursor hit-testing)
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
