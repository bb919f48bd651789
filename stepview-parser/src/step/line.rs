//! A tokenized source line

use super::token::{Token, TokenKind};
use serde::Serialize;

/// One line of the source file, tokenized.
///
/// Lines are created once per load and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    /// Zero-based position in the source file
    pub index: usize,
    /// Record identifier, present only for lines starting with `#<digits>=`
    pub identifier: Option<u64>,
    /// The raw line text
    pub text: String,
    pub tokens: Vec<Token>,
}

impl Line {
    /// Join the token texts back together.
    ///
    /// Always equal to `text`.
    pub fn reconstruct(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    /// Reference tokens in left-to-right order
    pub fn references(&self) -> impl Iterator<Item = &Token> {
        self.tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Reference)
    }

    /// The token covering the given character column.
    ///
    /// Empty tokens never cover a column.
    pub fn token_at_column(&self, column: usize) -> Option<&Token> {
        let mut start = 0;
        for token in &self.tokens {
            let end = start + token.char_len();
            if column >= start && column < end {
                return Some(token);
            }
            start = end;
        }
        None
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::lexing::{tokenize_line, SplitMode};

    #[test]
    fn test_token_at_column() {
        let line = tokenize_line(0, "#1=A(#2);", SplitMode::Naive);
        assert_eq!(line.token_at_column(0).unwrap().text, "#1");
        assert_eq!(line.token_at_column(1).unwrap().text, "#1");
        assert_eq!(line.token_at_column(2).unwrap().text, "=");
        assert_eq!(line.token_at_column(5).unwrap().text, "#2");
        assert_eq!(line.token_at_column(8).unwrap().text, ";");
        assert!(line.token_at_column(9).is_none());
    }

    #[test]
    fn test_references_in_order() {
        let line = tokenize_line(0, "#1=A(#3,$,#2);", SplitMode::Naive);
        let refs: Vec<_> = line.references().map(|t| t.text.as_str()).collect();
        assert_eq!(refs, vec!["#3", "#2"]);
    }
}
