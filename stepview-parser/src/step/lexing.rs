//! Lexing
//!
//!     Turns raw text into tokenized [Line]s. This is a pure, stateless stage: each line
//!     is handled on its own, and the same text always produces the same tokens.
//!
//! Stages
//!
//!     1. Source splitting: the text is cut into lines on `\n` or `\r\n`.
//!     2. Identifier extraction: `#<digits>=` at line start gives the record identifier.
//!        See [classify::extract_identifier].
//!     3. Delimiter splitting: see [split].
//!     4. Classification: each segment gets a [TokenKind](crate::step::token::TokenKind).
//!        See [classify].

pub mod classify;
pub mod split;

pub use classify::{classify, extract_identifier};
pub use split::{split_segments, SplitMode};

use crate::step::line::Line;
use crate::step::token::Token;

/// Split source text into lines.
///
/// Equivalent to splitting on `\r?\n`: a `\r` is only dropped when it precedes a
/// `\n`. A trailing newline produces a final empty line.
pub fn split_source_lines(source: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = source.split('\n').collect();
    let last = lines.len() - 1;
    for line in &mut lines[..last] {
        if let Some(stripped) = line.strip_suffix('\r') {
            *line = stripped;
        }
    }
    lines
}

/// Tokenize a single line of text
pub fn tokenize(text: &str, mode: SplitMode) -> Vec<Token> {
    split_segments(text, mode)
        .into_iter()
        .map(|segment| Token::new(segment, classify(segment)))
        .collect()
}

/// Tokenize a line and attach its position and identifier
pub fn tokenize_line(index: usize, text: &str, mode: SplitMode) -> Line {
    Line {
        index,
        identifier: extract_identifier(text),
        text: text.to_string(),
        tokens: tokenize(text, mode),
    }
}

/// Tokenize every line of a source text
pub fn tokenize_source(source: &str, mode: SplitMode) -> Vec<Line> {
    split_source_lines(source)
        .into_iter()
        .enumerate()
        .map(|(index, text)| tokenize_line(index, text, mode))
        .collect()
}
