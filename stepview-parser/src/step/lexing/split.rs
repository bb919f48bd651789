//! Delimiter splitting
//!
//! A line is cut on `=`, `(`, `)`, `,` and on a `;` that ends the line. Each
//! delimiter is its own segment and the text between delimiters is a segment too,
//! even when empty. The output therefore always alternates text and delimiter and
//! starts and ends with text:
//!
//!     #1=A(#2);   ->   "#1" "=" "A" "(" "#2" ")" "" ";" ""
//!
//! Segments are contiguous slices of the line, so concatenating them gives the line
//! back in both modes.

use logos::Logos;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// How string literals interact with delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitMode {
    /// Split on every delimiter, even inside quotes: `'a,b'` becomes `'a` `,` `b'`.
    #[default]
    Naive,
    /// Delimiters inside single-quoted strings do not split. `''` is an embedded
    /// quote; an unterminated string runs to the end of the line.
    QuoteAware,
}

impl SplitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitMode::Naive => "naive",
            SplitMode::QuoteAware => "quote-aware",
        }
    }
}

static DELIMITER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[=(),]|;$").unwrap());

/// Lexical pieces for the quote-aware scan
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Piece {
    #[token("=")]
    #[token("(")]
    #[token(")")]
    #[token(",")]
    Delimiter,
    #[token(";")]
    Semicolon,
    #[regex(r"'([^']|'')*'")]
    Quoted,
    #[regex(r"'([^']|'')*")]
    Unterminated,
    #[regex(r"[^=(),;']+")]
    Text,
}

/// Split a line into alternating text and delimiter segments
pub fn split_segments(text: &str, mode: SplitMode) -> Vec<&str> {
    match mode {
        SplitMode::Naive => split_naive(text),
        SplitMode::QuoteAware => split_quote_aware(text),
    }
}

fn split_naive(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut run_start = 0;
    for delimiter in DELIMITER_REGEX.find_iter(text) {
        segments.push(&text[run_start..delimiter.start()]);
        segments.push(delimiter.as_str());
        run_start = delimiter.end();
    }
    segments.push(&text[run_start..]);
    segments
}

fn split_quote_aware(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut run_start = 0;
    for (piece, span) in Piece::lexer(text).spanned() {
        let is_delimiter = match piece {
            Ok(Piece::Delimiter) => true,
            Ok(Piece::Semicolon) => span.end == text.len(),
            // quoted runs, plain text and anything logos rejects stay in the text run
            _ => false,
        };
        if is_delimiter {
            segments.push(&text[run_start..span.start]);
            segments.push(&text[span.start..span.end]);
            run_start = span.end;
        }
    }
    segments.push(&text[run_start..]);
    segments
}
