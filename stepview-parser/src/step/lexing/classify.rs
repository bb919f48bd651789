//! Token classification and record identifier extraction
//!
//! Classification is an ordered table of patterns, tried in declaration order; the
//! first match wins and anything left over is `unknown`. The order carries meaning:
//! `E` is a keyword rather than part of a number, `#42` is a reference, and so on.
//!
//! All digit classes are ASCII (`[0-9]`), never Unicode `\d`.

use crate::step::token::TokenKind;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Classification patterns as (kind, regex) pairs, in priority order.
///
/// `unknown` has no entry: it is the fallback when nothing here matches.
///
/// `.` in the string pattern matches any character but `\n`, including a lone `\r`
/// and the Unicode line separators, so `'a\rb'` is a string.
pub(crate) const TOKEN_PATTERNS: &[(TokenKind, &str)] = &[
    (TokenKind::Keyword, r"^[A-Z_][A-Z0-9_]*$"),
    (
        TokenKind::Number,
        r"^[+-]?[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?$",
    ),
    (TokenKind::String, r"^'.*'$"),
    (TokenKind::Flag, r"^\.[A-Z_]+\.$"),
    (TokenKind::Reference, r"^#[0-9]+$"),
    (TokenKind::Sign, r"^[*$]$"),
    (TokenKind::Separator, r"^[=(),;]$"),
];

static TOKEN_REGEXES: Lazy<Vec<(TokenKind, Regex)>> = Lazy::new(|| {
    TOKEN_PATTERNS
        .iter()
        .map(|(kind, pattern)| (*kind, Regex::new(pattern).unwrap()))
        .collect()
});

/// Lazy-compiled regex for the `#<digits>=` record declaration at line start
static IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#([0-9]+)=").unwrap());

/// Classify a token text. Total: every input, including "", gets exactly one kind.
pub fn classify(text: &str) -> TokenKind {
    TOKEN_REGEXES
        .iter()
        .find(|(_, regex)| regex.is_match(text))
        .map(|(kind, _)| *kind)
        .unwrap_or(TokenKind::Unknown)
}

/// Extract the record identifier declared at the start of a line.
///
/// Identifiers are positive integers. A `#0=` declaration, or one too large for
/// `u64`, is tolerated and yields no identifier.
pub fn extract_identifier(line: &str) -> Option<u64> {
    let digits = IDENTIFIER_REGEX.captures(line)?.get(1)?.as_str();
    match digits.parse::<u64>() {
        Ok(0) => {
            debug!("ignoring #0 record declaration");
            None
        }
        Ok(id) => Some(id),
        Err(err) => {
            debug!(%digits, %err, "ignoring unparsable record declaration");
            None
        }
    }
}
