//! Flat token formats

use super::registry::{FormatError, Formatter};
use crate::step::document::Document;
use crate::step::line::Line;

/// Every line with index, identifier, text and classified tokens, as pretty JSON
pub struct TokensJsonFormatter;

impl Formatter for TokensJsonFormatter {
    fn name(&self) -> &str {
        "tokens-json"
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        let mut json = serde_json::to_string_pretty(doc.lines())
            .map_err(|e| FormatError::Serialization(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }

    fn description(&self) -> &str {
        "Tokenized lines as JSON"
    }
}

/// One row per line: `index: kind(text) kind(text) ...`
pub struct TokensSimpleFormatter;

fn format_line(line: &Line) -> String {
    let tokens = line
        .tokens
        .iter()
        .map(|token| format!("{}({})", token.kind, token.text))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{}: {}\n", line.index, tokens)
}

impl Formatter for TokensSimpleFormatter {
    fn name(&self) -> &str {
        "tokens-simple"
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(doc.lines().iter().map(format_line).collect())
    }

    fn description(&self) -> &str {
        "One line of kind(text) tokens per source line"
    }
}
