//! Document: the immutable result of one load
//!
//! A document bundles the tokenized lines, the identifier index and the forest
//! outcome. It is built in a single pass and never modified; a reload builds a new one.
//!
//! The forest is allowed to fail on its own. When it does, the document still loads and
//! the flat line view stays usable; [Document::forest] returns None and
//! [Document::forest_error] says why.

use super::error::{ForestError, LoadError};
use super::forest::{Forest, ForestNode};
use super::index::IdentifierIndex;
use super::lexing::{tokenize_source, SplitMode};
use super::line::Line;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<Line>,
    index: IdentifierIndex,
    forest: Result<Forest, ForestError>,
    split_mode: SplitMode,
}

impl Document {
    /// Tokenize the source, index its records and build the forest
    pub fn parse(source: &str, split_mode: SplitMode) -> Self {
        let lines = tokenize_source(source, split_mode);
        let index = IdentifierIndex::build(&lines);
        let forest = Forest::build(&lines, &index);
        if let Err(err) = &forest {
            warn!(%err, "reference forest unavailable");
        }
        debug!(
            lines = lines.len(),
            records = index.len(),
            split_mode = split_mode.as_str(),
            "parsed document"
        );
        Document {
            lines,
            index,
            forest,
            split_mode,
        }
    }

    /// Parse raw bytes, which must be UTF-8
    pub fn from_bytes(bytes: &[u8], split_mode: SplitMode) -> Result<Self, LoadError> {
        let source = std::str::from_utf8(bytes)?;
        Ok(Self::parse(source, split_mode))
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn index(&self) -> &IdentifierIndex {
        &self.index
    }

    pub fn split_mode(&self) -> SplitMode {
        self.split_mode
    }

    /// Line index of the record declaring `identifier`
    pub fn lookup(&self, identifier: u64) -> Option<usize> {
        self.index.lookup(identifier)
    }

    /// Resolve reference text such as `#42` to the declaring line
    pub fn resolve_reference(&self, text: &str) -> Option<usize> {
        let digits = text.strip_prefix('#')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.lookup(digits.parse().ok()?)
    }

    /// The forest, or None when it could not be built
    pub fn forest(&self) -> Option<&Forest> {
        self.forest.as_ref().ok()
    }

    pub fn forest_error(&self) -> Option<&ForestError> {
        self.forest.as_ref().err()
    }

    pub fn forest_result(&self) -> Result<&Forest, &ForestError> {
        self.forest.as_ref()
    }

    /// The line a forest node wraps
    pub fn record_line(&self, node: &ForestNode) -> Option<&Line> {
        self.lines.get(node.line)
    }

    /// Display label of a forest node: the record text, trimmed
    pub fn label(&self, node: &ForestNode) -> String {
        match self.record_line(node) {
            Some(line) => line.text.trim().to_string(),
            None => format!("#{}", node.identifier),
        }
    }
}

/// Parse a document with the default split mode
pub fn parse_document(source: &str) -> Document {
    Document::parse(source, SplitMode::default())
}
