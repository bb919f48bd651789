//! Error types for loading and forest construction
//!
//! Anomalies inside the file (dangling references, duplicate identifiers, cycles,
//! empty tokens) are never errors. These types cover the two failure scopes that
//! exist: a whole load, and the forest on top of an otherwise loaded file.

use std::path::PathBuf;
use thiserror::Error;

/// A load that could not produce a document at all
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why the forest view is unavailable for a loaded document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForestError {
    /// A reference token whose number does not fit an identifier
    #[error("line {}: malformed reference {text}", .line + 1)]
    MalformedReference { line: usize, text: String },

    /// The identifier index points at a line that is not a record
    #[error("identifier #{identifier} maps to line {line}, which is not a record")]
    IndexOutOfRange { identifier: u64, line: usize },
}
