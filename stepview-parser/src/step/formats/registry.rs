//! Format registry for document serialization
//!
//! This module provides a pluggable registry system for document serialization formats.
//! Each format implements the `Formatter` trait and can be registered with `FormatRegistry`.

use super::RenderOptions;
use crate::step::document::Document;
use crate::step::error::ForestError;
use std::collections::HashMap;
use thiserror::Error;

/// Error that can occur during formatting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// The format needs the forest, which could not be built
    #[error("Forest unavailable: {0}")]
    ForestUnavailable(#[from] ForestError),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Trait for document formatters
///
/// Implementors provide a way to serialize a Document to a string representation.
pub trait Formatter: Send + Sync {
    /// The name of this format (e.g., "treeviz", "tokens-json")
    fn name(&self) -> &str;

    /// Serialize a document to this format
    fn serialize(&self, doc: &Document) -> Result<String, FormatError>;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }
}

/// Registry of document formatters
///
/// Provides a centralized registry for all available serialization formats.
/// Formats can be registered and retrieved by name.
pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter
    ///
    /// If a formatter with the same name already exists, it will be replaced.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    /// Get a formatter by name
    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Serialize a document using the specified format
    pub fn serialize(&self, doc: &Document, format: &str) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.serialize(doc)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Create a registry with the built-in formatters
    pub fn with_defaults(options: RenderOptions) -> Self {
        let mut registry = Self::new();

        registry.register(super::TokensJsonFormatter);
        registry.register(super::TokensSimpleFormatter);
        registry.register(super::TreevizFormatter::new(options));
        registry.register(super::ForestJsonFormatter::new(options));
        registry.register(super::ForestYamlFormatter::new(options));

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults(RenderOptions::default())
    }
}
