//! Structured forest formats (JSON and YAML)

use super::registry::{FormatError, Formatter};
use super::RenderOptions;
use crate::step::document::Document;
use crate::step::snapshot::{forest_report, ForestReport};

fn report(doc: &Document, options: &RenderOptions) -> Result<ForestReport, FormatError> {
    forest_report(doc, options.limits()).map_err(|e| FormatError::ForestUnavailable(e.clone()))
}

/// Expanded forest with cycle diagnostics, as pretty JSON
pub struct ForestJsonFormatter {
    options: RenderOptions,
}

impl ForestJsonFormatter {
    pub fn new(options: RenderOptions) -> Self {
        ForestJsonFormatter { options }
    }
}

impl Formatter for ForestJsonFormatter {
    fn name(&self) -> &str {
        "forest-json"
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        let report = report(doc, &self.options)?;
        let mut json = serde_json::to_string_pretty(&report)
            .map_err(|e| FormatError::Serialization(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }

    fn description(&self) -> &str {
        "Expanded reference forest as JSON"
    }
}

/// Expanded forest with cycle diagnostics, as YAML
pub struct ForestYamlFormatter {
    options: RenderOptions,
}

impl ForestYamlFormatter {
    pub fn new(options: RenderOptions) -> Self {
        ForestYamlFormatter { options }
    }
}

impl Formatter for ForestYamlFormatter {
    fn name(&self) -> &str {
        "forest-yaml"
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        let report = report(doc, &self.options)?;
        serde_yaml::to_string(&report).map_err(|e| FormatError::Serialization(e.to_string()))
    }

    fn description(&self) -> &str {
        "Expanded reference forest as YAML"
    }
}
