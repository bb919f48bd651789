//! Shared configuration loader for the stepview tools.
//!
//! `defaults/stepview.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`StepviewConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use stepview_parser::step::formats::RenderOptions;
use stepview_parser::step::SplitMode;

const DEFAULT_TOML: &str = include_str!("../defaults/stepview.default.toml");

/// File name picked up from the working directory when present.
pub const LOCAL_CONFIG_FILE: &str = "stepview.toml";

/// Top-level configuration consumed by stepview applications.
#[derive(Debug, Clone, Deserialize)]
pub struct StepviewConfig {
    pub tokenizer: TokenizerConfig,
    pub output: OutputConfig,
    pub viewer: ViewerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenizerConfig {
    pub split_mode: SplitMode,
}

/// Output knobs for the CLI formats.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: String,
    pub label_width: usize,
    pub show_line_numbers: bool,
    pub max_depth: usize,
    pub max_nodes: usize,
}

impl OutputConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            label_width: self.label_width,
            show_line_numbers: self.show_line_numbers,
            max_depth: self.max_depth,
            max_nodes: self.max_nodes,
        }
    }
}

/// Terminal viewer layout and behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    pub tree_width: u16,
    pub expand_depth: usize,
    pub flash_millis: u64,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<StepviewConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Defaults, then `stepview.toml` from the working directory, then `explicit` if given.
pub fn load_layered(explicit: Option<&Path>) -> Result<StepviewConfig, ConfigError> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    if let Some(path) = explicit {
        loader = loader.with_file(path);
    }
    loader.build()
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<StepviewConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.tokenizer.split_mode, SplitMode::Naive);
        assert_eq!(config.output.format, "treeviz");
        assert_eq!(config.output.render_options(), RenderOptions::default());
        assert_eq!(config.viewer.tree_width, 36);
        assert_eq!(config.viewer.expand_depth, 1);
        assert_eq!(config.viewer.flash_millis, 1500);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("tokenizer.split_mode", "quote-aware")
            .expect("override to apply")
            .set_override("output.label_width", 12_i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.tokenizer.split_mode, SplitMode::QuoteAware);
        assert_eq!(config.output.render_options().label_width, 12);
    }

    #[test]
    fn rejects_unknown_split_mode() {
        let result = Loader::new()
            .set_override("tokenizer.split_mode", "smart")
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[viewer]\ntree_width = 50").unwrap();

        let config = Loader::new().with_file(file.path()).build().unwrap();
        assert_eq!(config.viewer.tree_width, 50);
        // untouched keys keep their defaults
        assert_eq!(config.viewer.flash_millis, 1500);
        assert_eq!(config.output.max_nodes, 10_000);
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new()
            .with_file("/definitely/not/here/stepview.toml")
            .build();
        assert!(result.is_err());
    }
}
