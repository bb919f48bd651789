//! Output formats
//!
//! Serializers from a [Document](crate::step::document::Document) to text, collected in a
//! [FormatRegistry](registry::FormatRegistry):
//!
//!     tokens-json     every line with its tokens, as JSON
//!     tokens-simple   one row per line: `index: kind(text) kind(text) ...`
//!     treeviz         the forest as an indented tree with icons
//!     forest-json     the expanded forest plus cycle diagnostics, as JSON
//!     forest-yaml     the same, as YAML
//!
//! Forest formats fail when the document's forest is unavailable; token formats always
//! succeed.

pub mod forest;
pub mod registry;
pub mod tokens;
pub mod treeviz;

pub use forest::{ForestJsonFormatter, ForestYamlFormatter};
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use tokens::{TokensJsonFormatter, TokensSimpleFormatter};
pub use treeviz::{to_treeviz_str, TreevizFormatter};

use crate::step::snapshot::ExpansionLimits;

/// Knobs shared by the forest renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Labels longer than this many characters are cut and end in `...`
    pub label_width: usize,
    /// Prefix every treeviz row with the 1-based source line
    pub show_line_numbers: bool,
    /// Expansion depth cap, roots being level 1
    pub max_depth: usize,
    /// Most record occurrences expanded in one rendering; shared subtrees repeat
    pub max_nodes: usize,
}

impl RenderOptions {
    pub fn limits(&self) -> ExpansionLimits {
        ExpansionLimits {
            max_depth: self.max_depth,
            max_nodes: self.max_nodes,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            label_width: 30,
            show_line_numbers: false,
            max_depth: 64,
            max_nodes: 10_000,
        }
    }
}
