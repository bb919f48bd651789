//! Treeviz formatter for the reference forest
//!
//! One line per record occurrence, nesting drawn with box connectors, 2 columns per level.
//! The first line is a virtual root summarizing the file.
//!
//!     <linum?><prefix><connector> <icon> <label>
//!
//! Example:
//!
//!     ⧉ 3 records, 1 root
//!     └─ ◆ #1=A(#2,#3);
//!       ├─ ◆ #2=B(#3);
//!       │ └─ ◆ #3=C();
//!       └─ ◆ #3=C();
//!
//! Icons
//!     File (virtual root): ⧉
//!     Record: ◆
//!     Cyclic occurrence (already on the path, not expanded): ↻
//!     Truncated occurrence (depth or occurrence cap reached): ⋯

use super::registry::{FormatError, Formatter};
use super::RenderOptions;
use crate::step::document::Document;
use crate::step::forest::Forest;
use crate::step::snapshot::{snapshot_forest, ForestSnapshot};

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn get_icon(snapshot: &ForestSnapshot) -> &'static str {
    if snapshot.cyclic {
        "↻"
    } else if snapshot.truncated {
        "⋯"
    } else {
        "◆"
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn format_snapshot(
    snapshot: &ForestSnapshot,
    prefix: &str,
    child_index: usize,
    child_count: usize,
    options: &RenderOptions,
) -> String {
    let mut output = String::new();

    let is_last = child_index == child_count - 1;
    let connector = if is_last { "└─" } else { "├─" };
    let linum_prefix = if options.show_line_numbers {
        format!("{:02} ", snapshot.line + 1)
    } else {
        String::new()
    };

    output.push_str(&format!(
        "{}{}{} {} {}\n",
        linum_prefix,
        prefix,
        connector,
        get_icon(snapshot),
        truncate(&snapshot.label, options.label_width)
    ));

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    let child_count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        output.push_str(&format_snapshot(
            child,
            &child_prefix,
            i,
            child_count,
            options,
        ));
    }

    output
}

fn format_forest(doc: &Document, forest: &Forest, options: &RenderOptions) -> String {
    let roots = snapshot_forest(doc, forest, options.limits());
    let mut output = format!(
        "⧉ {}, {}\n",
        plural(forest.len(), "record"),
        plural(roots.len(), "root")
    );
    let root_count = roots.len();
    for (i, root) in roots.iter().enumerate() {
        output.push_str(&format_snapshot(root, "", i, root_count, options));
    }
    output
}

/// Render the document's forest, or fail if it is unavailable
pub fn to_treeviz_str(doc: &Document, options: &RenderOptions) -> Result<String, FormatError> {
    let forest = doc.forest_result().map_err(|e| e.clone())?;
    Ok(format_forest(doc, forest, options))
}

/// Formatter implementation for treeviz format
pub struct TreevizFormatter {
    options: RenderOptions,
}

impl TreevizFormatter {
    pub fn new(options: RenderOptions) -> Self {
        TreevizFormatter { options }
    }
}

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        to_treeviz_str(doc, &self.options)
    }

    fn description(&self) -> &str {
        "Reference forest as an indented tree with Unicode icons"
    }
}
