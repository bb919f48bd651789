//! Expanded, owned view of the forest for serializers
//!
//! The forest shares nodes between parents; a snapshot spells every occurrence out as
//! its own subtree, the shape serializers and tree printers want. Expansion uses a
//! path-local guard: a node already on the current path is emitted as a cyclic leaf.
//!
//! Shared subtrees are repeated, and a chain of records each referencing the next one
//! twice doubles the occurrence count per level. Expansion is therefore bounded twice:
//! by depth, and by the total number of occurrences whose children get expanded. A node
//! cut by either bound is marked as truncated.

use super::document::Document;
use super::error::ForestError;
use super::forest::Forest;
use serde::Serialize;

/// One occurrence of a record in the expanded forest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForestSnapshot {
    pub identifier: u64,
    pub line: usize,
    pub label: String,
    /// Closes a reference cycle; children are not expanded
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cyclic: bool,
    /// Has children, but the depth cap was reached
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ForestSnapshot>,
}

/// Expanded forest plus its diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForestReport {
    pub records: usize,
    pub roots: Vec<ForestSnapshot>,
    /// (parent, child) identifiers of edges closing a cycle
    pub cycles: Vec<(u64, u64)>,
    /// Identifiers of records no root reaches
    pub unreachable: Vec<u64>,
}

/// Bounds on how much of the forest a snapshot spells out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionLimits {
    /// Deepest level expanded, roots being level 1
    pub max_depth: usize,
    /// Most occurrences whose children are expanded, over the whole snapshot
    pub max_nodes: usize,
}

struct Expansion<'a> {
    doc: &'a Document,
    forest: &'a Forest,
    trail: Vec<usize>,
    max_depth: usize,
    remaining: usize,
}

impl Expansion<'_> {
    fn snapshot_node(&mut self, node_index: usize, depth: usize) -> ForestSnapshot {
        let forest = self.forest;
        let node = &forest.nodes()[node_index];
        let mut snapshot = ForestSnapshot {
            identifier: node.identifier,
            line: node.line,
            label: self.doc.label(node),
            cyclic: self.trail.contains(&node_index),
            truncated: false,
            children: Vec::new(),
        };
        if snapshot.cyclic || !node.has_children() {
            return snapshot;
        }
        if depth >= self.max_depth || self.remaining == 0 {
            snapshot.truncated = true;
            return snapshot;
        }

        self.remaining -= 1;
        self.trail.push(node_index);
        snapshot.children = node
            .children
            .iter()
            .map(|&child| self.snapshot_node(child, depth + 1))
            .collect();
        self.trail.pop();
        snapshot
    }
}

/// Expand every root of the forest within `limits`
pub fn snapshot_forest(
    doc: &Document,
    forest: &Forest,
    limits: ExpansionLimits,
) -> Vec<ForestSnapshot> {
    let mut expansion = Expansion {
        doc,
        forest,
        trail: Vec::new(),
        max_depth: limits.max_depth.max(1),
        remaining: limits.max_nodes,
    };
    forest
        .roots()
        .iter()
        .map(|&root| expansion.snapshot_node(root, 1))
        .collect()
}

/// Build the report for a document, or the reason its forest is unavailable
pub fn forest_report(
    doc: &Document,
    limits: ExpansionLimits,
) -> Result<ForestReport, &ForestError> {
    let forest = doc.forest_result()?;
    Ok(ForestReport {
        records: forest.len(),
        roots: snapshot_forest(doc, forest, limits),
        cycles: forest.cycle_edges(),
        unreachable: forest
            .unreachable()
            .into_iter()
            .map(|i| forest.nodes()[i].identifier)
            .collect(),
    })
}
