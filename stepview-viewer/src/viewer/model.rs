//! Data model for stepv
//!
//! The Model struct holds the pure application state:
//! - The loaded Document snapshot, or the reason nothing is loaded
//! - Current selection (either a text position or a forest occurrence)
//! - Expanded/collapsed state of forest occurrences
//! - The line briefly highlighted after a navigation
//!
//! The model is pure data and can be tested independently of rendering and UI logic.

use stepview_config::ViewerConfig;
use stepview_parser::step::forest::{is_cyclic_trail, Forest};
use stepview_parser::step::{Document, ForestError};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Most occurrences [Model::expand_to_depth] opens in one go
///
/// Shared records repeat under every parent, so a full expansion can be exponential in
/// the depth. Anything past the cap stays collapsed and can be opened by hand.
pub const MAX_AUTO_EXPANDED: usize = 2_000;

/// Which viewer currently has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// File viewer (text) has focus
    #[default]
    FileViewer,
    /// Tree viewer (forest) has focus
    TreeViewer,
}

impl Focus {
    /// Toggle focus to the other viewer
    pub fn toggle(&self) -> Focus {
        match self {
            Focus::FileViewer => Focus::TreeViewer,
            Focus::TreeViewer => Focus::FileViewer,
        }
    }
}

/// Stable identifier for one occurrence of a record in the forest view.
///
/// A NodeId is a path: the root's position among the forest roots, then child
/// positions. `[0, 1, 2]` means: root 0, its child 1, that node's child 2. The empty
/// path is the virtual file node above the roots.
///
/// A record referenced by several parents has one NodeId per occurrence, so each
/// occurrence collapses independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(Vec<usize>);

impl NodeId {
    pub fn new(path: &[usize]) -> Self {
        NodeId(path.to_vec())
    }

    /// The virtual file node
    pub fn root() -> Self {
        NodeId(Vec::new())
    }

    pub fn path(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the parent NodeId, or None if this is the root
    pub fn parent(&self) -> Option<NodeId> {
        let (_, rest) = self.0.split_last()?;
        Some(NodeId(rest.to_vec()))
    }

    pub fn child(&self, index: usize) -> NodeId {
        let mut path = self.0.clone();
        path.push(index);
        NodeId(path)
    }
}

/// Current selection in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Text position (row, col) - user is navigating the text view
    TextSelection(usize, usize),
    /// Forest occurrence - user is navigating the tree view
    TreeSelection(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The virtual root summarizing the file
    File,
    Record,
    /// Already on the path from its root; shown but never expanded
    Cyclic,
}

/// A node in the flattened tree representation
///
/// One row of a depth-first flattening of the forest, respecting expansion state.
#[derive(Debug, Clone)]
pub struct FlattenedTreeNode {
    pub node_id: NodeId,
    /// Depth in the tree (for indentation), the file node being 0
    pub depth: usize,
    pub label: String,
    pub is_expanded: bool,
    pub has_children: bool,
    pub kind: NodeKind,
    /// Source line of the record, None for the file node
    pub line: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Flash {
    line: usize,
    until: Instant,
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// The core data model
#[derive(Debug, Clone)]
pub struct Model {
    document: Option<Arc<Document>>,
    unloaded_reason: Option<String>,
    selection: Selection,
    expanded_nodes: HashSet<NodeId>,
    flash: Option<Flash>,
    flash_duration: Duration,
    expand_depth: usize,
}

impl Model {
    /// Create a model over a loaded document, expanded to the configured depth
    pub fn new(document: Arc<Document>, settings: &ViewerConfig) -> Self {
        let mut model = Self::empty(settings);
        model.replace_document(document);
        model
    }

    /// Create a model with nothing loaded
    pub fn unloaded(reason: impl Into<String>, settings: &ViewerConfig) -> Self {
        let mut model = Self::empty(settings);
        model.unload(reason);
        model
    }

    fn empty(settings: &ViewerConfig) -> Self {
        Model {
            document: None,
            unloaded_reason: None,
            selection: Selection::TextSelection(0, 0),
            expanded_nodes: HashSet::new(),
            flash: None,
            flash_duration: Duration::from_millis(settings.flash_millis),
            expand_depth: settings.expand_depth,
        }
    }

    /// Swap in a freshly loaded document.
    ///
    /// Expansion state is reset; a text cursor is kept when it still fits.
    pub fn replace_document(&mut self, document: Arc<Document>) {
        let line_count = document.line_count();
        self.document = Some(document);
        self.unloaded_reason = None;
        self.flash = None;
        self.expanded_nodes.clear();
        self.expand_to_depth(self.expand_depth);
        self.selection = match &self.selection {
            Selection::TextSelection(row, col) if *row < line_count => {
                Selection::TextSelection(*row, *col)
            }
            _ => Selection::TextSelection(0, 0),
        };
    }

    /// Drop the document; views show `reason` until the next successful load
    pub fn unload(&mut self, reason: impl Into<String>) {
        self.document = None;
        self.unloaded_reason = Some(reason.into());
        self.flash = None;
        self.expanded_nodes.clear();
        self.selection = Selection::TextSelection(0, 0);
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn unloaded_reason(&self) -> Option<&str> {
        self.unloaded_reason.as_deref()
    }

    pub fn forest(&self) -> Option<&Forest> {
        self.document()?.forest()
    }

    pub fn forest_error(&self) -> Option<&ForestError> {
        self.document()?.forest_error()
    }

    pub fn line_count(&self) -> usize {
        self.document().map_or(0, Document::line_count)
    }

    /// Length of a line in characters, 0 past the end
    pub fn line_len(&self, row: usize) -> usize {
        self.document()
            .and_then(|doc| doc.line(row))
            .map_or(0, |line| line.char_len())
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn select_position(&mut self, row: usize, col: usize) {
        self.selection = Selection::TextSelection(row, col);
    }

    pub fn select_node(&mut self, node_id: NodeId) {
        self.selection = Selection::TreeSelection(node_id);
    }

    /// Get the selected position if in text mode
    pub fn get_selected_position(&self) -> Option<(usize, usize)> {
        match self.selection {
            Selection::TextSelection(r, c) => Some((r, c)),
            _ => None,
        }
    }

    /// Get the selected node ID if in tree mode
    pub fn get_selected_node_id(&self) -> Option<NodeId> {
        match &self.selection {
            Selection::TreeSelection(id) => Some(id.clone()),
            _ => None,
        }
    }

    /// The occurrence the tree view should highlight for the current selection
    pub fn highlighted_node_id(&self) -> Option<NodeId> {
        match &self.selection {
            Selection::TreeSelection(id) => Some(id.clone()),
            Selection::TextSelection(row, col) => self.get_node_at_position(*row, *col),
        }
    }

    pub fn toggle_node_expansion(&mut self, node_id: &NodeId) {
        if !self.expanded_nodes.remove(node_id) {
            self.expanded_nodes.insert(node_id.clone());
        }
    }

    pub fn is_node_expanded(&self, node_id: &NodeId) -> bool {
        node_id.is_root() || self.expanded_nodes.contains(node_id)
    }

    /// Expand multiple nodes at once (e.g., all ancestors)
    pub fn expand_nodes(&mut self, node_ids: &[NodeId]) {
        self.expanded_nodes.extend(node_ids.iter().cloned());
    }

    /// Expand non-cyclic occurrences with children down to `depth`, roots being 1.
    ///
    /// Shallow levels are opened first, and at most [MAX_AUTO_EXPANDED] occurrences.
    pub fn expand_to_depth(&mut self, depth: usize) {
        let Some(forest) = self.forest() else {
            return;
        };
        let mut expand = Vec::new();
        let mut queue: VecDeque<(NodeId, Vec<usize>)> = forest
            .roots()
            .iter()
            .enumerate()
            .map(|(position, &root)| (NodeId::new(&[position]), vec![root]))
            .collect();
        while let Some((node_id, trail)) = queue.pop_front() {
            if expand.len() >= MAX_AUTO_EXPANDED {
                break;
            }
            if node_id.path().len() > depth || is_cyclic_trail(&trail) {
                continue;
            }
            let Some(&index) = trail.last() else {
                continue;
            };
            let node = &forest.nodes()[index];
            if !node.has_children() {
                continue;
            }
            for (position, &child) in node.children.iter().enumerate() {
                let mut child_trail = trail.clone();
                child_trail.push(child);
                queue.push_back((node_id.child(position), child_trail));
            }
            expand.push(node_id);
        }
        self.expanded_nodes.extend(expand);
    }

    /// Find the forest occurrence for a text position.
    ///
    /// Columns don't matter: a record is one line. The shortest path from any root is
    /// used when the record occurs several times. None for lines that are not records,
    /// records only reachable through a cycle, or an unavailable forest.
    pub fn get_node_at_position(&self, row: usize, _col: usize) -> Option<NodeId> {
        self.forest()?.path_to_line(row).map(NodeId)
    }

    /// Source line of an occurrence, None for the file node or a stale path
    pub fn get_line_for_node(&self, node_id: &NodeId) -> Option<usize> {
        let forest = self.forest()?;
        let trail = forest.resolve_path(node_id.path())?;
        let index = *trail.last()?;
        forest.node(index).map(|node| node.line)
    }

    /// Ancestors of a node from the file node down to its parent
    pub fn get_ancestors(&self, node_id: &NodeId) -> Vec<NodeId> {
        let path = node_id.path();
        (0..path.len()).map(|i| NodeId::new(&path[..i])).collect()
    }

    /// Depth-first flattening of the forest, respecting expanded/collapsed state.
    ///
    /// Empty when nothing is loaded or the forest is unavailable.
    pub fn flattened_tree(&self) -> Vec<FlattenedTreeNode> {
        let mut nodes = Vec::new();
        let (Some(doc), Some(forest)) = (self.document(), self.forest()) else {
            return nodes;
        };

        nodes.push(FlattenedTreeNode {
            node_id: NodeId::root(),
            depth: 0,
            label: format!(
                "{}, {}",
                plural(forest.len(), "record"),
                plural(forest.roots().len(), "root")
            ),
            is_expanded: true,
            has_children: !forest.roots().is_empty(),
            kind: NodeKind::File,
            line: None,
        });

        let mut trail = Vec::new();
        for (position, &root) in forest.roots().iter().enumerate() {
            trail.push(root);
            self.flatten_occurrence(doc, forest, NodeId::new(&[position]), &mut trail, &mut nodes);
            trail.pop();
        }
        nodes
    }

    fn flatten_occurrence(
        &self,
        doc: &Document,
        forest: &Forest,
        node_id: NodeId,
        trail: &mut Vec<usize>,
        nodes: &mut Vec<FlattenedTreeNode>,
    ) {
        let Some(node) = trail.last().and_then(|&index| forest.node(index)) else {
            return;
        };
        let cyclic = is_cyclic_trail(trail);
        let has_children = !cyclic && node.has_children();
        let is_expanded = has_children && self.is_node_expanded(&node_id);

        nodes.push(FlattenedTreeNode {
            node_id: node_id.clone(),
            depth: node_id.path().len(),
            label: doc.label(node),
            is_expanded,
            has_children,
            kind: if cyclic {
                NodeKind::Cyclic
            } else {
                NodeKind::Record
            },
            line: Some(node.line),
        });

        if is_expanded {
            for (position, &child) in node.children.iter().enumerate() {
                trail.push(child);
                self.flatten_occurrence(doc, forest, node_id.child(position), trail, nodes);
                trail.pop();
            }
        }
    }

    /// Highlight `line` for the configured flash duration
    pub fn flash_line(&mut self, line: usize) {
        self.flash = Some(Flash {
            line,
            until: Instant::now() + self.flash_duration,
        });
    }

    /// The line still flashing, if any
    pub fn flashed_line(&self) -> Option<usize> {
        self.flash
            .filter(|flash| Instant::now() < flash.until)
            .map(|flash| flash.line)
    }
}
