//! Reference forest
//!
//!     Records refer to each other with `#id` tokens. The forest turns those references
//!     into parent/child edges and roots the result at every record no other record
//!     references.
//!
//! Structure
//!
//!     Nodes live in an arena ([Forest::nodes]) and children are arena indices, so a
//!     record referenced by several parents is stored once and listed under each of
//!     them. Reference cycles are representable without any special casing; the arena
//!     itself is always finite.
//!
//!     An *occurrence* of a node is addressed by its path from a root: the root's
//!     position in [Forest::roots], followed by child positions. The same node can have
//!     many occurrences, each independently collapsible in a view.
//!
//! Cycles
//!
//!     Traversals guard against cycles with a path-local visited set: a child that is
//!     already on the current root-to-node path is a *cyclic occurrence*. It is shown,
//!     but never expanded. The same node may still show up as a regular occurrence on
//!     another path. [Forest::cycle_edges] lists the edges that close a cycle.
//!
//! Leniency
//!
//!     Self references are skipped, dangling references are skipped, and a duplicated
//!     identifier resolves to its last declaration (through the [IdentifierIndex]).
//!     The only failures are a reference too large to be an identifier and an index that
//!     does not agree with the lines; both make the whole forest unavailable.

use super::error::ForestError;
use super::index::IdentifierIndex;
use super::line::Line;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, trace};

/// One identified record and its outgoing references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForestNode {
    pub identifier: u64,
    /// Line index of the record
    pub line: usize,
    /// Arena indices of referenced records, in reference order
    pub children: Vec<usize>,
}

impl ForestNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Active,
    Done,
}

/// The reference forest of a document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Forest {
    nodes: Vec<ForestNode>,
    roots: Vec<usize>,
    by_line: HashMap<usize, usize>,
}

impl Forest {
    /// Build the forest over tokenized lines.
    ///
    /// Every line with an identifier becomes a node; other lines are left out.
    pub fn build(lines: &[Line], index: &IdentifierIndex) -> Result<Self, ForestError> {
        let mut nodes = Vec::new();
        let mut by_line = HashMap::new();
        for line in lines {
            if let Some(identifier) = line.identifier {
                by_line.insert(line.index, nodes.len());
                nodes.push(ForestNode {
                    identifier,
                    line: line.index,
                    children: Vec::new(),
                });
            }
        }

        let mut referenced = HashSet::new();
        let mut edge_count = 0;
        let records = lines.iter().filter(|line| line.identifier.is_some());
        for (node_index, line) in records.enumerate() {
            let own = nodes[node_index].identifier;
            let mut children = Vec::new();
            for token in line.references() {
                let target =
                    token
                        .reference_target()
                        .ok_or_else(|| ForestError::MalformedReference {
                            line: line.index,
                            text: token.text.clone(),
                        })?;
                if target == own {
                    trace!(identifier = own, "skipping self reference");
                    continue;
                }
                let Some(target_line) = index.lookup(target) else {
                    trace!(from = own, to = target, "skipping dangling reference");
                    continue;
                };
                let child = by_line.get(&target_line).copied().ok_or(
                    ForestError::IndexOutOfRange {
                        identifier: target,
                        line: target_line,
                    },
                )?;
                children.push(child);
                referenced.insert(target);
            }
            edge_count += children.len();
            nodes[node_index].children = children;
        }

        let mut roots: Vec<usize> = (0..nodes.len())
            .filter(|&i| !referenced.contains(&nodes[i].identifier))
            .collect();
        roots.sort_by_key(|&i| nodes[i].line);

        debug!(
            records = nodes.len(),
            roots = roots.len(),
            edges = edge_count,
            "built reference forest"
        );

        Ok(Forest {
            nodes,
            roots,
            by_line,
        })
    }

    pub fn nodes(&self) -> &[ForestNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&ForestNode> {
        self.nodes.get(index)
    }

    /// Arena indices of the roots, in ascending line order
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn root_nodes(&self) -> impl Iterator<Item = &ForestNode> {
        self.roots.iter().map(|&i| &self.nodes[i])
    }

    /// Arena index of the record declared on `line`
    pub fn node_at_line(&self, line: usize) -> Option<usize> {
        self.by_line.get(&line).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve an occurrence path into the arena indices along it.
    ///
    /// Returns None if a position is out of range, or if the path tries to descend
    /// through a cyclic occurrence.
    pub fn resolve_path(&self, path: &[usize]) -> Option<Vec<usize>> {
        let (first, rest) = path.split_first()?;
        let mut trail = vec![*self.roots.get(*first)?];
        for &position in rest {
            if is_cyclic_trail(&trail) {
                return None;
            }
            let current = *trail.last()?;
            let child = *self.nodes[current].children.get(position)?;
            trail.push(child);
        }
        Some(trail)
    }

    /// Shortest occurrence path from any root to the record on `line`.
    ///
    /// None if the line is not a record, or if the record is only reachable through a
    /// cycle (see [Forest::unreachable]).
    pub fn path_to_line(&self, line: usize) -> Option<Vec<usize>> {
        let target = self.node_at_line(line)?;
        // node -> (parent node, position under parent); roots have no parent
        let mut came_from: HashMap<usize, (Option<usize>, usize)> = HashMap::new();
        let mut queue = VecDeque::new();
        for (position, &root) in self.roots.iter().enumerate() {
            came_from.insert(root, (None, position));
            queue.push_back(root);
        }

        while let Some(node) = queue.pop_front() {
            if node == target {
                let mut path = Vec::new();
                let mut current = node;
                loop {
                    let (parent, position) = came_from[&current];
                    path.push(position);
                    match parent {
                        Some(parent) => current = parent,
                        None => break,
                    }
                }
                path.reverse();
                return Some(path);
            }
            for (position, &child) in self.nodes[node].children.iter().enumerate() {
                if let std::collections::hash_map::Entry::Vacant(entry) = came_from.entry(child) {
                    entry.insert((Some(node), position));
                    queue.push_back(child);
                }
            }
        }
        None
    }

    /// Edges that close a reference cycle, as (parent identifier, child identifier).
    ///
    /// Found by a depth-first walk starting at the roots, then at any record not yet
    /// visited, in line order.
    pub fn cycle_edges(&self) -> Vec<(u64, u64)> {
        let mut marks = vec![Mark::Unvisited; self.nodes.len()];
        let mut edges = Vec::new();
        let starts = self.roots.iter().copied().chain(0..self.nodes.len());
        for start in starts {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            marks[start] = Mark::Active;
            let mut stack = vec![(start, 0usize)];
            while let Some(top) = stack.last_mut() {
                let (node, next) = *top;
                match self.nodes[node].children.get(next) {
                    Some(&child) => {
                        top.1 += 1;
                        match marks[child] {
                            Mark::Active => edges.push((
                                self.nodes[node].identifier,
                                self.nodes[child].identifier,
                            )),
                            Mark::Unvisited => {
                                marks[child] = Mark::Active;
                                stack.push((child, 0));
                            }
                            Mark::Done => {}
                        }
                    }
                    None => {
                        marks[node] = Mark::Done;
                        stack.pop();
                    }
                }
            }
        }
        edges
    }

    /// Records not reachable from any root.
    ///
    /// These are records referenced only from within a closed group of mutually
    /// referencing records; they never show up in a root-based view.
    pub fn unreachable(&self) -> Vec<usize> {
        let mut seen = vec![false; self.nodes.len()];
        let mut queue: VecDeque<usize> = self.roots.iter().copied().collect();
        for &root in &self.roots {
            seen[root] = true;
        }
        while let Some(node) = queue.pop_front() {
            for &child in &self.nodes[node].children {
                if !seen[child] {
                    seen[child] = true;
                    queue.push_back(child);
                }
            }
        }
        (0..self.nodes.len()).filter(|&i| !seen[i]).collect()
    }
}

/// Whether the last node of a trail already appears earlier on it
pub fn is_cyclic_trail(trail: &[usize]) -> bool {
    match trail.split_last() {
        Some((last, before)) => before.contains(last),
        None => false,
    }
}
