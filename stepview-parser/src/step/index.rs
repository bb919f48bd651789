//! Identifier index: record identifier -> line index

use super::line::Line;
use std::collections::HashMap;
use tracing::debug;

/// Mapping from declared record identifiers to their line position.
///
/// Built once per load. When an identifier is declared twice the later line wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierIndex {
    lines_by_id: HashMap<u64, usize>,
}

impl IdentifierIndex {
    /// Build the index from lines in source order
    pub fn build(lines: &[Line]) -> Self {
        let mut lines_by_id = HashMap::new();
        for line in lines {
            let Some(id) = line.identifier else {
                continue;
            };
            if let Some(previous) = lines_by_id.insert(id, line.index) {
                debug!(
                    identifier = id,
                    previous = previous + 1,
                    current = line.index + 1,
                    "duplicate record identifier, later declaration wins"
                );
            }
        }
        IdentifierIndex { lines_by_id }
    }

    /// Line index declaring `identifier`, if any
    pub fn lookup(&self, identifier: u64) -> Option<usize> {
        self.lines_by_id.get(&identifier).copied()
    }

    pub fn contains(&self, identifier: u64) -> bool {
        self.lines_by_id.contains_key(&identifier)
    }

    pub fn len(&self) -> usize {
        self.lines_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines_by_id.is_empty()
    }

    /// (identifier, line index) pairs in ascending identifier order
    pub fn entries(&self) -> Vec<(u64, usize)> {
        let mut entries: Vec<_> = self
            .lines_by_id
            .iter()
            .map(|(id, line)| (*id, *line))
            .collect();
        entries.sort_unstable();
        entries
    }
}
