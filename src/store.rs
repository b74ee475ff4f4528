//! Per-title accumulated schema store.

use crate::schema::SchemaNode;
use std::collections::HashMap;

/// Owns one accumulated `SchemaNode` per title, in first-occurrence order.
///
/// Entries are only ever inserted or widened in place; nothing is removed.
/// Memory use tracks the number of distinct titles and their schema sizes,
/// not the number of events observed.
#[derive(Debug, Default)]
pub struct SchemaStore {
    index: HashMap<String, usize>,
    entries: Vec<(String, SchemaNode)>,
}

impl SchemaStore {
    pub fn new() -> Self {
        SchemaStore::default()
    }

    /// Fold one event's node into the schema accumulated for `title`.
    pub fn observe(&mut self, title: String, node: SchemaNode) {
        match self.index.get(&title) {
            Some(&slot) => self.entries[slot].1.merge(node),
            None => {
                self.index.insert(title.clone(), self.entries.len());
                self.entries.push((title, node));
            }
        }
    }

    /// Accumulated schemas, ordered by when each title was first observed.
    pub fn snapshot(&self) -> &[(String, SchemaNode)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
