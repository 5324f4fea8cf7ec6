//! Structural hash table for network nodes.
//!
//! The table maps a canonical `(function, fanins)` key to the single live node
//! realizing it. It is a pure index over the node storage:
//!
//! ```text
//! nodes[5] = and(n2, !n3)   <-   (and, [n2, !n3]) -> n5
//! nodes[6] = maj(n2, n3, n4) <-   (maj, [n2, n3, n4]) -> n6
//! ```
//!
//! Entries of dead nodes are absent. The network erases a key right before it
//! marks the node dead and inserts it again when the node is revived.
//!
//! Rewriting without restrashing may leave two live nodes with the same key.
//! Only one of them holds the entry; the others are kept as *shadows* of the
//! key and one of them is promoted when the holder's entry is erased.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::function::FunctionCode;
use crate::signal::Signal;
use crate::types::NodeId;

/// Canonical key of a node.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct NodeKey {
    pub func: FunctionCode,
    pub fanins: Vec<Signal>,
}

impl NodeKey {
    pub fn new(func: FunctionCode, fanins: Vec<Signal>) -> Self {
        Self { func, fanins }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StrashTable {
    nodes: HashMap<NodeKey, NodeId>,
    shadows: HashMap<NodeKey, Vec<NodeId>>,
}

impl StrashTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: HashMap::with_capacity(capacity),
            shadows: HashMap::new(),
        }
    }

    /// Look up a node by its canonical key.
    pub fn find(&self, key: &NodeKey) -> Option<NodeId> {
        self.nodes.get(key).copied()
    }

    /// Insert a node, replacing any previous entry for the key.
    pub fn insert(&mut self, key: NodeKey, node: NodeId) {
        self.nodes.insert(key, node);
    }

    /// Insert a node unless another node already holds the key.
    ///
    /// A node that loses to an existing holder is recorded as a shadow of the
    /// key. Returns the node holding the key afterwards.
    pub fn insert_if_absent(&mut self, key: NodeKey, node: NodeId) -> NodeId {
        match self.nodes.entry(key) {
            Entry::Occupied(e) => {
                let holder = *e.get();
                if holder != node {
                    let shadows = self.shadows.entry(e.key().clone()).or_default();
                    if !shadows.contains(&node) {
                        shadows.push(node);
                    }
                }
                holder
            }
            Entry::Vacant(e) => *e.insert(node),
        }
    }

    /// Remove `node` from the entry of `key`.
    ///
    /// Returns `true` if `node` was the holder. The most recent shadow of the
    /// key, if any, then takes over the entry.
    pub fn remove(&mut self, key: &NodeKey, node: NodeId) -> bool {
        if self.nodes.get(key) == Some(&node) {
            match self.shadows.get_mut(key).and_then(|s| s.pop()) {
                Some(next) => {
                    log::trace!("promoting {} to hold {:?}", next, key);
                    self.nodes.insert(key.clone(), next);
                }
                None => {
                    self.nodes.remove(key);
                }
            }
            if self.shadows.get(key).is_some_and(|s| s.is_empty()) {
                self.shadows.remove(key);
            }
            true
        } else {
            if let Some(shadows) = self.shadows.get_mut(key) {
                shadows.retain(|&m| m != node);
                if shadows.is_empty() {
                    self.shadows.remove(key);
                }
            }
            false
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all `(key, node)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeKey, NodeId)> + '_ {
        self.nodes.iter().map(|(key, &node)| (key, node))
    }

    /// Iterate over all `(key, node)` shadows.
    pub fn shadows(&self) -> impl Iterator<Item = (&NodeKey, NodeId)> + '_ {
        self.shadows
            .iter()
            .flat_map(|(key, nodes)| nodes.iter().map(move |&node| (key, node)))
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.shadows.clear();
    }
}
