//! Type-safe wrappers for network node identifiers.
//!
//! Node identifiers index the node storage of a [`Network`][crate::network::Network].
//! They are stable: a node keeps its identifier when it is taken out and revived.

use std::fmt;

/// A node identifier (0-indexed).
///
/// # Invariants
///
/// - Identifier 0 is the constant node, which always exists.
/// - Identifiers are never reused, even after the node is taken out.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct NodeId(u32);

impl NodeId {
    /// The constant node.
    pub const CONSTANT: NodeId = NodeId(0);

    /// Creates a node identifier from a raw index.
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Returns the raw index as a `u32`.
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Returns the raw index as a `usize`, suitable for indexing storage.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Checks if this is the constant node.
    pub const fn is_constant(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl From<NodeId> for u32 {
    fn from(node: NodeId) -> Self {
        node.0
    }
}

impl From<NodeId> for usize {
    fn from(node: NodeId) -> Self {
        node.0 as usize
    }
}

impl From<u32> for NodeId {
    fn from(index: u32) -> Self {
        NodeId(index)
    }
}

/// Position of a primary output in the output list.
pub type PoIndex = usize;
