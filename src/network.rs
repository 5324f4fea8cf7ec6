//! The network manager.
//!
//! A [`Network`] owns every piece of graph state: the node storage, the
//! structural hash table, the function registry and the event registry. All
//! construction and mutation goes through it, which keeps hash-consing and
//! fanout counts consistent:
//!
//! ```rust
//! use bnet_rs::network::Network;
//!
//! let mut ntk = Network::new();
//! let a = ntk.create_pi();
//! let b = ntk.create_pi();
//!
//! let f = ntk.create_and(a, b);
//! let g = ntk.create_and(b, a);
//! assert_eq!(f, g);
//! assert_eq!(ntk.size(), 4);
//!
//! ntk.create_po(f);
//! assert_eq!(ntk.fanout_size(f.node()), 1);
//! ```
//!
//! # Storage
//!
//! Nodes live in an append-only arena indexed by [`NodeId`]. Node 0 is the
//! constant node. A node that is taken out keeps its slot (and its fanins) so
//! that it can be revived later; it is only removed from the hash table.
//!
//! # Scratch state
//!
//! Each node carries a `value` and a `visited` word for external traversal
//! algorithms. `visited` is usually compared against the traversal id, so a
//! new traversal only needs [`Network::incr_trav_id`] instead of a clear.

use std::fmt::Debug;

use log::debug;

use crate::events::Events;
use crate::function::{FunctionCode, FunctionRegistry, GateKind};
use crate::node::Node;
use crate::signal::Signal;
use crate::strash::{NodeKey, StrashTable};
use crate::truth_table::TruthTable;
use crate::types::{NodeId, PoIndex};

pub struct Network {
    pub(crate) nodes: Vec<Node>,
    pub(crate) inputs: Vec<NodeId>,
    pub(crate) outputs: Vec<Signal>,
    pub(crate) strash: StrashTable,
    pub(crate) functions: FunctionRegistry,
    pub(crate) events: Events,
    pub(crate) num_dead: usize,
    trav_id: u32,
}

impl Network {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty network with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(Node::constant());
        Self {
            nodes,
            inputs: Vec::new(),
            outputs: Vec::new(),
            strash: StrashTable::with_capacity(capacity),
            functions: FunctionRegistry::new(),
            events: Events::new(),
            num_dead: 0,
            trav_id: 0,
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::new()
    }
}

impl Clone for Network {
    /// Deep copy of the storage, hash table and function registry.
    ///
    /// Registered event callbacks are not carried over.
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            strash: self.strash.clone(),
            functions: self.functions.clone(),
            events: Events::new(),
            num_dead: self.num_dead,
            trav_id: self.trav_id,
        }
    }
}

impl Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network")
            .field("size", &self.size())
            .field("pis", &self.num_pis())
            .field("pos", &self.num_pos())
            .field("gates", &self.num_gates())
            .field("dead", &self.num_dead)
            .finish()
    }
}

// Primary inputs and outputs
impl Network {
    pub fn get_constant(&self, value: bool) -> Signal {
        Signal::constant(value)
    }

    pub fn create_pi(&mut self) -> Signal {
        let id = self.next_id();
        debug!("create_pi() -> {}", id);
        self.nodes.push(Node::input());
        self.inputs.push(id);
        Signal::from_node(id)
    }

    /// Adds a primary output. The output counts as a fanout of its node.
    pub fn create_po(&mut self, signal: Signal) -> PoIndex {
        debug!("create_po({})", signal);
        self.incr_fanout_size(signal.node());
        self.outputs.push(signal);
        self.outputs.len() - 1
    }

    pub(crate) fn next_id(&self) -> NodeId {
        NodeId::new(self.nodes.len() as u32)
    }
}

// Structural queries
impl Network {
    /// Number of node slots, including the constant, inputs and dead nodes.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_pis(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_pos(&self) -> usize {
        self.outputs.len()
    }

    /// Number of live gates.
    pub fn num_gates(&self) -> usize {
        self.nodes.len() - 1 - self.inputs.len() - self.num_dead
    }

    pub fn num_dead(&self) -> usize {
        self.num_dead
    }

    pub(crate) fn node(&self, n: NodeId) -> &Node {
        assert!(n.index() < self.nodes.len(), "Node {} does not exist", n);
        &self.nodes[n.index()]
    }

    pub(crate) fn node_mut(&mut self, n: NodeId) -> &mut Node {
        assert!(n.index() < self.nodes.len(), "Node {} does not exist", n);
        &mut self.nodes[n.index()]
    }

    pub(crate) fn key(&self, n: NodeId) -> NodeKey {
        let node = self.node(n);
        NodeKey::new(node.func, node.fanins.clone())
    }

    pub fn fanins(&self, n: NodeId) -> &[Signal] {
        &self.node(n).fanins
    }

    pub fn fanin_size(&self, n: NodeId) -> usize {
        self.node(n).fanins.len()
    }

    pub fn fanout_size(&self, n: NodeId) -> u32 {
        self.node(n).refs.count()
    }

    pub fn is_dead(&self, n: NodeId) -> bool {
        self.node(n).is_dead()
    }

    pub fn is_constant(&self, n: NodeId) -> bool {
        n.is_constant()
    }

    pub fn is_pi(&self, n: NodeId) -> bool {
        self.node(n).func == FunctionCode::INPUT
    }

    /// Checks if the node is neither the constant nor a primary input.
    pub fn is_gate(&self, n: NodeId) -> bool {
        !n.is_constant() && !self.is_pi(n)
    }

    pub fn func(&self, n: NodeId) -> FunctionCode {
        self.node(n).func
    }

    /// Builtin kind of the node, `None` for arbitrary functions.
    pub fn kind(&self, n: NodeId) -> Option<GateKind> {
        self.func(n).kind()
    }

    pub fn is_buf(&self, n: NodeId) -> bool {
        self.func(n) == FunctionCode::BUF
    }

    pub fn is_not(&self, n: NodeId) -> bool {
        self.func(n) == FunctionCode::NOT
    }

    pub fn is_and(&self, n: NodeId) -> bool {
        self.func(n) == FunctionCode::AND
    }

    pub fn is_nand(&self, n: NodeId) -> bool {
        self.func(n) == FunctionCode::NAND
    }

    pub fn is_or(&self, n: NodeId) -> bool {
        self.func(n) == FunctionCode::OR
    }

    pub fn is_nor(&self, n: NodeId) -> bool {
        self.func(n) == FunctionCode::NOR
    }

    pub fn is_lt(&self, n: NodeId) -> bool {
        self.func(n) == FunctionCode::LT
    }

    pub fn is_ge(&self, n: NodeId) -> bool {
        self.func(n) == FunctionCode::GE
    }

    pub fn is_gt(&self, n: NodeId) -> bool {
        self.func(n) == FunctionCode::GT
    }

    pub fn is_le(&self, n: NodeId) -> bool {
        self.func(n) == FunctionCode::LE
    }

    pub fn is_xor(&self, n: NodeId) -> bool {
        self.func(n) == FunctionCode::XOR
    }

    pub fn is_xnor(&self, n: NodeId) -> bool {
        self.func(n) == FunctionCode::XNOR
    }

    pub fn is_maj(&self, n: NodeId) -> bool {
        self.func(n) == FunctionCode::MAJ
    }

    pub fn is_ite(&self, n: NodeId) -> bool {
        self.func(n) == FunctionCode::ITE
    }

    pub fn is_xor3(&self, n: NodeId) -> bool {
        self.func(n) == FunctionCode::XOR3
    }

    /// Checks if the node realizes a function outside the builtin catalogue.
    pub fn is_function(&self, n: NodeId) -> bool {
        !self.func(n).is_builtin()
    }

    /// Local function of the node over its fanins.
    ///
    /// A primary input behaves as the identity of its own value.
    pub fn node_function(&self, n: NodeId) -> TruthTable {
        match self.functions.truth_table(self.func(n)) {
            Some(tt) => tt.clone(),
            None => TruthTable::nth_var(1, 0),
        }
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn pi_at(&self, index: usize) -> NodeId {
        self.inputs[index]
    }

    pub fn po_at(&self, index: PoIndex) -> Signal {
        self.outputs[index]
    }

    /// Position of `n` among the primary inputs.
    pub fn pi_index(&self, n: NodeId) -> Option<usize> {
        self.inputs.iter().position(|&pi| pi == n)
    }

    pub fn outputs(&self) -> &[Signal] {
        &self.outputs
    }
}

// Iteration
impl Network {
    /// Live nodes in index order, constant and inputs included.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len())
            .filter(|&i| !self.nodes[i].is_dead())
            .map(|i| NodeId::new(i as u32))
    }

    /// Live gates in index order.
    pub fn gates(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes().filter(|&n| self.is_gate(n))
    }

    pub fn pis(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inputs.iter().copied()
    }

    pub fn pos(&self) -> impl Iterator<Item = Signal> + '_ {
        self.outputs.iter().copied()
    }

    /// Calls `f` on every live node until it returns `false`.
    pub fn foreach_node(&self, mut f: impl FnMut(NodeId) -> bool) {
        for n in self.nodes() {
            if !f(n) {
                break;
            }
        }
    }

    pub fn foreach_gate(&self, mut f: impl FnMut(NodeId) -> bool) {
        for n in self.gates() {
            if !f(n) {
                break;
            }
        }
    }

    pub fn foreach_pi(&self, mut f: impl FnMut(NodeId, usize) -> bool) {
        for (i, n) in self.pis().enumerate() {
            if !f(n, i) {
                break;
            }
        }
    }

    pub fn foreach_po(&self, mut f: impl FnMut(Signal, PoIndex) -> bool) {
        for (i, s) in self.pos().enumerate() {
            if !f(s, i) {
                break;
            }
        }
    }

    pub fn foreach_fanin(&self, n: NodeId, mut f: impl FnMut(Signal, usize) -> bool) {
        for (i, &s) in self.fanins(n).iter().enumerate() {
            if !f(s, i) {
                break;
            }
        }
    }
}

// Fanout counting
impl Network {
    pub fn incr_fanout_size(&mut self, n: NodeId) -> u32 {
        self.node_mut(n).refs.incr()
    }

    pub fn decr_fanout_size(&mut self, n: NodeId) -> u32 {
        self.node_mut(n).refs.decr()
    }
}

// Scratch state
impl Network {
    pub fn value(&self, n: NodeId) -> u32 {
        self.node(n).value
    }

    pub fn set_value(&mut self, n: NodeId, value: u32) {
        self.node_mut(n).value = value;
    }

    /// Increments the value and returns its previous content. Wraps on overflow.
    pub fn incr_value(&mut self, n: NodeId) -> u32 {
        let node = self.node_mut(n);
        let prev = node.value;
        node.value = prev.wrapping_add(1);
        prev
    }

    /// Decrements the value and returns its new content. Wraps below zero.
    pub fn decr_value(&mut self, n: NodeId) -> u32 {
        let node = self.node_mut(n);
        node.value = node.value.wrapping_sub(1);
        node.value
    }

    pub fn clear_values(&mut self) {
        for node in self.nodes.iter_mut() {
            node.value = 0;
        }
    }

    pub fn visited(&self, n: NodeId) -> u32 {
        self.node(n).visited
    }

    pub fn set_visited(&mut self, n: NodeId, visited: u32) {
        self.node_mut(n).visited = visited;
    }

    pub fn clear_visited(&mut self) {
        for node in self.nodes.iter_mut() {
            node.visited = 0;
        }
    }

    pub fn trav_id(&self) -> u32 {
        self.trav_id
    }

    pub fn incr_trav_id(&mut self) -> u32 {
        self.trav_id += 1;
        self.trav_id
    }
}

// Events
impl Network {
    pub fn events(&mut self) -> &mut Events {
        &mut self.events
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_empty() {
        let ntk = Network::new();
        assert_eq!(ntk.size(), 1);
        assert_eq!(ntk.num_pis(), 0);
        assert_eq!(ntk.num_pos(), 0);
        assert_eq!(ntk.num_gates(), 0);
        assert!(ntk.is_constant(NodeId::CONSTANT));
        assert!(!ntk.is_dead(NodeId::CONSTANT));
        assert_eq!(ntk.get_constant(false), Signal::zero());
        assert_eq!(ntk.get_constant(true), !Signal::zero());
    }

    #[test]
    fn test_pis_and_pos() {
        let mut ntk = Network::new();
        let a = ntk.create_pi();
        let b = ntk.create_pi();
        assert_eq!(ntk.size(), 3);
        assert_eq!(ntk.num_pis(), 2);
        assert!(ntk.is_pi(a.node()));
        assert!(!ntk.is_gate(b.node()));
        assert_eq!(ntk.pi_index(b.node()), Some(1));
        assert_eq!(ntk.pi_at(0), a.node());

        let i = ntk.create_po(!a);
        let j = ntk.create_po(a);
        assert_eq!((i, j), (0, 1));
        assert_eq!(ntk.po_at(0), !a);
        assert_eq!(ntk.fanout_size(a.node()), 2);
        assert_eq!(ntk.fanout_size(b.node()), 0);
    }

    #[test]
    fn test_foreach_early_exit() {
        let mut ntk = Network::new();
        for _ in 0..5 {
            ntk.create_pi();
        }
        let mut seen = Vec::new();
        ntk.foreach_pi(|n, i| {
            seen.push(n);
            i < 2
        });
        assert_eq!(seen.len(), 3);

        let mut count = 0;
        ntk.foreach_node(|_| {
            count += 1;
            true
        });
        assert_eq!(count, 6);
    }

    #[test]
    fn test_scratch() {
        let mut ntk = Network::new();
        let a = ntk.create_pi().node();
        assert_eq!(ntk.incr_value(a), 0);
        assert_eq!(ntk.incr_value(a), 1);
        assert_eq!(ntk.decr_value(a), 1);
        assert_eq!(ntk.value(a), 1);
        ntk.clear_values();
        assert_eq!(ntk.value(a), 0);

        let t = ntk.incr_trav_id();
        ntk.set_visited(a, t);
        assert_eq!(ntk.visited(a), ntk.trav_id());
        ntk.clear_visited();
        assert_eq!(ntk.visited(a), 0);
    }

    #[test]
    fn test_scratch_value_wraps() {
        let mut ntk = Network::new();
        let a = ntk.create_pi().node();
        assert_eq!(ntk.decr_value(a), u32::MAX);
        assert_eq!(ntk.incr_value(a), u32::MAX);
        assert_eq!(ntk.value(a), 0);
    }

    #[test]
    fn test_node_function_of_input() {
        let mut ntk = Network::new();
        let a = ntk.create_pi();
        assert_eq!(ntk.node_function(a.node()), TruthTable::nth_var(1, 0));
        assert!(ntk.node_function(NodeId::CONSTANT).is_const0());
    }
}
