//! Gate construction.
//!
//! Every constructor canonicalizes its inputs (see [`gate`][crate::gate]),
//! then looks the canonical key up in the structural hash table. On a miss a
//! new node is appended, its fanins gain one fanout each, and the `on_add`
//! event fires.

use log::debug;

use crate::error::{NetworkError, Result};
use crate::function::GateKind;
use crate::gate::{self, Canonical};
use crate::network::Network;
use crate::node::Node;
use crate::signal::Signal;
use crate::strash::NodeKey;
use crate::truth_table::TruthTable;
use crate::types::NodeId;

impl Network {
    /// Returns the signal realizing a canonical form, creating the node on a hash miss.
    pub(crate) fn realize(&mut self, canonical: Canonical) -> Signal {
        match canonical {
            Canonical::Signal(s) => s,
            Canonical::Node {
                func,
                fanins,
                complement,
            } => {
                let key = NodeKey::new(func, fanins);
                if let Some(n) = self.strash.find(&key) {
                    debug!("strash hit: {}{:?} -> {}", key.func, key.fanins, n);
                    return Signal::new(n, complement);
                }
                let n = self.add_node(key);
                Signal::new(n, complement)
            }
        }
    }

    fn add_node(&mut self, key: NodeKey) -> NodeId {
        let id = self.next_id();
        debug!("add_node({}{:?}) -> {}", key.func, key.fanins, id);
        for f in key.fanins.iter() {
            self.incr_fanout_size(f.node());
        }
        self.nodes.push(Node::new(key.func, key.fanins.clone()));
        self.strash.insert(key, id);
        self.events.on_add(id);
        id
    }

    pub fn create_buf(&mut self, a: Signal) -> Signal {
        self.realize(gate::buf(a))
    }

    pub fn create_not(&mut self, a: Signal) -> Signal {
        self.realize(gate::not(a))
    }

    pub fn create_and(&mut self, a: Signal, b: Signal) -> Signal {
        debug!("create_and(a = {}, b = {})", a, b);
        self.realize(gate::and(a, b))
    }

    pub fn create_nand(&mut self, a: Signal, b: Signal) -> Signal {
        debug!("create_nand(a = {}, b = {})", a, b);
        self.realize(gate::nand(a, b))
    }

    pub fn create_or(&mut self, a: Signal, b: Signal) -> Signal {
        debug!("create_or(a = {}, b = {})", a, b);
        self.realize(gate::or(a, b))
    }

    pub fn create_nor(&mut self, a: Signal, b: Signal) -> Signal {
        debug!("create_nor(a = {}, b = {})", a, b);
        self.realize(gate::nor(a, b))
    }

    /// `!a & b`
    pub fn create_lt(&mut self, a: Signal, b: Signal) -> Signal {
        debug!("create_lt(a = {}, b = {})", a, b);
        self.realize(gate::lt(a, b))
    }

    /// `a | !b`
    pub fn create_ge(&mut self, a: Signal, b: Signal) -> Signal {
        debug!("create_ge(a = {}, b = {})", a, b);
        self.realize(gate::ge(a, b))
    }

    /// `a & !b`
    pub fn create_gt(&mut self, a: Signal, b: Signal) -> Signal {
        debug!("create_gt(a = {}, b = {})", a, b);
        self.realize(gate::gt(a, b))
    }

    /// `!a | b`
    pub fn create_le(&mut self, a: Signal, b: Signal) -> Signal {
        debug!("create_le(a = {}, b = {})", a, b);
        self.realize(gate::le(a, b))
    }

    pub fn create_xor(&mut self, a: Signal, b: Signal) -> Signal {
        debug!("create_xor(a = {}, b = {})", a, b);
        self.realize(gate::xor(a, b))
    }

    pub fn create_xnor(&mut self, a: Signal, b: Signal) -> Signal {
        debug!("create_xnor(a = {}, b = {})", a, b);
        self.realize(gate::xnor(a, b))
    }

    pub fn create_maj(&mut self, a: Signal, b: Signal, c: Signal) -> Signal {
        debug!("create_maj(a = {}, b = {}, c = {})", a, b, c);
        self.realize(gate::maj(a, b, c))
    }

    /// `cond ? then : else`
    pub fn create_ite(&mut self, cond: Signal, f_then: Signal, f_else: Signal) -> Signal {
        debug!("create_ite(i = {}, t = {}, e = {})", cond, f_then, f_else);
        self.realize(gate::ite(cond, f_then, f_else))
    }

    pub fn create_xor3(&mut self, a: Signal, b: Signal, c: Signal) -> Signal {
        debug!("create_xor3(a = {}, b = {}, c = {})", a, b, c);
        self.realize(gate::xor3(a, b, c))
    }

    /// Creates a builtin gate of the given kind.
    ///
    /// # Panics
    ///
    /// Panics on [`GateKind::Input`] or if `fanins` does not match the arity of `kind`.
    pub fn create_gate(&mut self, kind: GateKind, fanins: &[Signal]) -> Signal {
        self.realize(gate::canonicalize(kind, fanins))
    }

    /// Creates a node computing `function` over `fanins`.
    ///
    /// Fails with [`NetworkError::ArityMismatch`] if the number of fanins differs
    /// from the number of variables of `function`; nothing is modified then.
    pub fn create_node(&mut self, fanins: &[Signal], function: &TruthTable) -> Result<Signal> {
        debug!("create_node(fanins = {:?}, function = {})", fanins, function);
        if fanins.len() != function.num_vars() as usize {
            return Err(NetworkError::ArityMismatch {
                expected: function.num_vars() as usize,
                actual: fanins.len(),
            });
        }
        if fanins.is_empty() {
            return Ok(Signal::constant(function.bit(0)));
        }
        if function.is_const0() || function.is_const1() {
            debug!("create_node: constant function");
            return Ok(Signal::constant(function.is_const1()));
        }

        let code = self.functions.intern(function);
        match code.kind() {
            Some(kind) => {
                debug!("create_node: dispatching to {}", kind);
                Ok(self.create_gate(kind, fanins))
            }
            None => Ok(self.realize(gate::canonicalize_node(code, fanins))),
        }
    }

    /// N-ary AND as a balanced tree. Returns constant 1 for no inputs.
    pub fn create_nary_and(&mut self, fs: &[Signal]) -> Signal {
        self.create_nary(fs, Signal::one(), Self::create_and)
    }

    /// N-ary OR as a balanced tree. Returns constant 0 for no inputs.
    pub fn create_nary_or(&mut self, fs: &[Signal]) -> Signal {
        self.create_nary(fs, Signal::zero(), Self::create_or)
    }

    /// N-ary XOR as a balanced tree. Returns constant 0 for no inputs.
    pub fn create_nary_xor(&mut self, fs: &[Signal]) -> Signal {
        self.create_nary(fs, Signal::zero(), Self::create_xor)
    }

    fn create_nary(
        &mut self,
        fs: &[Signal],
        neutral: Signal,
        op: fn(&mut Self, Signal, Signal) -> Signal,
    ) -> Signal {
        match fs.len() {
            0 => neutral,
            1 => fs[0],
            n => {
                let (left, right) = fs.split_at(n / 2);
                let a = self.create_nary(left, neutral, op);
                let b = self.create_nary(right, neutral, op);
                op(self, a, b)
            }
        }
    }

    /// Imports `node` of `other` on top of `fanins` of this network.
    ///
    /// The copy goes through the same canonicalization and hash-consing as any
    /// other construction, so importing an existing structure is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `node` is a primary input of `other`.
    pub fn clone_node(&mut self, other: &Network, node: NodeId, fanins: &[Signal]) -> Result<Signal> {
        assert!(!other.is_pi(node), "Cannot clone primary input {}", node);
        debug!("clone_node({}, fanins = {:?})", node, fanins);
        let func = other.func(node);
        match func.kind() {
            Some(kind) => {
                if fanins.len() != kind.arity() {
                    return Err(NetworkError::ArityMismatch {
                        expected: kind.arity(),
                        actual: fanins.len(),
                    });
                }
                Ok(self.create_gate(kind, fanins))
            }
            None => {
                let function = other.node_function(node);
                self.create_node(fanins, &function)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use test_log::test;

    use super::*;
    use crate::function::FunctionCode;

    #[test]
    fn test_hash_consing() {
        let mut ntk = Network::new();
        let a = ntk.create_pi();
        let b = ntk.create_pi();

        let f = ntk.create_and(a, b);
        let g = ntk.create_and(b, a);
        assert_eq!(f, g);
        assert_eq!(ntk.size(), 4);
        assert_eq!(ntk.num_gates(), 1);
        assert!(ntk.is_and(f.node()));
        assert_eq!(ntk.fanout_size(a.node()), 1);
        assert_eq!(ntk.fanout_size(b.node()), 1);
    }

    #[test]
    fn test_and_constants() {
        let mut ntk = Network::new();
        let x1 = ntk.create_pi();
        let _x2 = ntk.create_pi();

        let zero = ntk.get_constant(false);
        let one = ntk.get_constant(true);
        assert_eq!(ntk.create_and(x1, zero), zero);
        assert_eq!(ntk.create_and(x1, one), x1);
        assert_eq!(ntk.create_and(x1, x1), x1);
        assert_eq!(ntk.create_and(x1, !x1), zero);
        assert_eq!(ntk.size(), 3);
    }

    #[test]
    fn test_asymmetric_gates() {
        let mut ntk = Network::new();
        let a = ntk.create_pi();
        let b = ntk.create_pi();

        let f = ntk.create_lt(a, b);
        let g = ntk.create_lt(b, a);
        assert_ne!(f, g);
        assert!(ntk.is_lt(f.node()));
        assert_eq!(ntk.create_lt(a, a), ntk.get_constant(false));
        assert_eq!(ntk.create_gt(a, b), ntk.create_gt(a, b));
        assert_eq!(ntk.num_gates(), 3);
    }

    #[test]
    fn test_xor_phase_sharing() {
        let mut ntk = Network::new();
        let a = ntk.create_pi();
        let b = ntk.create_pi();

        let f = ntk.create_xor(a, b);
        let g = ntk.create_xor(!a, b);
        let h = ntk.create_xor(!b, !a);
        assert_eq!(g, !f);
        assert_eq!(h, f);
        assert_eq!(ntk.num_gates(), 1);
    }

    #[test]
    fn test_maj_phase_sharing() {
        let mut ntk = Network::new();
        let a = ntk.create_pi();
        let b = ntk.create_pi();
        let c = ntk.create_pi();

        let f = ntk.create_maj(a, b, c);
        let g = ntk.create_maj(!c, !a, !b);
        assert_eq!(g, !f);
        assert_eq!(ntk.num_gates(), 1);

        let h = ntk.create_maj(a, ntk.get_constant(false), c);
        assert_eq!(h, ntk.create_and(c, a));
    }

    #[test]
    fn test_ite_and_xor3() {
        let mut ntk = Network::new();
        let i = ntk.create_pi();
        let t = ntk.create_pi();
        let e = ntk.create_pi();

        let f = ntk.create_ite(i, t, e);
        assert_eq!(ntk.create_ite(!i, e, t), f);
        assert_eq!(ntk.create_ite(i, !t, !e), !f);
        assert!(ntk.is_ite(f.node()));

        let x = ntk.create_xor3(i, t, e);
        assert_eq!(ntk.create_xor3(!e, t, i), !x);
        assert!(ntk.is_xor3(x.node()));
    }

    #[test]
    fn test_create_node() {
        let mut ntk = Network::new();
        let a = ntk.create_pi();
        let b = ntk.create_pi();
        let c = ntk.create_pi();

        let and = TruthTable::from_bits(2, 0b1000);
        assert_eq!(ntk.create_node(&[b, a], &and).unwrap(), ntk.create_and(a, b));

        let f = TruthTable::from_bits(3, 0x17);
        let s1 = ntk.create_node(&[a, b, c], &f).unwrap();
        let s2 = ntk.create_node(&[a, b, c], &f).unwrap();
        assert_eq!(s1, s2);
        assert!(ntk.is_function(s1.node()));
        assert_eq!(ntk.node_function(s1.node()), f);
        assert_eq!(ntk.fanin_size(s1.node()), 3);
    }

    #[test]
    fn test_create_node_trivial() {
        let mut ntk = Network::new();
        let a = ntk.create_pi();
        let size = ntk.size();

        let one = TruthTable::constant(0, true);
        assert_eq!(ntk.create_node(&[], &one).unwrap(), Signal::one());
        let not = TruthTable::from_bits(1, 0b01);
        assert_eq!(ntk.create_node(&[a], &not).unwrap(), !a);
        let buf = TruthTable::from_bits(1, 0b10);
        assert_eq!(ntk.create_node(&[a], &buf).unwrap(), a);
        let zero = TruthTable::constant(1, false);
        assert_eq!(ntk.create_node(&[a], &zero).unwrap(), Signal::zero());
        assert_eq!(ntk.size(), size);
    }

    #[test]
    fn test_create_node_arity_mismatch() {
        let mut ntk = Network::new();
        let a = ntk.create_pi();
        let size = ntk.size();

        let f = TruthTable::from_bits(2, 0b0110);
        let res = ntk.create_node(&[a], &f);
        assert_eq!(
            res,
            Err(NetworkError::ArityMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(ntk.size(), size);
    }

    #[test]
    fn test_nary() {
        let mut ntk = Network::new();
        let xs: Vec<Signal> = (0..5).map(|_| ntk.create_pi()).collect();

        assert_eq!(ntk.create_nary_and(&[]), Signal::one());
        assert_eq!(ntk.create_nary_or(&xs[..1]), xs[0]);
        let f = ntk.create_nary_and(&xs);
        assert!(ntk.is_and(f.node()));
        assert_eq!(ntk.num_gates(), 4);
        let g = ntk.create_nary_xor(&xs);
        assert_eq!(ntk.func(g.node()), FunctionCode::XOR);
    }

    #[test]
    fn test_on_add_event() {
        let mut ntk = Network::new();
        let a = ntk.create_pi();
        let b = ntk.create_pi();

        let added = Rc::new(RefCell::new(Vec::new()));
        let sink = added.clone();
        ntk.events()
            .register_add_event(move |n| sink.borrow_mut().push(n));

        let f = ntk.create_or(a, b);
        ntk.create_or(b, a);
        assert_eq!(*added.borrow(), vec![f.node()]);
    }

    #[test]
    fn test_clone_node() {
        let mut src = Network::new();
        let a = src.create_pi();
        let b = src.create_pi();
        let f = src.create_nor(a, b);
        let g = src
            .create_node(&[a, b, f], &TruthTable::from_bits(3, 0x2B))
            .unwrap();

        let mut dst = Network::new();
        let x = dst.create_pi();
        let y = dst.create_pi();
        let f2 = dst.clone_node(&src, f.node(), &[x, y]).unwrap();
        assert!(dst.is_nor(f2.node()));
        assert_eq!(dst.clone_node(&src, f.node(), &[y, x]).unwrap(), f2);

        let g2 = dst.clone_node(&src, g.node(), &[x, y, f2]).unwrap();
        assert_eq!(dst.node_function(g2.node()), src.node_function(g.node()));
        assert!(dst.clone_node(&src, f.node(), &[x]).is_err());
    }
}
