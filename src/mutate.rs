//! Mutation: deletion, revival, replacement and substitution.
//!
//! A node is either live or dead. Taking a node out removes it from the hash
//! table, marks it dead and releases one fanout of each of its fanins, freeing
//! every fanin that drops to zero fanouts (the maximal fanout-free cone). The
//! slot itself is retained, so a dead node can be revived later.
//!
//! Substitution replaces every use of a node by a signal. Nodes using the old
//! node are re-canonicalized; when one of them collapses to a signal or
//! becomes structurally equal to another node, it is queued for substitution
//! in turn.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use log::{debug, trace};

use crate::gate::{self, Canonical};
use crate::network::Network;
use crate::signal::Signal;
use crate::strash::NodeKey;
use crate::types::NodeId;

/// Outcome of [`Network::replace_in_node`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Replacement {
    /// The node does not use the replaced node, or the rewrite changed nothing.
    Unchanged,
    /// The node was rewritten in place.
    Updated,
    /// The node must itself be substituted by the given signal.
    Merge(Signal),
}

impl Network {
    /// Takes out `n` together with every fanin left without fanouts.
    ///
    /// No-op for the constant, primary inputs and dead nodes.
    pub fn take_out_node(&mut self, n: NodeId) {
        if n.index() >= self.size() || !self.is_gate(n) || self.is_dead(n) {
            return;
        }
        let mut stack = vec![n];
        while let Some(n) = stack.pop() {
            debug!("take_out_node({})", n);
            let key = self.key(n);
            self.strash.remove(&key, n);
            self.node_mut(n).refs.kill();
            self.num_dead += 1;
            self.events.on_delete(n);

            for f in key.fanins {
                let m = f.node();
                if self.fanout_size(m) == 0 {
                    continue;
                }
                if self.decr_fanout_size(m) == 0 && self.is_gate(m) {
                    stack.push(m);
                }
            }
        }
    }

    /// Brings a dead node back to life, reviving its dead fanins first.
    ///
    /// The revived node starts with zero fanouts. If another live node holds
    /// its key in the hash table meanwhile, that entry is kept and the revived
    /// node is registered as its shadow, so it takes over the entry once the
    /// holder goes away. Substitution never revives a node with a live twin:
    /// it goes through the twin instead.
    pub fn revive_node(&mut self, n: NodeId) {
        if n.index() >= self.size() || !self.is_dead(n) {
            return;
        }
        debug!("revive_node({})", n);
        self.node_mut(n).refs.revive();
        self.num_dead -= 1;
        let key = self.key(n);
        self.strash.insert_if_absent(key.clone(), n);
        self.events.on_add(n);

        for f in key.fanins {
            let m = f.node();
            if self.is_dead(m) {
                self.revive_node(m);
            }
            self.incr_fanout_size(m);
        }
    }

    /// Replaces every fanin of `n` pointing at `old` by `new`.
    ///
    /// The new fanins are canonicalized and looked up in the hash table. The
    /// node is rewritten in place unless the result collapses to a signal, is
    /// already held by another node, or comes out complemented; in these cases
    /// `n` is left untouched and [`Replacement::Merge`] tells which signal
    /// should replace it.
    pub fn replace_in_node(&mut self, n: NodeId, old: NodeId, new: Signal) -> Replacement {
        if !self.is_gate(n) || self.is_dead(n) {
            return Replacement::Unchanged;
        }
        let old_key = self.key(n);
        if !old_key.fanins.iter().any(|f| f.node() == old) {
            return Replacement::Unchanged;
        }
        debug!("replace_in_node({}, old = {}, new = {})", n, old, new);

        let fanins: Vec<Signal> = old_key
            .fanins
            .iter()
            .map(|&f| {
                if f.node() == old {
                    new ^ f.is_complemented()
                } else {
                    f
                }
            })
            .collect();

        let (func, fanins, complement) = match gate::canonicalize_node(old_key.func, &fanins) {
            Canonical::Signal(s) => {
                debug!("{} collapses to {}", n, s);
                return Replacement::Merge(s);
            }
            Canonical::Node {
                func,
                fanins,
                complement,
            } => (func, fanins, complement),
        };
        let key = NodeKey::new(func, fanins);

        if let Some(m) = self.strash.find(&key) {
            if m == n {
                return Replacement::Unchanged;
            }
            debug!("{} merges into {}", n, m);
            return Replacement::Merge(Signal::new(m, complement));
        }
        if complement {
            let s = self.realize(Canonical::Node {
                func: key.func,
                fanins: key.fanins,
                complement,
            });
            debug!("{} is rebuilt as {}", n, s);
            return Replacement::Merge(s);
        }

        self.strash.remove(&old_key, n);
        for f in key.fanins.iter() {
            self.incr_fanout_size(f.node());
        }
        {
            let node = self.node_mut(n);
            node.func = key.func;
            node.fanins = key.fanins.clone();
        }
        self.strash.insert(key, n);

        for f in old_key.fanins.iter() {
            let m = f.node();
            if self.decr_fanout_size(m) == 0 && m != old && self.is_gate(m) && !self.is_dead(m) {
                self.take_out_node(m);
            }
        }
        self.events.on_modified(n, &old_key.fanins);
        Replacement::Updated
    }

    /// Like [`replace_in_node`][Self::replace_in_node], but only restores the
    /// fanin order. The node is always rewritten in place, even if it becomes
    /// trivial or equal to another node.
    ///
    /// Returns `true` if `n` used `old`.
    pub fn replace_in_node_no_restrash(&mut self, n: NodeId, old: NodeId, new: Signal) -> bool {
        if !self.is_gate(n) || self.is_dead(n) {
            return false;
        }
        let old_key = self.key(n);
        if !old_key.fanins.iter().any(|f| f.node() == old) {
            return false;
        }
        debug!("replace_in_node_no_restrash({}, old = {}, new = {})", n, old, new);

        let mut fanins = old_key.fanins.clone();
        for f in fanins.iter_mut() {
            if f.node() == old {
                *f = new ^ f.is_complemented();
                self.incr_fanout_size(new.node());
                self.decr_fanout_size(old);
            }
        }
        gate::sort_fanins(old_key.func, &mut fanins);

        self.strash.remove(&old_key, n);
        self.node_mut(n).fanins = fanins.clone();
        self.strash
            .insert_if_absent(NodeKey::new(old_key.func, fanins), n);
        self.events.on_modified(n, &old_key.fanins);
        true
    }

    /// Points every primary output driven by `old` at `new`, keeping the polarity of each output.
    pub fn replace_in_outputs(&mut self, old: NodeId, new: Signal) {
        for i in 0..self.outputs.len() {
            let po = self.outputs[i];
            if po.node() == old {
                trace!("replace_in_outputs: po {} = {} -> {}", i, po, new ^ po.is_complemented());
                self.incr_fanout_size(new.node());
                self.decr_fanout_size(old);
                self.outputs[i] = new ^ po.is_complemented();
            }
        }
    }

    /// Replaces every use of `old` by `new` and takes out `old`.
    ///
    /// Nodes that collapse or become duplicates along the way are substituted
    /// in turn, in the order they are discovered.
    ///
    /// # Panics
    ///
    /// Panics if the recorded substitutions form a cycle.
    pub fn substitute_node(&mut self, old: NodeId, new: Signal) {
        let mut map = HashMap::new();
        self.substitute_with(old, new, &mut map);
    }

    fn substitute_with(&mut self, old: NodeId, new: Signal, map: &mut HashMap<NodeId, Signal>) {
        if old.index() >= self.size() || new.index() >= self.size() {
            return;
        }
        debug!("substitute_node(old = {}, new = {})", old, new);
        let mut worklist = VecDeque::from([(old, new)]);
        // Nodes waiting in the worklist may still use an `old` that is already
        // dead; they are left alone until their own turn.
        let mut queued = HashSet::from([old]);

        while let Some((o, r)) = worklist.pop_front() {
            queued.remove(&o);
            let r = self.resolve(r, map);
            if o == r.node() {
                debug!("substitute_node: {} resolves to itself", o);
                continue;
            }
            trace!("substitute {} -> {}", o, r);

            let size = self.size();
            for i in 1..size {
                let n = NodeId::new(i as u32);
                if n == o || !self.is_gate(n) || self.is_dead(n) || queued.contains(&n) {
                    continue;
                }
                if let Replacement::Merge(s) = self.replace_in_node(n, o, r) {
                    queued.insert(n);
                    worklist.push_back((n, s));
                }
            }

            self.replace_in_outputs(o, r);
            map.insert(o, r);
            self.take_out_node(o);
        }
    }

    /// Follows recorded substitutions from a dead node to a live signal.
    fn resolve(&mut self, mut r: Signal, map: &HashMap<NodeId, Signal>) -> Signal {
        let mut seen = HashSet::new();
        while self.is_dead(r.node()) {
            let Some(&next) = map.get(&r.node()) else {
                break;
            };
            assert!(seen.insert(r.node()), "Cyclic substitution through {}", r.node());
            r = next ^ r.is_complemented();
        }
        if self.is_dead(r.node()) {
            r = self.revive_or_share(r.node(), map) ^ r.is_complemented();
        }
        r
    }

    /// Returns a live signal computing what the dead node `n` computed.
    ///
    /// Dead fanins are resolved first, recursively. With its fanins unchanged,
    /// `n` is revived unless a live twin holds its key. Otherwise the node is
    /// rebuilt from the resolved fanins and `n` stays dead.
    fn revive_or_share(&mut self, n: NodeId, map: &HashMap<NodeId, Signal>) -> Signal {
        let key = self.key(n);
        let fanins: Vec<Signal> = key.fanins.iter().map(|&f| self.resolve(f, map)).collect();

        if fanins == key.fanins {
            if let Some(twin) = self.strash.find(&key) {
                debug!("resolve: {} has live twin {}", n, twin);
                return Signal::from_node(twin);
            }
            self.revive_node(n);
            return Signal::from_node(n);
        }

        let s = self.realize(gate::canonicalize_node(key.func, &fanins));
        debug!("resolve: {} is rebuilt as {}", n, s);
        s
    }

    /// Replaces every use of `old` by `new` without re-canonicalizing the
    /// fanouts, then takes out `old`.
    ///
    /// Fanouts are never merged, so the network may be left with trivial or
    /// duplicate nodes; [`take_out_dangling`][Self::take_out_dangling] sweeps
    /// what is left unused.
    pub fn substitute_node_no_restrash(&mut self, old: NodeId, new: Signal) {
        if old.index() >= self.size() || new.index() >= self.size() || old == new.node() {
            return;
        }
        debug!("substitute_node_no_restrash(old = {}, new = {})", old, new);
        let new = self.resolve(new, &HashMap::new());
        if old == new.node() {
            return;
        }

        let size = self.size();
        for i in 1..size {
            let n = NodeId::new(i as u32);
            if n != old {
                self.replace_in_node_no_restrash(n, old, new);
            }
        }
        self.replace_in_outputs(old, new);
        self.take_out_node(old);
    }

    /// Applies a batch of substitutions in order.
    ///
    /// Each pending replacement holds one reference on its node while the
    /// batch runs. A pending substitution whose old node gets deleted by an
    /// earlier one is dropped.
    pub fn substitute_nodes(&mut self, substitutions: impl IntoIterator<Item = (NodeId, Signal)>) {
        let size = self.size();
        let mut pending: VecDeque<(NodeId, Signal)> = substitutions
            .into_iter()
            .filter(|(old, new)| old.index() < size && new.index() < size)
            .collect();
        debug!("substitute_nodes({} substitutions)", pending.len());

        let mut map = HashMap::new();
        for (_, new) in pending.iter_mut() {
            *new = self.resolve(*new, &map);
            self.incr_fanout_size(new.node());
        }

        let deleted = Rc::new(RefCell::new(Vec::new()));
        let sink = deleted.clone();
        let handle = self
            .events
            .register_delete_event(move |n| sink.borrow_mut().push(n));

        while let Some((old, new)) = pending.pop_front() {
            self.substitute_with(old, new, &mut map);
            self.release(new.node());

            loop {
                let removed: Vec<NodeId> = deleted.borrow_mut().drain(..).collect();
                if removed.is_empty() {
                    break;
                }
                let mut released = Vec::new();
                pending.retain(|&(old, new)| {
                    if removed.contains(&old) {
                        trace!("substitute_nodes: dropping {} -> {}", old, new);
                        released.push(new.node());
                        false
                    } else {
                        true
                    }
                });
                for n in released {
                    self.release(n);
                }
            }
        }

        self.events.release_delete_event(handle);
    }

    /// Drops one reference on `n`, taking it out if it was the last one.
    fn release(&mut self, n: NodeId) {
        if self.is_dead(n) {
            return;
        }
        if self.decr_fanout_size(n) == 0 && self.is_gate(n) {
            self.take_out_node(n);
        }
    }

    /// Takes out every live gate without fanouts. Returns the number of nodes taken out.
    pub fn take_out_dangling(&mut self) -> usize {
        let before = self.num_dead;
        for i in (1..self.size()).rev() {
            let n = NodeId::new(i as u32);
            if self.is_gate(n) && !self.is_dead(n) && self.fanout_size(n) == 0 {
                self.take_out_node(n);
            }
        }
        let count = self.num_dead - before;
        debug!("take_out_dangling() -> {}", count);
        count
    }
}
