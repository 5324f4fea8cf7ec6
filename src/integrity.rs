use std::collections::{HashMap, HashSet};

use crate::error::{NetworkError, Result};
use crate::network::Network;
use crate::types::NodeId;

impl Network {
    /// Checks that the network structure is consistent.
    ///
    /// This is meant for debugging and tests: construction and mutation are
    /// supposed to maintain these invariants at all times. Verified are the
    /// arity of every node, the liveness of fanins and outputs, fanout counts
    /// against the actual edges, and the hash table against the live gates.
    pub fn check_integrity(&self) -> Result<()> {
        if self.is_dead(NodeId::CONSTANT) || !self.fanins(NodeId::CONSTANT).is_empty() {
            return Err(NetworkError::InvalidState("invalid constant node".to_string()));
        }

        let mut edges: HashMap<NodeId, u32> = HashMap::new();
        let mut num_dead = 0;
        for i in 1..self.size() {
            let n = NodeId::new(i as u32);
            if self.is_dead(n) {
                num_dead += 1;
                if self.fanout_size(n) != 0 {
                    return Err(NetworkError::InvalidState(format!("dead node {} has fanouts", n)));
                }
                continue;
            }
            self.check_node_integrity(n)?;
            for f in self.fanins(n) {
                *edges.entry(f.node()).or_default() += 1;
            }
        }
        if num_dead != self.num_dead() {
            return Err(NetworkError::InvalidState(format!(
                "{} dead nodes, {} recorded",
                num_dead,
                self.num_dead()
            )));
        }

        for (i, po) in self.pos().enumerate() {
            if self.is_dead(po.node()) {
                return Err(NetworkError::InvalidState(format!(
                    "output {} refers to dead node {}",
                    i,
                    po.node()
                )));
            }
            *edges.entry(po.node()).or_default() += 1;
        }

        for n in self.nodes().filter(|&n| !n.is_constant()) {
            let expected = edges.get(&n).copied().unwrap_or(0);
            if self.fanout_size(n) != expected {
                return Err(NetworkError::InvalidState(format!(
                    "node {} has fanout count {} but {} fanouts",
                    n,
                    self.fanout_size(n),
                    expected
                )));
            }
        }

        self.check_strash_integrity()
    }

    fn check_node_integrity(&self, n: NodeId) -> Result<()> {
        if self.is_pi(n) {
            if self.pi_index(n).is_none() || !self.fanins(n).is_empty() {
                return Err(NetworkError::InvalidState(format!("invalid input node {}", n)));
            }
            return Ok(());
        }

        let arity = self.registry().arity(self.func(n));
        if self.fanin_size(n) != arity {
            return Err(NetworkError::InvalidState(format!(
                "node {} has {} fanins, its function {} has {}",
                n,
                self.fanin_size(n),
                self.func(n),
                arity
            )));
        }
        for f in self.fanins(n) {
            if f.index() >= self.size() {
                return Err(NetworkError::InvalidState(format!(
                    "node {} refers to unknown node {}",
                    n,
                    f.node()
                )));
            }
            if self.is_dead(f.node()) {
                return Err(NetworkError::InvalidState(format!(
                    "node {} refers to dead node {}",
                    n,
                    f.node()
                )));
            }
        }
        Ok(())
    }

    /// Every table entry and every shadow is a live node under its own key,
    /// and every live gate either holds the entry of its key or shadows it.
    fn check_strash_integrity(&self) -> Result<()> {
        let mut registered = HashSet::new();
        for (key, n) in self.strash.iter().chain(self.strash.shadows()) {
            if n.index() >= self.size() || self.is_dead(n) {
                return Err(NetworkError::InvalidState(format!(
                    "hash table entry refers to missing or dead node {}",
                    n
                )));
            }
            if *key != self.key(n) {
                return Err(NetworkError::InvalidState(format!(
                    "hash table entry of node {} does not match its fanins",
                    n
                )));
            }
            registered.insert(n);
        }
        for n in self.gates() {
            if !registered.contains(&n) {
                return Err(NetworkError::InvalidState(format!(
                    "node {} is missing from the hash table",
                    n
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_integrity_after_construction() {
        let mut ntk = Network::new();
        let a = ntk.create_pi();
        let b = ntk.create_pi();
        let c = ntk.create_pi();
        let f = ntk.create_maj(a, b, c);
        let g = ntk.create_xor(f, !a);
        ntk.create_po(g);
        ntk.create_po(f);
        assert_eq!(ntk.check_integrity(), Ok(()));
    }

    #[test]
    fn test_integrity_detects_bad_count() {
        let mut ntk = Network::new();
        let a = ntk.create_pi();
        let b = ntk.create_pi();
        let f = ntk.create_and(a, b);
        ntk.create_po(f);

        ntk.incr_fanout_size(a.node());
        assert!(matches!(
            ntk.check_integrity(),
            Err(NetworkError::InvalidState(_))
        ));
        ntk.decr_fanout_size(a.node());
        assert_eq!(ntk.check_integrity(), Ok(()));
    }

    #[test]
    fn test_integrity_detects_dead_output() {
        let mut ntk = Network::new();
        let a = ntk.create_pi();
        let b = ntk.create_pi();
        let f = ntk.create_or(a, b);
        ntk.create_po(f);

        ntk.take_out_node(f.node());
        assert!(ntk.check_integrity().is_err());
    }
}
