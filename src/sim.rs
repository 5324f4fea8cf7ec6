//! Simulation of a network.
//!
//! Node indices are not a topological order once nodes have been rewritten in
//! place, so every simulation first orders the transitive fanin of the
//! primary outputs with a depth-first search.

use log::debug;

use crate::network::Network;
use crate::signal::Signal;
use crate::truth_table::TruthTable;
use crate::types::NodeId;

/// Largest number of primary inputs for exhaustive simulation.
pub const MAX_SIM_PIS: usize = 16;

impl Network {
    /// Nodes in the transitive fanin of the primary outputs, fanins first.
    pub fn topological_order(&self) -> Vec<NodeId> {
        self.order_with(None)
    }

    /// Topological order where `forced.0` is treated as depending on `forced.1` only.
    fn order_with(&self, forced: Option<(NodeId, Signal)>) -> Vec<NodeId> {
        let forced_fanin = |n: NodeId| -> Option<Signal> { forced.filter(|&(o, _)| o == n).map(|(_, r)| r) };

        let mut order = Vec::new();
        let mut seen = vec![false; self.size()];
        for po in self.pos() {
            let root = po.node();
            if seen[root.index()] {
                continue;
            }
            seen[root.index()] = true;
            let mut stack = vec![(root, 0usize)];
            while let Some((n, i)) = stack.pop() {
                let next = match forced_fanin(n) {
                    Some(r) => (i == 0).then_some(r),
                    None => self.fanins(n).get(i).copied(),
                };
                match next {
                    Some(f) => {
                        stack.push((n, i + 1));
                        let m = f.node();
                        if !seen[m.index()] {
                            seen[m.index()] = true;
                            stack.push((m, 0));
                        }
                    }
                    None => order.push(n),
                }
            }
        }
        order
    }

    /// Complete truth table of every primary output over the primary inputs.
    ///
    /// # Panics
    ///
    /// Panics if the network has more than [`MAX_SIM_PIS`] primary inputs.
    pub fn simulate(&self) -> Vec<TruthTable> {
        self.simulate_tables(None)
    }

    /// Like [`simulate`][Self::simulate], with `node` forced to the value of `signal`.
    pub fn simulate_with(&self, node: NodeId, signal: Signal) -> Vec<TruthTable> {
        self.simulate_tables(Some((node, signal)))
    }

    fn simulate_tables(&self, forced: Option<(NodeId, Signal)>) -> Vec<TruthTable> {
        assert!(
            self.num_pis() <= MAX_SIM_PIS,
            "Cannot simulate {} inputs exhaustively",
            self.num_pis()
        );
        let num_vars = self.num_pis() as u32;
        debug!("simulate({} inputs)", num_vars);

        let mut values = vec![TruthTable::new(num_vars); self.size()];
        for (i, pi) in self.pis().enumerate() {
            values[pi.index()] = TruthTable::nth_var(num_vars, i as u32);
        }
        let read = |values: &[TruthTable], s: Signal| {
            let tt = &values[s.index()];
            if s.is_complemented() {
                !tt
            } else {
                tt.clone()
            }
        };

        for n in self.order_with(forced) {
            if let Some((o, r)) = forced {
                if o == n {
                    values[n.index()] = read(&values, r);
                    continue;
                }
            }
            if !self.is_gate(n) {
                continue;
            }
            let fanins: Vec<TruthTable> = self.fanins(n).iter().map(|&f| read(&values, f)).collect();
            values[n.index()] = self.eval_tables(n, &fanins, num_vars);
        }

        self.pos().map(|po| read(&values, po)).collect()
    }

    fn eval_tables(&self, n: NodeId, fanins: &[TruthTable], num_vars: u32) -> TruthTable {
        match self.kind(n) {
            Some(kind) => {
                let num_words = TruthTable::new(num_vars).words().len();
                let words = (0..num_words)
                    .map(|w| {
                        let mut x = [0u64; 3];
                        for (i, tt) in fanins.iter().enumerate() {
                            x[i] = tt.words()[w];
                        }
                        kind.eval(&x[..fanins.len()])
                    })
                    .collect();
                TruthTable::from_words(num_vars, words)
            }
            None => {
                let function = self.node_function(n);
                let mut result = TruthTable::new(num_vars);
                for bit in 0..result.num_bits() {
                    let index = fanins
                        .iter()
                        .enumerate()
                        .fold(0, |acc, (j, tt)| acc | ((tt.bit(bit) as usize) << j));
                    result.set_bit(bit, function.bit(index));
                }
                result
            }
        }
    }

    /// Values of the primary outputs under one input assignment.
    ///
    /// # Panics
    ///
    /// Panics if `inputs` does not hold one value per primary input.
    pub fn simulate_pattern(&self, inputs: &[bool]) -> Vec<bool> {
        assert_eq!(inputs.len(), self.num_pis(), "Expected one value per primary input");
        let mut values = vec![false; self.size()];
        for (pi, &v) in self.pis().zip(inputs) {
            values[pi.index()] = v;
        }
        let read = |values: &[bool], s: Signal| values[s.index()] ^ s.is_complemented();

        for n in self.topological_order() {
            if !self.is_gate(n) {
                continue;
            }
            let fanins: Vec<bool> = self.fanins(n).iter().map(|&f| read(&values, f)).collect();
            values[n.index()] = match self.kind(n) {
                Some(kind) => {
                    let x: Vec<u64> = fanins.iter().map(|&b| b as u64).collect();
                    kind.eval(&x) & 1 == 1
                }
                None => {
                    let index = fanins
                        .iter()
                        .enumerate()
                        .fold(0, |acc, (j, &b)| acc | ((b as usize) << j));
                    self.registry()
                        .truth_table(self.func(n))
                        .is_some_and(|tt| tt.bit(index))
                }
            };
        }

        self.pos().map(|po| read(&values, po)).collect()
    }
}
