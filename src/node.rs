use crate::function::FunctionCode;
use crate::signal::Signal;

/// Fanout counter packed together with the dead flag.
///
/// The low 31 bits hold the number of fanouts, the top bit marks a node that
/// was taken out. A dead node always reads as having zero fanouts.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct RefCount(u32);

const DEAD: u32 = 1 << 31;

impl RefCount {
    /// Largest fanout count a node can hold.
    pub const MAX: u32 = DEAD - 1;

    pub const fn count(self) -> u32 {
        self.0 & !DEAD
    }

    pub const fn is_dead(self) -> bool {
        self.0 & DEAD != 0
    }

    pub fn incr(&mut self) -> u32 {
        assert!(!self.is_dead(), "Incrementing the fanout of a dead node");
        assert!(self.0 < Self::MAX, "Fanout count overflow");
        self.0 += 1;
        self.0
    }

    /// Decrements the counter, saturating at zero.
    pub fn decr(&mut self) -> u32 {
        if self.count() > 0 {
            self.0 -= 1;
        }
        self.count()
    }

    /// Marks the node dead, dropping its count.
    pub fn kill(&mut self) {
        self.0 = DEAD;
    }

    /// Marks the node live with a count of zero.
    pub fn revive(&mut self) {
        self.0 = 0;
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub fanins: Vec<Signal>,
    pub func: FunctionCode,
    pub refs: RefCount,
    /// Application-specific scratch value.
    pub value: u32,
    /// Traversal id of the last visit.
    pub visited: u32,
}

impl Node {
    pub fn new(func: FunctionCode, fanins: Vec<Signal>) -> Self {
        Self {
            fanins,
            func,
            refs: RefCount::default(),
            value: 0,
            visited: 0,
        }
    }

    pub fn constant() -> Self {
        Self::new(FunctionCode::CONST0, Vec::new())
    }

    pub fn input() -> Self {
        Self::new(FunctionCode::INPUT, Vec::new())
    }

    pub fn is_dead(&self) -> bool {
        self.refs.is_dead()
    }
}
