use std::fmt::{Debug, Display, Formatter};
use std::ops::{BitXor, Not};

use crate::types::NodeId;

/// A possibly complemented reference to a network node.
///
/// The signal is packed as `(node << 1) | complement`, so the derived ordering
/// sorts by node first and by complement second.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Signal(u32);

const MAX_INDEX: u32 = u32::MAX >> 1;

// Constructors
impl Signal {
    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn one() -> Self {
        Self(1)
    }

    pub const fn new(node: NodeId, complement: bool) -> Self {
        assert!(node.id() <= MAX_INDEX, "Node index does not fit into a signal");
        Self((node.id() << 1) | complement as u32)
    }

    pub const fn from_node(node: NodeId) -> Self {
        Self::new(node, false)
    }

    pub const fn constant(value: bool) -> Self {
        Self(value as u32)
    }
}

// Getters
impl Signal {
    pub const fn node(self) -> NodeId {
        NodeId::new(self.0 >> 1)
    }

    pub const fn index(self) -> usize {
        (self.0 >> 1) as usize
    }

    pub const fn is_complemented(self) -> bool {
        self.0 & 1 != 0
    }
}

// Checks
impl Signal {
    pub const fn is_const(self) -> bool {
        self.0 >> 1 == 0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_one(self) -> bool {
        self.0 == 1
    }

    /// Checks if both signals refer to the same node with opposite polarity.
    pub const fn is_complement_of(self, other: Signal) -> bool {
        self.0 ^ other.0 == 1
    }
}

// Algebra
impl Signal {
    /// Returns the signal with the complement bit cleared.
    pub const fn positive(self) -> Self {
        Self(self.0 & !1)
    }

    /// Returns the signal with the complement bit set.
    pub const fn negative(self) -> Self {
        Self(self.0 | 1)
    }

    /// Returns the signal pointing at `node` with the complement bit of `self`.
    pub const fn with_node(self, node: NodeId) -> Self {
        Self::new(node, self.is_complemented())
    }
}

impl From<bool> for Signal {
    fn from(b: bool) -> Self {
        Self::constant(b)
    }
}

impl From<NodeId> for Signal {
    fn from(node: NodeId) -> Self {
        Self::from_node(node)
    }
}

impl Not for Signal {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(self.0 ^ 1)
    }
}

impl Not for &Signal {
    type Output = Signal;

    fn not(self) -> Self::Output {
        Signal(self.0 ^ 1)
    }
}

impl BitXor<bool> for Signal {
    type Output = Self;

    fn bitxor(self, rhs: bool) -> Self::Output {
        Self(self.0 ^ rhs as u32)
    }
}

impl Display for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_const() {
            write!(f, "{}", self.0 & 1)
        } else {
            if self.is_complemented() {
                write!(f, "!")?;
            }
            write!(f, "{}", self.node())
        }
    }
}

impl Debug for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
