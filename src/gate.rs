//! Canonicalization rules for the builtin gate kinds.
//!
//! Every rule works on signals only and never touches the network. It returns
//! either a signal the gate collapses to, or the canonical key of the node that
//! realizes the gate together with the polarity of its output:
//!
//! ```text
//! and(b, a)      => Node(and, [a, b])            (commutative reordering)
//! and(a, !a)     => Signal(0)                    (trivial case)
//! xor(!a, b)     => Node(xor, [a, b]), negated   (phase normalization)
//! maj(0, b, c)   => Node(and, [b, c])            (kind reduction)
//! ```

use log::debug;

use crate::function::{FunctionCode, GateKind};
use crate::signal::Signal;

/// Result of canonicalizing a gate.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Canonical {
    /// The gate collapses to an existing signal.
    Signal(Signal),
    /// The gate is realized by the node `(func, fanins)`, complemented if `complement`.
    Node {
        func: FunctionCode,
        fanins: Vec<Signal>,
        complement: bool,
    },
}

impl Canonical {
    fn node(kind: GateKind, fanins: Vec<Signal>, complement: bool) -> Self {
        Canonical::Node {
            func: kind.code(),
            fanins,
            complement,
        }
    }

    /// Negates the output of the canonical form.
    pub fn negate(self) -> Self {
        match self {
            Canonical::Signal(s) => Canonical::Signal(!s),
            Canonical::Node {
                func,
                fanins,
                complement,
            } => Canonical::Node {
                func,
                fanins,
                complement: !complement,
            },
        }
    }
}

fn sort2(a: Signal, b: Signal) -> (Signal, Signal) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn sort3(a: Signal, b: Signal, c: Signal) -> [Signal; 3] {
    let mut v = [a, b, c];
    v.sort();
    v
}

pub fn buf(a: Signal) -> Canonical {
    Canonical::Signal(a)
}

pub fn not(a: Signal) -> Canonical {
    Canonical::Signal(!a)
}

pub fn and(a: Signal, b: Signal) -> Canonical {
    let (a, b) = sort2(a, b);
    if a.node() == b.node() {
        return if a == b {
            debug!("and(a,a) => a");
            Canonical::Signal(a)
        } else {
            debug!("and(a,!a) => 0");
            Canonical::Signal(Signal::zero())
        };
    }
    if a.is_zero() {
        debug!("and(0,b) => 0");
        return Canonical::Signal(Signal::zero());
    }
    if a.is_one() {
        debug!("and(1,b) => b");
        return Canonical::Signal(b);
    }
    Canonical::node(GateKind::And, vec![a, b], false)
}

pub fn nand(a: Signal, b: Signal) -> Canonical {
    let (a, b) = sort2(a, b);
    if a.node() == b.node() {
        return if a == b {
            debug!("nand(a,a) => !a");
            Canonical::Signal(!a)
        } else {
            debug!("nand(a,!a) => 1");
            Canonical::Signal(Signal::one())
        };
    }
    if a.is_zero() {
        debug!("nand(0,b) => 1");
        return Canonical::Signal(Signal::one());
    }
    if a.is_one() {
        debug!("nand(1,b) => !b");
        return Canonical::Signal(!b);
    }
    Canonical::node(GateKind::Nand, vec![a, b], false)
}

pub fn or(a: Signal, b: Signal) -> Canonical {
    let (a, b) = sort2(a, b);
    if a.node() == b.node() {
        return if a == b {
            debug!("or(a,a) => a");
            Canonical::Signal(a)
        } else {
            debug!("or(a,!a) => 1");
            Canonical::Signal(Signal::one())
        };
    }
    if a.is_zero() {
        debug!("or(0,b) => b");
        return Canonical::Signal(b);
    }
    if a.is_one() {
        debug!("or(1,b) => 1");
        return Canonical::Signal(Signal::one());
    }
    Canonical::node(GateKind::Or, vec![a, b], false)
}

pub fn nor(a: Signal, b: Signal) -> Canonical {
    let (a, b) = sort2(a, b);
    if a.node() == b.node() {
        return if a == b {
            debug!("nor(a,a) => !a");
            Canonical::Signal(!a)
        } else {
            debug!("nor(a,!a) => 0");
            Canonical::Signal(Signal::zero())
        };
    }
    if a.is_zero() {
        debug!("nor(0,b) => !b");
        return Canonical::Signal(!b);
    }
    if a.is_one() {
        debug!("nor(1,b) => 0");
        return Canonical::Signal(Signal::zero());
    }
    Canonical::node(GateKind::Nor, vec![a, b], false)
}

/// `lt(a, b) = !a & b`
pub fn lt(a: Signal, b: Signal) -> Canonical {
    if a.node() == b.node() {
        return if a == b {
            debug!("lt(a,a) => 0");
            Canonical::Signal(Signal::zero())
        } else {
            debug!("lt(a,!a) => !a");
            Canonical::Signal(b)
        };
    }
    if a.is_zero() {
        return Canonical::Signal(b);
    }
    if a.is_one() || b.is_zero() {
        return Canonical::Signal(Signal::zero());
    }
    if b.is_one() {
        return Canonical::Signal(!a);
    }
    Canonical::node(GateKind::Lt, vec![a, b], false)
}

/// `ge(a, b) = a | !b`
pub fn ge(a: Signal, b: Signal) -> Canonical {
    if a.node() == b.node() {
        return if a == b {
            debug!("ge(a,a) => 1");
            Canonical::Signal(Signal::one())
        } else {
            debug!("ge(a,!a) => a");
            Canonical::Signal(a)
        };
    }
    if a.is_zero() {
        return Canonical::Signal(!b);
    }
    if a.is_one() || b.is_zero() {
        return Canonical::Signal(Signal::one());
    }
    if b.is_one() {
        return Canonical::Signal(a);
    }
    Canonical::node(GateKind::Ge, vec![a, b], false)
}

/// `gt(a, b) = a & !b`
pub fn gt(a: Signal, b: Signal) -> Canonical {
    if a.node() == b.node() {
        return if a == b {
            debug!("gt(a,a) => 0");
            Canonical::Signal(Signal::zero())
        } else {
            debug!("gt(a,!a) => a");
            Canonical::Signal(a)
        };
    }
    if a.is_zero() || b.is_one() {
        return Canonical::Signal(Signal::zero());
    }
    if a.is_one() {
        return Canonical::Signal(!b);
    }
    if b.is_zero() {
        return Canonical::Signal(a);
    }
    Canonical::node(GateKind::Gt, vec![a, b], false)
}

/// `le(a, b) = !a | b`
pub fn le(a: Signal, b: Signal) -> Canonical {
    if a.node() == b.node() {
        return if a == b {
            debug!("le(a,a) => 1");
            Canonical::Signal(Signal::one())
        } else {
            debug!("le(a,!a) => !a");
            Canonical::Signal(b)
        };
    }
    if a.is_zero() || b.is_one() {
        return Canonical::Signal(Signal::one());
    }
    if a.is_one() {
        return Canonical::Signal(b);
    }
    if b.is_zero() {
        return Canonical::Signal(!a);
    }
    Canonical::node(GateKind::Le, vec![a, b], false)
}

pub fn xor(a: Signal, b: Signal) -> Canonical {
    let phase = a.is_complemented() ^ b.is_complemented();
    let (a, b) = sort2(a.positive(), b.positive());
    if a == b {
        debug!("xor(a,a) => {}", phase as u8);
        return Canonical::Signal(Signal::constant(phase));
    }
    if a.is_const() {
        debug!("xor(c,b) => b");
        return Canonical::Signal(b ^ phase);
    }
    Canonical::node(GateKind::Xor, vec![a, b], phase)
}

pub fn xnor(a: Signal, b: Signal) -> Canonical {
    let phase = a.is_complemented() ^ b.is_complemented();
    let (a, b) = sort2(a.positive(), b.positive());
    if a == b {
        debug!("xnor(a,a) => {}", !phase as u8);
        return Canonical::Signal(Signal::constant(!phase));
    }
    if a.is_const() {
        debug!("xnor(c,b) => !b");
        return Canonical::Signal(!b ^ phase);
    }
    Canonical::node(GateKind::Xnor, vec![a, b], phase)
}

pub fn maj(a: Signal, b: Signal, c: Signal) -> Canonical {
    let [a, b, c] = sort3(a, b, c);
    for (x, y, rest) in [(a, b, c), (a, c, b), (b, c, a)] {
        if x.node() == y.node() {
            return if x == y {
                debug!("maj(a,a,c) => a");
                Canonical::Signal(x)
            } else {
                debug!("maj(a,!a,c) => c");
                Canonical::Signal(rest)
            };
        }
    }
    if a.is_zero() {
        debug!("maj(0,b,c) => and(b,c)");
        return and(b, c);
    }
    if a.is_one() {
        debug!("maj(1,b,c) => or(b,c)");
        return or(b, c);
    }
    let negated = [a, b, c].iter().filter(|s| s.is_complemented()).count();
    if negated >= 2 {
        debug!("maj: restoring phase");
        return Canonical::node(GateKind::Maj, vec![!a, !b, !c], true);
    }
    Canonical::node(GateKind::Maj, vec![a, b, c], false)
}

pub fn xor3(a: Signal, b: Signal, c: Signal) -> Canonical {
    let phase = a.is_complemented() ^ b.is_complemented() ^ c.is_complemented();
    let [a, b, c] = sort3(a.positive(), b.positive(), c.positive());
    for (x, y, rest) in [(a, b, c), (a, c, b), (b, c, a)] {
        if x == y {
            debug!("xor3(a,a,c) => c");
            return Canonical::Signal(rest ^ phase);
        }
    }
    if a.is_const() {
        debug!("xor3(0,b,c) => xor(b,c)");
        let res = xor(b, c);
        return if phase { res.negate() } else { res };
    }
    Canonical::node(GateKind::Xor3, vec![a, b, c], phase)
}

/// `ite(i, t, e) = i ? t : e`
pub fn ite(i: Signal, t: Signal, e: Signal) -> Canonical {
    if i.is_const() {
        debug!("ite(c,t,e) => t or e");
        return Canonical::Signal(if i.is_one() { t } else { e });
    }
    if t == e {
        debug!("ite(i,t,t) => t");
        return Canonical::Signal(t);
    }
    let (i, t, e) = if i.is_complemented() {
        debug!("ite(!i,t,e) => ite(i,e,t)");
        (!i, e, t)
    } else {
        (i, t, e)
    };
    if t.node() == i.node() {
        return if t == i {
            debug!("ite(i,i,e) => or(i,e)");
            or(i, e)
        } else {
            debug!("ite(i,!i,e) => lt(i,e)");
            lt(i, e)
        };
    }
    if e.node() == i.node() {
        return if e == i {
            debug!("ite(i,t,i) => and(i,t)");
            and(i, t)
        } else {
            debug!("ite(i,t,!i) => le(i,t)");
            le(i, t)
        };
    }
    if t.is_const() {
        return if t.is_one() { or(i, e) } else { lt(i, e) };
    }
    if e.is_const() {
        return if e.is_zero() { and(i, t) } else { le(i, t) };
    }
    if t.is_complement_of(e) {
        debug!("ite(i,t,!t) => xnor(i,t)");
        return xnor(i, t);
    }
    if t.is_complemented() {
        debug!("ite(i,!t,e) => !ite(i,t,!e)");
        return Canonical::node(GateKind::Ite, vec![i, !t, !e], true);
    }
    Canonical::node(GateKind::Ite, vec![i, t, e], false)
}

/// Canonicalizes a builtin gate of the given kind.
///
/// # Panics
///
/// Panics if `fanins` does not match the arity of `kind`, or if `kind` is
/// [`GateKind::Input`].
pub fn canonicalize(kind: GateKind, fanins: &[Signal]) -> Canonical {
    assert_eq!(fanins.len(), kind.arity(), "Wrong number of fanins for {}", kind);
    match kind {
        GateKind::Const0 => Canonical::Signal(Signal::zero()),
        GateKind::Input => panic!("Primary inputs cannot be canonicalized"),
        GateKind::Buf => buf(fanins[0]),
        GateKind::Not => not(fanins[0]),
        GateKind::And => and(fanins[0], fanins[1]),
        GateKind::Nand => nand(fanins[0], fanins[1]),
        GateKind::Or => or(fanins[0], fanins[1]),
        GateKind::Nor => nor(fanins[0], fanins[1]),
        GateKind::Lt => lt(fanins[0], fanins[1]),
        GateKind::Ge => ge(fanins[0], fanins[1]),
        GateKind::Gt => gt(fanins[0], fanins[1]),
        GateKind::Le => le(fanins[0], fanins[1]),
        GateKind::Xor => xor(fanins[0], fanins[1]),
        GateKind::Xnor => xnor(fanins[0], fanins[1]),
        GateKind::Maj => maj(fanins[0], fanins[1], fanins[2]),
        GateKind::Ite => ite(fanins[0], fanins[1], fanins[2]),
        GateKind::Xor3 => xor3(fanins[0], fanins[1], fanins[2]),
    }
}

/// Canonicalizes a node of any function.
///
/// Functions outside the builtin catalogue keep their fanins as given, since
/// their truth table cannot be permuted without registering a new code.
pub fn canonicalize_node(func: FunctionCode, fanins: &[Signal]) -> Canonical {
    match func.kind() {
        Some(kind) => canonicalize(kind, fanins),
        None => Canonical::Node {
            func,
            fanins: fanins.to_vec(),
            complement: false,
        },
    }
}

/// Sorts the fanins of commutative kinds, without any other normalization.
pub fn sort_fanins(func: FunctionCode, fanins: &mut [Signal]) {
    if func.kind().is_some_and(|kind| kind.is_commutative()) {
        fanins.sort();
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::function::FunctionRegistry;
    use crate::truth_table::TruthTable;
    use crate::types::NodeId;

    fn var(i: u32) -> Signal {
        Signal::from_node(NodeId::new(i))
    }

    fn node(kind: GateKind, fanins: &[Signal], complement: bool) -> Canonical {
        Canonical::node(kind, fanins.to_vec(), complement)
    }

    const ZERO: Signal = Signal::zero();
    const ONE: Signal = Signal::one();

    #[test]
    fn test_and_table() {
        let (a, b) = (var(1), var(2));
        assert_eq!(and(a, a), Canonical::Signal(a));
        assert_eq!(and(a, !a), Canonical::Signal(ZERO));
        assert_eq!(and(a, ONE), Canonical::Signal(a));
        assert_eq!(and(ZERO, a), Canonical::Signal(ZERO));
        assert_eq!(and(b, a), node(GateKind::And, &[a, b], false));
        assert_eq!(and(a, b), and(b, a));
    }

    #[test]
    fn test_nand_or_nor_table() {
        let (a, b) = (var(1), var(2));
        assert_eq!(nand(a, a), Canonical::Signal(!a));
        assert_eq!(nand(a, !a), Canonical::Signal(ONE));
        assert_eq!(nand(a, ZERO), Canonical::Signal(ONE));
        assert_eq!(nand(a, ONE), Canonical::Signal(!a));
        assert_eq!(nand(b, a), node(GateKind::Nand, &[a, b], false));

        assert_eq!(or(a, a), Canonical::Signal(a));
        assert_eq!(or(a, !a), Canonical::Signal(ONE));
        assert_eq!(or(a, ZERO), Canonical::Signal(a));
        assert_eq!(or(a, ONE), Canonical::Signal(ONE));

        assert_eq!(nor(a, a), Canonical::Signal(!a));
        assert_eq!(nor(a, !a), Canonical::Signal(ZERO));
        assert_eq!(nor(a, ZERO), Canonical::Signal(!a));
        assert_eq!(nor(a, ONE), Canonical::Signal(ZERO));
        assert_eq!(nor(b, !a), node(GateKind::Nor, &[!a, b], false));
    }

    #[test]
    fn test_asymmetric_table() {
        let (a, b) = (var(1), var(2));
        assert_eq!(lt(a, a), Canonical::Signal(ZERO));
        assert_eq!(lt(a, !a), Canonical::Signal(!a));
        assert_eq!(lt(ZERO, b), Canonical::Signal(b));
        assert_eq!(lt(ONE, b), Canonical::Signal(ZERO));
        assert_eq!(lt(a, ZERO), Canonical::Signal(ZERO));
        assert_eq!(lt(a, ONE), Canonical::Signal(!a));
        assert_ne!(lt(a, b), lt(b, a));

        assert_eq!(ge(a, a), Canonical::Signal(ONE));
        assert_eq!(ge(a, !a), Canonical::Signal(a));
        assert_eq!(ge(ZERO, b), Canonical::Signal(!b));
        assert_eq!(ge(a, ONE), Canonical::Signal(a));

        assert_eq!(gt(a, a), Canonical::Signal(ZERO));
        assert_eq!(gt(a, !a), Canonical::Signal(a));
        assert_eq!(gt(ONE, b), Canonical::Signal(!b));
        assert_eq!(gt(a, ZERO), Canonical::Signal(a));

        assert_eq!(le(a, a), Canonical::Signal(ONE));
        assert_eq!(le(a, !a), Canonical::Signal(!a));
        assert_eq!(le(ONE, b), Canonical::Signal(b));
        assert_eq!(le(a, ZERO), Canonical::Signal(!a));
    }

    #[test]
    fn test_xor_phase() {
        let (a, b) = (var(1), var(2));
        assert_eq!(xor(a, a), Canonical::Signal(ZERO));
        assert_eq!(xor(a, !a), Canonical::Signal(ONE));
        assert_eq!(xor(a, ZERO), Canonical::Signal(a));
        assert_eq!(xor(a, ONE), Canonical::Signal(!a));
        assert_eq!(xor(!b, a), node(GateKind::Xor, &[a, b], true));
        assert_eq!(xor(!b, !a), node(GateKind::Xor, &[a, b], false));

        assert_eq!(xnor(a, a), Canonical::Signal(ONE));
        assert_eq!(xnor(a, ZERO), Canonical::Signal(!a));
        assert_eq!(xnor(a, ONE), Canonical::Signal(a));
        assert_eq!(xnor(!a, b), node(GateKind::Xnor, &[a, b], true));
    }

    #[test]
    fn test_maj() {
        let (a, b, c) = (var(1), var(2), var(3));
        assert_eq!(maj(a, a, c), Canonical::Signal(a));
        assert_eq!(maj(c, a, !a), Canonical::Signal(c));
        assert_eq!(maj(ZERO, b, c), and(b, c));
        assert_eq!(maj(b, ONE, c), or(b, c));
        assert_eq!(maj(c, b, a), node(GateKind::Maj, &[a, b, c], false));
        assert_eq!(maj(!a, !b, c), node(GateKind::Maj, &[a, b, !c], true));
        assert_eq!(maj(!a, !b, !c), node(GateKind::Maj, &[a, b, c], true));
        assert_eq!(maj(a, !b, c), node(GateKind::Maj, &[a, !b, c], false));
    }

    #[test]
    fn test_xor3() {
        let (a, b, c) = (var(1), var(2), var(3));
        assert_eq!(xor3(a, a, c), Canonical::Signal(c));
        assert_eq!(xor3(a, !a, c), Canonical::Signal(!c));
        assert_eq!(xor3(ZERO, b, c), node(GateKind::Xor, &[b, c], false));
        assert_eq!(xor3(ONE, b, c), node(GateKind::Xor, &[b, c], true));
        assert_eq!(xor3(!c, b, a), node(GateKind::Xor3, &[a, b, c], true));
    }

    #[test]
    fn test_ite() {
        let (i, t, e) = (var(1), var(2), var(3));
        assert_eq!(ite(ONE, t, e), Canonical::Signal(t));
        assert_eq!(ite(ZERO, t, e), Canonical::Signal(e));
        assert_eq!(ite(i, t, t), Canonical::Signal(t));
        assert_eq!(ite(i, i, e), or(i, e));
        assert_eq!(ite(i, t, ZERO), and(i, t));
        assert_eq!(ite(i, ONE, e), or(i, e));
        assert_eq!(ite(i, t, !t), xnor(i, t));
        assert_eq!(ite(!i, t, e), ite(i, e, t));
        assert_eq!(ite(i, t, e), node(GateKind::Ite, &[i, t, e], false));
        assert_eq!(ite(i, !t, e), node(GateKind::Ite, &[i, t, !e], true));
    }

    #[test]
    fn test_canonicalize_dispatch() {
        let (a, b) = (var(1), var(2));
        assert_eq!(canonicalize(GateKind::And, &[b, a]), and(a, b));
        assert_eq!(canonicalize(GateKind::Not, &[a]), Canonical::Signal(!a));
        let mut registry = FunctionRegistry::new();
        let f = registry.intern(&TruthTable::from_bits(3, 0x17));
        assert!(!f.is_builtin());
        let c = var(3);
        assert_eq!(
            canonicalize_node(f, &[c, b, a]),
            Canonical::Node {
                func: f,
                fanins: vec![c, b, a],
                complement: false
            }
        );
    }

    #[test]
    fn test_sort_fanins() {
        let (a, b) = (var(1), var(2));
        let mut fanins = [b, a];
        sort_fanins(FunctionCode::LT, &mut fanins);
        assert_eq!(fanins, [b, a]);
        sort_fanins(FunctionCode::AND, &mut fanins);
        assert_eq!(fanins, [a, b]);
    }
}
