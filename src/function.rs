//! Function codes and the function registry.
//!
//! Every node stores a [`FunctionCode`] instead of a truth table. The codes of
//! the builtin gate kinds are fixed; any other function is interned on first
//! use. Interning is content-addressed: bit-identical truth tables always map
//! to the same code, including the truth tables of the builtin kinds.

use std::collections::HashMap;
use std::fmt;

use crate::truth_table::TruthTable;

/// An opaque function identifier, resolved against a [`FunctionRegistry`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FunctionCode(u32);

impl FunctionCode {
    pub const CONST0: FunctionCode = FunctionCode(0);
    pub const INPUT: FunctionCode = FunctionCode(1);
    pub const BUF: FunctionCode = FunctionCode(2);
    pub const NOT: FunctionCode = FunctionCode(3);
    pub const AND: FunctionCode = FunctionCode(4);
    pub const NAND: FunctionCode = FunctionCode(5);
    pub const OR: FunctionCode = FunctionCode(6);
    pub const NOR: FunctionCode = FunctionCode(7);
    pub const LT: FunctionCode = FunctionCode(8);
    pub const GE: FunctionCode = FunctionCode(9);
    pub const GT: FunctionCode = FunctionCode(10);
    pub const LE: FunctionCode = FunctionCode(11);
    pub const XOR: FunctionCode = FunctionCode(12);
    pub const XNOR: FunctionCode = FunctionCode(13);
    pub const MAJ: FunctionCode = FunctionCode(14);
    pub const ITE: FunctionCode = FunctionCode(15);
    pub const XOR3: FunctionCode = FunctionCode(16);

    pub const fn id(self) -> u32 {
        self.0
    }

    /// Returns the builtin gate kind behind this code, if any.
    pub fn kind(self) -> Option<GateKind> {
        GateKind::ALL.get(self.0 as usize).copied()
    }

    pub fn is_builtin(self) -> bool {
        self.kind().is_some()
    }
}

impl fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(kind) => write!(f, "{}", kind),
            None => write!(f, "f{}", self.0),
        }
    }
}

/// The builtin catalogue, in code order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GateKind {
    Const0,
    Input,
    Buf,
    Not,
    And,
    Nand,
    Or,
    Nor,
    /// `!a & b`
    Lt,
    /// `a | !b`
    Ge,
    /// `a & !b`
    Gt,
    /// `!a | b`
    Le,
    Xor,
    Xnor,
    Maj,
    /// `a ? b : c`
    Ite,
    Xor3,
}

impl GateKind {
    pub const ALL: [GateKind; 17] = [
        GateKind::Const0,
        GateKind::Input,
        GateKind::Buf,
        GateKind::Not,
        GateKind::And,
        GateKind::Nand,
        GateKind::Or,
        GateKind::Nor,
        GateKind::Lt,
        GateKind::Ge,
        GateKind::Gt,
        GateKind::Le,
        GateKind::Xor,
        GateKind::Xnor,
        GateKind::Maj,
        GateKind::Ite,
        GateKind::Xor3,
    ];

    pub const fn code(self) -> FunctionCode {
        FunctionCode(self as u32)
    }

    /// Number of fanins of a node of this kind.
    pub const fn arity(self) -> usize {
        match self {
            GateKind::Const0 | GateKind::Input => 0,
            GateKind::Buf | GateKind::Not => 1,
            GateKind::Maj | GateKind::Ite | GateKind::Xor3 => 3,
            _ => 2,
        }
    }

    /// Checks if the kind is invariant under any permutation of its fanins.
    pub const fn is_commutative(self) -> bool {
        matches!(
            self,
            GateKind::And
                | GateKind::Nand
                | GateKind::Or
                | GateKind::Nor
                | GateKind::Xor
                | GateKind::Xnor
                | GateKind::Maj
                | GateKind::Xor3
        )
    }

    /// Truth table of the kind, as a single word. `None` for primary inputs.
    pub const fn bits(self) -> Option<u64> {
        match self {
            GateKind::Const0 => Some(0),
            GateKind::Input => None,
            GateKind::Buf => Some(0b10),
            GateKind::Not => Some(0b01),
            GateKind::And => Some(0b1000),
            GateKind::Nand => Some(0b0111),
            GateKind::Or => Some(0b1110),
            GateKind::Nor => Some(0b0001),
            GateKind::Lt => Some(0b0100),
            GateKind::Ge => Some(0b1011),
            GateKind::Gt => Some(0b0010),
            GateKind::Le => Some(0b1101),
            GateKind::Xor => Some(0b0110),
            GateKind::Xnor => Some(0b1001),
            GateKind::Maj => Some(0xE8),
            GateKind::Ite => Some(0xD8),
            GateKind::Xor3 => Some(0x96),
        }
    }

    pub fn truth_table(self) -> Option<TruthTable> {
        self.bits()
            .map(|bits| TruthTable::from_bits(self.arity() as u32, bits))
    }

    /// Evaluates the kind on up to three input words, bit-parallel.
    pub(crate) fn eval(self, x: &[u64]) -> u64 {
        match self {
            GateKind::Const0 | GateKind::Input => 0,
            GateKind::Buf => x[0],
            GateKind::Not => !x[0],
            GateKind::And => x[0] & x[1],
            GateKind::Nand => !(x[0] & x[1]),
            GateKind::Or => x[0] | x[1],
            GateKind::Nor => !(x[0] | x[1]),
            GateKind::Lt => !x[0] & x[1],
            GateKind::Ge => x[0] | !x[1],
            GateKind::Gt => x[0] & !x[1],
            GateKind::Le => !x[0] | x[1],
            GateKind::Xor => x[0] ^ x[1],
            GateKind::Xnor => !(x[0] ^ x[1]),
            GateKind::Maj => (x[0] & x[1]) | (x[0] & x[2]) | (x[1] & x[2]),
            GateKind::Ite => (x[0] & x[1]) | (!x[0] & x[2]),
            GateKind::Xor3 => x[0] ^ x[1] ^ x[2],
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GateKind::Const0 => "const0",
            GateKind::Input => "input",
            GateKind::Buf => "buf",
            GateKind::Not => "not",
            GateKind::And => "and",
            GateKind::Nand => "nand",
            GateKind::Or => "or",
            GateKind::Nor => "nor",
            GateKind::Lt => "lt",
            GateKind::Ge => "ge",
            GateKind::Gt => "gt",
            GateKind::Le => "le",
            GateKind::Xor => "xor",
            GateKind::Xnor => "xnor",
            GateKind::Maj => "maj",
            GateKind::Ite => "ite",
            GateKind::Xor3 => "xor3",
        };
        write!(f, "{}", name)
    }
}

/// Content-addressed map between truth tables and function codes.
///
/// Codes are never reused and never invalidated.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    tables: Vec<Option<TruthTable>>,
    codes: HashMap<TruthTable, FunctionCode>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            tables: Vec::with_capacity(GateKind::ALL.len()),
            codes: HashMap::new(),
        };
        for kind in GateKind::ALL {
            let tt = kind.truth_table();
            if let Some(tt) = &tt {
                registry.codes.insert(tt.clone(), kind.code());
            }
            registry.tables.push(tt);
        }
        registry
    }

    /// Returns the code of a builtin kind.
    pub fn code_of(&self, kind: GateKind) -> FunctionCode {
        kind.code()
    }

    /// Returns the code of `tt`, registering it if it is new.
    pub fn intern(&mut self, tt: &TruthTable) -> FunctionCode {
        if let Some(&code) = self.codes.get(tt) {
            return code;
        }
        let code = FunctionCode(self.tables.len() as u32);
        log::trace!("intern({}) -> {}", tt, code);
        self.tables.push(Some(tt.clone()));
        self.codes.insert(tt.clone(), code);
        code
    }

    /// Returns the code of `tt` without registering it.
    pub fn find(&self, tt: &TruthTable) -> Option<FunctionCode> {
        self.codes.get(tt).copied()
    }

    /// Returns the truth table behind `code`; `None` for primary inputs.
    pub fn truth_table(&self, code: FunctionCode) -> Option<&TruthTable> {
        self.tables
            .get(code.0 as usize)
            .unwrap_or_else(|| panic!("Unknown function code {}", code.0))
            .as_ref()
    }

    /// Number of variables of the function behind `code`.
    pub fn arity(&self, code: FunctionCode) -> usize {
        self.truth_table(code).map_or(0, |tt| tt.num_vars() as usize)
    }

    /// Number of registered codes, builtins included.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_codes() {
        let registry = FunctionRegistry::new();
        for kind in GateKind::ALL {
            assert_eq!(kind.code().kind(), Some(kind));
            assert_eq!(registry.code_of(kind), kind.code());
            assert_eq!(registry.arity(kind.code()), kind.arity());
        }
        assert_eq!(GateKind::And.code(), FunctionCode::AND);
        assert_eq!(GateKind::Xor3.code(), FunctionCode::XOR3);
        assert!(registry.truth_table(FunctionCode::INPUT).is_none());
    }

    #[test]
    fn test_builtin_tables_match_eval() {
        for kind in GateKind::ALL {
            let Some(tt) = kind.truth_table() else {
                continue;
            };
            let n = kind.arity();
            let vars: Vec<u64> = (0..3)
                .map(|i| {
                    if i < n {
                        TruthTable::nth_var(n as u32, i as u32).as_u64()
                    } else {
                        0
                    }
                })
                .collect();
            let mask = (1u64 << (1 << n)) - 1;
            assert_eq!(kind.eval(&vars) & mask, tt.as_u64(), "kind = {}", kind);
        }
    }

    #[test]
    fn test_intern_content_addressed() {
        let mut registry = FunctionRegistry::new();
        let f = TruthTable::from_bits(3, 0x17);
        let g = TruthTable::from_bits(3, 0x17);
        let h = TruthTable::from_bits(3, 0x71);

        let cf = registry.intern(&f);
        let cg = registry.intern(&g);
        let ch = registry.intern(&h);
        assert_eq!(cf, cg);
        assert_ne!(cf, ch);
        assert!(!cf.is_builtin());
        assert_eq!(registry.truth_table(cf), Some(&f));
        assert_eq!(registry.len(), GateKind::ALL.len() + 2);
    }

    #[test]
    fn test_intern_builtin() {
        let mut registry = FunctionRegistry::new();
        let and = TruthTable::from_bits(2, 0b1000);
        assert_eq!(registry.intern(&and), FunctionCode::AND);
        let maj = TruthTable::from_hex(3, "e8").unwrap();
        assert_eq!(registry.intern(&maj), FunctionCode::MAJ);
        assert_eq!(registry.len(), GateKind::ALL.len());
    }

    #[test]
    fn test_display() {
        assert_eq!(FunctionCode::AND.to_string(), "and");
        assert_eq!(FunctionCode(100).to_string(), "f100");
    }
}
