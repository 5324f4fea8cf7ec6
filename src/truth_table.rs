//! Bit-packed truth tables of small Boolean functions.
//!
//! Bit `i` of a truth table is the value of the function under the assignment
//! where variable `j` takes bit `j` of `i`. Tables over fewer than 6 variables
//! still occupy one `u64` word, with the unused high bits kept at zero.

use std::fmt::{Debug, Display, Formatter};
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// Projection masks for the first six variables within one word.
const VAR_MASKS: [u64; 6] = [
    0xAAAA_AAAA_AAAA_AAAA,
    0xCCCC_CCCC_CCCC_CCCC,
    0xF0F0_F0F0_F0F0_F0F0,
    0xFF00_FF00_FF00_FF00,
    0xFFFF_0000_FFFF_0000,
    0xFFFF_FFFF_0000_0000,
];

#[derive(Clone, Eq, PartialEq, Hash)]
pub struct TruthTable {
    num_vars: u32,
    words: Vec<u64>,
}

impl TruthTable {
    /// Creates the constant-0 function over `num_vars` variables.
    pub fn new(num_vars: u32) -> Self {
        assert!(num_vars <= 24, "Truth tables are limited to 24 variables");
        let num_words = if num_vars <= 6 { 1 } else { 1 << (num_vars - 6) };
        Self {
            num_vars,
            words: vec![0; num_words],
        }
    }

    /// Creates the projection function of variable `var` over `num_vars` variables.
    pub fn nth_var(num_vars: u32, var: u32) -> Self {
        assert!(var < num_vars, "Variable {} out of range 0..{}", var, num_vars);
        let mut tt = Self::new(num_vars);
        if var < 6 {
            tt.words.fill(VAR_MASKS[var as usize]);
        } else {
            let stride = 1usize << (var - 6);
            for (i, word) in tt.words.iter_mut().enumerate() {
                if (i / stride) % 2 == 1 {
                    *word = u64::MAX;
                }
            }
        }
        tt.mask();
        tt
    }

    /// Creates a truth table over at most 6 variables from the low bits of `bits`.
    pub fn from_bits(num_vars: u32, bits: u64) -> Self {
        assert!(num_vars <= 6, "from_bits supports at most 6 variables");
        let mut tt = Self::new(num_vars);
        tt.words[0] = bits;
        tt.mask();
        tt
    }

    /// Parses a hexadecimal string (most significant digit first).
    ///
    /// Returns `None` if the string is not valid hex or has the wrong length.
    pub fn from_hex(num_vars: u32, hex: &str) -> Option<Self> {
        let mut tt = Self::new(num_vars);
        let num_digits = std::cmp::max(1, tt.num_bits() / 4);
        if hex.len() != num_digits {
            return None;
        }
        for (pos, c) in hex.chars().rev().enumerate() {
            let digit = c.to_digit(16)? as u64;
            tt.words[pos / 16] |= digit << ((pos % 16) * 4);
        }
        if tt.num_bits() < 4 && tt.words[0] >> tt.num_bits() != 0 {
            return None;
        }
        Some(tt)
    }

    /// Creates a truth table from its words, clearing unused high bits.
    ///
    /// # Panics
    ///
    /// Panics if the number of words does not match `num_vars`.
    pub fn from_words(num_vars: u32, words: Vec<u64>) -> Self {
        let mut tt = Self::new(num_vars);
        assert_eq!(words.len(), tt.words.len(), "Wrong number of words for {} variables", num_vars);
        tt.words = words;
        tt.mask();
        tt
    }

    pub fn constant(num_vars: u32, value: bool) -> Self {
        let tt = Self::new(num_vars);
        if value {
            !tt
        } else {
            tt
        }
    }

    /// Clears bits beyond `2^num_vars` in the single-word case.
    fn mask(&mut self) {
        if self.num_vars < 6 {
            self.words[0] &= (1u64 << self.num_bits()) - 1;
        }
    }
}

impl TruthTable {
    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    pub fn num_bits(&self) -> usize {
        1 << self.num_vars
    }

    pub fn words(&self) -> &[u64] {
        &self.words
    }

    pub fn bit(&self, index: usize) -> bool {
        assert!(index < self.num_bits(), "Bit {} out of range", index);
        (self.words[index / 64] >> (index % 64)) & 1 != 0
    }

    pub fn set_bit(&mut self, index: usize, value: bool) {
        assert!(index < self.num_bits(), "Bit {} out of range", index);
        let mask = 1u64 << (index % 64);
        if value {
            self.words[index / 64] |= mask;
        } else {
            self.words[index / 64] &= !mask;
        }
    }

    pub fn is_const0(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn is_const1(&self) -> bool {
        (!self.clone()).is_const0()
    }

    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Returns the lowest `2^num_vars` bits of a table over at most 6 variables.
    pub fn as_u64(&self) -> u64 {
        assert!(self.num_vars <= 6, "as_u64 supports at most 6 variables");
        self.words[0]
    }

    /// Checks if the function depends on variable `var`.
    pub fn has_var(&self, var: u32) -> bool {
        assert!(var < self.num_vars);
        let stride = 1usize << var;
        (0..self.num_bits())
            .filter(|i| i & stride == 0)
            .any(|i| self.bit(i) != self.bit(i | stride))
    }

    pub fn to_hex(&self) -> String {
        let num_digits = std::cmp::max(1, self.num_bits() / 4);
        (0..num_digits)
            .rev()
            .map(|pos| {
                let digit = (self.words[pos / 16] >> ((pos % 16) * 4)) & 0xF;
                std::char::from_digit(digit as u32, 16).unwrap_or('?')
            })
            .collect()
    }

    fn zip_with(&self, other: &Self, op: impl Fn(u64, u64) -> u64) -> Self {
        assert_eq!(
            self.num_vars, other.num_vars,
            "Truth tables have different number of variables"
        );
        let words = self
            .words
            .iter()
            .zip(&other.words)
            .map(|(&a, &b)| op(a, b))
            .collect();
        Self {
            num_vars: self.num_vars,
            words,
        }
    }
}

impl Not for TruthTable {
    type Output = Self;

    fn not(mut self) -> Self::Output {
        for w in self.words.iter_mut() {
            *w = !*w;
        }
        self.mask();
        self
    }
}

impl Not for &TruthTable {
    type Output = TruthTable;

    fn not(self) -> Self::Output {
        !self.clone()
    }
}

impl BitAnd for &TruthTable {
    type Output = TruthTable;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a & b)
    }
}

impl BitOr for &TruthTable {
    type Output = TruthTable;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a | b)
    }
}

impl BitXor for &TruthTable {
    type Output = TruthTable;

    fn bitxor(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a ^ b)
    }
}

impl Display for TruthTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl Debug for TruthTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "TruthTable({}, {})", self.num_vars, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nth_var() {
        let a = TruthTable::nth_var(2, 0);
        let b = TruthTable::nth_var(2, 1);
        assert_eq!(a.as_u64(), 0b1010);
        assert_eq!(b.as_u64(), 0b1100);
        assert_eq!((&a & &b).as_u64(), 0b1000);
        assert_eq!((&a | &b).as_u64(), 0b1110);
        assert_eq!((&a ^ &b).as_u64(), 0b0110);
        assert_eq!((!a).as_u64(), 0b0101);
    }

    #[test]
    fn test_large_var() {
        let x7 = TruthTable::nth_var(8, 7);
        assert_eq!(x7.words(), &[0, 0, u64::MAX, u64::MAX]);
        let x6 = TruthTable::nth_var(8, 6);
        assert_eq!(x6.words(), &[0, u64::MAX, 0, u64::MAX]);
        assert_eq!(x7.count_ones(), 128);
        assert!(x7.bit(200));
        assert!(!x7.bit(100));
    }

    #[test]
    fn test_constants() {
        let zero = TruthTable::constant(3, false);
        let one = TruthTable::constant(3, true);
        assert!(zero.is_const0());
        assert!(one.is_const1());
        assert_eq!(one.as_u64(), 0xFF);
        assert_eq!(TruthTable::constant(0, true).as_u64(), 1);
    }

    #[test]
    fn test_hex() {
        let maj = TruthTable::from_hex(3, "e8").unwrap();
        assert_eq!(maj.as_u64(), 0xE8);
        assert_eq!(maj.to_hex(), "e8");
        assert_eq!(maj.to_string(), "0xe8");

        let and = TruthTable::from_hex(2, "8").unwrap();
        assert_eq!(and.as_u64(), 0b1000);

        assert!(TruthTable::from_hex(2, "88").is_none());
        assert!(TruthTable::from_hex(1, "4").is_none());
        assert!(TruthTable::from_hex(2, "g").is_none());
    }

    #[test]
    fn test_bits() {
        let mut tt = TruthTable::new(2);
        tt.set_bit(3, true);
        assert!(tt.bit(3));
        assert_eq!(tt, TruthTable::from_bits(2, 0b1000));
        tt.set_bit(3, false);
        assert!(tt.is_const0());
    }

    #[test]
    fn test_has_var() {
        let a = TruthTable::nth_var(3, 0);
        let c = TruthTable::nth_var(3, 2);
        let f = &a & &c;
        assert!(f.has_var(0));
        assert!(!f.has_var(1));
        assert!(f.has_var(2));
    }
}
