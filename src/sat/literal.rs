#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Boolean literals.
//!
//! A literal packs a variable and its polarity into one `u32` (`var * 2` for
//! the positive literal, `var * 2 + 1` for the negative one), so that the
//! negation is a single bit flip and literals can index watch lists directly.

use core::ops::Not;
use std::fmt::{Display, Formatter};

/// Variables are numbered from `1`, as in DIMACS. Variable `0` is never used.
pub type Variable = u32;

/// A variable together with a polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Literal(u32);

impl Literal {
    /// Creates the literal of `var` with the given polarity (`true` = positive).
    #[must_use]
    pub const fn new(var: Variable, polarity: bool) -> Self {
        if polarity {
            Self(var * 2)
        } else {
            Self(var * 2 + 1)
        }
    }

    /// The variable of this literal.
    #[must_use]
    pub const fn variable(self) -> Variable {
        self.0 / 2
    }

    /// `true` for a positive literal.
    #[must_use]
    pub const fn polarity(self) -> bool {
        self.0 % 2 == 0
    }

    /// The complementary literal.
    #[must_use]
    pub const fn negated(self) -> Self {
        Self(self.0 ^ 1)
    }

    /// Dense index of this literal, suitable for per-literal tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Converts a DIMACS integer (`3`, `-3`) into a literal.
    #[must_use]
    pub const fn from_i32(value: i32) -> Self {
        Self::new(value.unsigned_abs(), value.is_positive())
    }

    /// Converts back into the DIMACS integer form.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn to_i32(self) -> i32 {
        let var = self.variable() as i32;
        if self.polarity() {
            var
        } else {
            -var
        }
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_neg() {
        assert_eq!(Literal::new(1, false).negated(), Literal::new(1, true));
        assert_eq!(!Literal::new(1, true), Literal::new(1, false));
        assert_eq!(!!Literal::new(7, true), Literal::new(7, true));
    }

    #[test]
    fn test_dimacs_conversion() {
        let lit = Literal::from_i32(-12);
        assert_eq!(lit.variable(), 12);
        assert!(!lit.polarity());
        assert_eq!(lit.to_i32(), -12);
        assert_eq!(Literal::from_i32(5).to_string(), "5");
    }

    #[test]
    fn test_complements_share_adjacent_indices() {
        let pos = Literal::new(4, true);
        assert_eq!(pos.index() + 1, pos.negated().index());
    }
}
