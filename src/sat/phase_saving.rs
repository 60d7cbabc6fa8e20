#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Phase saving: a variable is re-decided with the polarity it last had.

use crate::sat::literal::{Literal, Variable};
use bit_vec::BitVec;

/// The polarity each variable should be decided with next.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SavedPhases(BitVec);

impl SavedPhases {
    /// All phases start negative, which suits one-hot encodings where most
    /// indicator variables end up false.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self(BitVec::from_elem(num_vars + 1, false))
    }

    /// Records the polarity of `lit` as its variable is unassigned.
    pub fn save(&mut self, lit: Literal) {
        self.0.set(lit.variable() as usize, lit.polarity());
    }

    /// The decision literal for `var` under its saved polarity.
    #[must_use]
    pub fn get_next(&self, var: Variable) -> Literal {
        Literal::new(var, self.0.get(var as usize).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_phase_is_reused() {
        let mut phases = SavedPhases::new(3);
        assert_eq!(phases.get_next(2), Literal::new(2, false));
        phases.save(Literal::new(2, true));
        assert_eq!(phases.get_next(2), Literal::new(2, true));
    }
}
