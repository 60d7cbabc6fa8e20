#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Variable assignments and the models extracted from them.

use crate::sat::literal::{Literal, Variable};
use bit_vec::BitVec;
use std::ops::{Index, IndexMut};

/// The value of one variable during search.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Hash, PartialOrd, Ord)]
pub enum VarState {
    /// Not yet assigned.
    #[default]
    Unassigned,
    /// Assigned the given truth value.
    Assigned(bool),
}

impl VarState {
    /// `true` once the variable has a value.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        matches!(self, Self::Assigned(_))
    }

    /// `true` while the variable has no value.
    #[must_use]
    pub const fn is_unassigned(self) -> bool {
        !self.is_assigned()
    }
}

/// The partial assignment maintained during search, indexed by variable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment(Vec<VarState>);

impl Index<usize> for Assignment {
    type Output = VarState;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for Assignment {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl Assignment {
    /// An assignment over variables `1..=num_vars`, all unassigned.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self(vec![VarState::Unassigned; num_vars + 1])
    }

    /// Makes `lit` true.
    pub fn assign(&mut self, lit: Literal) {
        self.0[lit.variable() as usize] = VarState::Assigned(lit.polarity());
    }

    /// Clears the value of `var`.
    pub fn unassign(&mut self, var: Variable) {
        self.0[var as usize] = VarState::Unassigned;
    }

    /// The value of `var`, or `None` while it is unassigned.
    #[must_use]
    pub fn var_value(&self, var: Variable) -> Option<bool> {
        match self.0.get(var as usize) {
            Some(VarState::Assigned(b)) => Some(*b),
            _ => None,
        }
    }

    /// Truth value of `lit`, or `None` while its variable is unassigned.
    #[must_use]
    pub fn literal_value(&self, lit: Literal) -> Option<bool> {
        self.var_value(lit.variable())
            .map(|value| value == lit.polarity())
    }

    /// `true` while `var` has no value.
    #[must_use]
    pub fn is_unassigned(&self, var: Variable) -> bool {
        self.0[var as usize].is_unassigned()
    }

    /// Snapshot of the current values. Unassigned variables read as `false`.
    #[must_use]
    pub fn get_solutions(&self) -> Solutions {
        Solutions(self.0.iter().map(|state| *state == VarState::Assigned(true)).collect())
    }
}

/// A total model: one truth value per variable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Solutions(BitVec);

impl Solutions {
    /// Builds a model from the DIMACS literals that are true.
    #[must_use]
    pub fn new(true_literals: &[i32]) -> Self {
        let len = true_literals
            .iter()
            .map(|lit| lit.unsigned_abs() as usize)
            .max()
            .unwrap_or(0);
        let mut bits = BitVec::from_elem(len + 1, false);
        for lit in true_literals.iter().filter(|lit| lit.is_positive()) {
            bits.set(lit.unsigned_abs() as usize, true);
        }
        Self(bits)
    }

    /// The value of `var`. Variables beyond the model read as `false`.
    #[must_use]
    pub fn value(&self, var: Variable) -> bool {
        self.0.get(var as usize).unwrap_or(false)
    }

    /// `true` if `lit` holds in this model.
    #[must_use]
    pub fn check(&self, lit: Literal) -> bool {
        self.value(lit.variable()) == lit.polarity()
    }

    /// Number of variables covered by the model.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.0.len().saturating_sub(1)
    }
}
