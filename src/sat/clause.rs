#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Clause storage.

use crate::sat::literal::Literal;
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};

/// A disjunction of literals.
///
/// Short clauses dominate the puzzle encodings (binary at-most-one clauses,
/// ternary Tseitin clauses), so the literals live inline up to eight entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Clause {
    literals: SmallVec<[Literal; 8]>,
    learnt: bool,
}

impl Clause {
    /// Creates an original (problem) clause.
    #[must_use]
    pub fn new(literals: impl IntoIterator<Item = Literal>) -> Self {
        Self {
            literals: literals.into_iter().collect(),
            learnt: false,
        }
    }

    /// Creates a clause derived by conflict analysis.
    #[must_use]
    pub fn learnt(literals: impl IntoIterator<Item = Literal>) -> Self {
        Self {
            literals: literals.into_iter().collect(),
            learnt: true,
        }
    }

    /// `true` for clauses derived by conflict analysis.
    #[must_use]
    pub const fn is_learnt(&self) -> bool {
        self.learnt
    }

    /// Number of literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// `true` for the empty (unsatisfiable) clause.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// `true` for a single-literal clause.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    /// `true` if the clause contains both a literal and its negation.
    #[must_use]
    pub fn is_tautology(&self) -> bool {
        self.literals
            .iter()
            .any(|&lit| self.literals.contains(&lit.negated()))
    }

    /// Iterates over the literals in their current order.
    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    /// Swaps two literal positions, used to move watched literals to the front.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.literals.swap(a, b);
    }

    /// Sorts the literals and removes repeated ones.
    pub fn normalise(&mut self) {
        self.literals.sort_unstable();
        self.literals.dedup();
    }

    /// Drops every literal for which `keep` returns `false`.
    pub fn retain(&mut self, mut keep: impl FnMut(Literal) -> bool) {
        self.literals.retain(|lit| keep(*lit));
    }
}

impl Index<usize> for Clause {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl IndexMut<usize> for Clause {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.literals[index]
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<T: IntoIterator<Item = Literal>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<i32>> for Clause {
    fn from(literals: Vec<i32>) -> Self {
        literals.into_iter().map(Literal::from_i32).collect()
    }
}

impl<const N: usize> From<[Literal; N]> for Clause {
    fn from(literals: [Literal; N]) -> Self {
        Self::new(literals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tautology() {
        assert!(Clause::from(vec![1, -1, 2]).is_tautology());
        assert!(!Clause::from(vec![1, 2, -3]).is_tautology());
    }

    #[test]
    fn test_normalise_removes_duplicates() {
        let mut clause = Clause::from(vec![3, 1, 3, -2, 1]);
        clause.normalise();
        assert_eq!(clause.len(), 3);
        assert!(!clause.is_learnt());
    }
}
