#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Conjunctive normal form formulas.

use crate::sat::assignment::Solutions;
use crate::sat::clause::Clause;
use crate::sat::literal::{Literal, Variable};
use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};

/// Depth of the decision stack; level `0` holds the facts.
pub type DecisionLevel = usize;

/// A CNF formula: a conjunction of clauses over variables `1..=num_vars`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    /// The clauses, in insertion order.
    pub clauses: Vec<Clause>,
    /// Highest variable in use.
    pub num_vars: usize,
}

impl Cnf {
    /// Builds a formula from DIMACS-style integer clauses.
    pub fn new<I, C>(clauses: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = i32>,
    {
        let mut cnf = Self::default();
        for clause in clauses {
            cnf.add_clause(clause.into_iter().map(Literal::from_i32).collect());
        }
        cnf
    }

    /// Allocates a fresh variable.
    pub fn new_var(&mut self) -> Variable {
        self.num_vars += 1;
        #[allow(clippy::cast_possible_truncation)]
        let var = self.num_vars as Variable;
        var
    }

    /// Appends `clause`, growing `num_vars` to cover its variables.
    pub fn add_clause(&mut self, clause: Clause) {
        if let Some(max) = clause.iter().map(|lit| lit.variable() as usize).max() {
            self.num_vars = self.num_vars.max(max);
        }
        self.clauses.push(clause);
    }

    /// Number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// `true` if the formula has no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Iterates over the clauses.
    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// Total number of literal occurrences.
    #[must_use]
    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(Clause::len).sum()
    }

    /// Checks that every clause has a literal made true by `solutions`.
    #[must_use]
    pub fn verify(&self, solutions: &Solutions) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.iter().any(|&lit| solutions.check(lit)))
    }
}

impl Index<usize> for Cnf {
    type Output = Clause;

    fn index(&self, index: usize) -> &Self::Output {
        &self.clauses[index]
    }
}

impl IndexMut<usize> for Cnf {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.clauses[index]
    }
}

/// Renders the formula in DIMACS format.
impl Display for Cnf {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            for lit in clause.iter() {
                write!(f, "{lit} ")?;
            }
            writeln!(f, "0")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_vars_tracks_largest_variable() {
        let mut cnf = Cnf::new(vec![vec![1, -4], vec![2]]);
        assert_eq!(cnf.num_vars, 4);
        assert_eq!(cnf.new_var(), 5);
        assert_eq!(cnf.num_literals(), 3);
    }

    #[test]
    fn test_dimacs_output() {
        let cnf = Cnf::new(vec![vec![1, -2], vec![2]]);
        assert_eq!(cnf.to_string(), "p cnf 2 2\n1 -2 0\n2 0\n");
    }
}
