#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The assignment trail.
//!
//! Literals are recorded in the order they were assigned together with the
//! decision level and the reason for the assignment. Conflict analysis walks
//! it backwards; backjumping truncates it.

use crate::sat::cnf::DecisionLevel;
use crate::sat::literal::{Literal, Variable};
use std::ops::Index;

/// Why a literal was assigned.
#[derive(Debug, Clone, PartialEq, Eq, Default, Copy, Hash, PartialOrd, Ord)]
pub enum Reason {
    /// Chosen by the decision heuristic.
    #[default]
    Decision,
    /// A fact at decision level zero.
    Unit,
    /// Implied by the clause at this index, which holds the literal in position `0`.
    Clause(usize),
}

/// Assigned literals in assignment order, with levels and reasons.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trail {
    lits: Vec<Literal>,
    /// Start index in `lits` of every decision level above zero.
    limits: Vec<usize>,
    /// Next literal to propagate.
    pub curr_idx: usize,
    level: Vec<DecisionLevel>,
    reason: Vec<Reason>,
}

impl Index<usize> for Trail {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.lits[index]
    }
}

impl Trail {
    /// An empty trail for variables `1..=num_vars`.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            lits: Vec::with_capacity(num_vars),
            limits: Vec::new(),
            curr_idx: 0,
            level: vec![0; num_vars + 1],
            reason: vec![Reason::Decision; num_vars + 1],
        }
    }

    /// Number of assigned literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// `true` if nothing is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// The current decision level.
    #[must_use]
    pub fn decision_level(&self) -> DecisionLevel {
        self.limits.len()
    }

    /// Opens a new decision level.
    pub fn new_decision_level(&mut self) {
        self.limits.push(self.lits.len());
    }

    /// Records `lit` at the current level.
    pub fn push(&mut self, lit: Literal, reason: Reason) {
        let var = lit.variable() as usize;
        self.level[var] = self.decision_level();
        self.reason[var] = reason;
        self.lits.push(lit);
    }

    /// The level `var` was assigned at.
    #[must_use]
    pub fn level(&self, var: Variable) -> DecisionLevel {
        self.level[var as usize]
    }

    /// The reason `var` was assigned.
    #[must_use]
    pub fn reason(&self, var: Variable) -> Reason {
        self.reason[var as usize]
    }

    /// Removes every literal above `level` and returns them, most recent last.
    pub fn backstep_to(&mut self, level: DecisionLevel) -> Vec<Literal> {
        if self.decision_level() <= level {
            return Vec::new();
        }

        let start = self.limits[level];
        self.limits.truncate(level);
        self.curr_idx = self.curr_idx.min(start);
        self.lits.split_off(start)
    }
}
