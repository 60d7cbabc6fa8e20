#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The interface shared by SAT solver implementations.

use crate::sat::cnf::Cnf;
use std::fmt::{Display, Formatter};

pub use crate::sat::assignment::Solutions;

/// Outcome of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult {
    /// A model satisfying every clause.
    Sat(Solutions),
    /// The formula has no model.
    Unsat,
    /// The conflict budget ran out before the search concluded.
    Unknown,
}

impl SolveResult {
    /// The model of a [`SolveResult::Sat`] result.
    #[must_use]
    pub const fn solutions(&self) -> Option<&Solutions> {
        match self {
            Self::Sat(solutions) => Some(solutions),
            Self::Unsat | Self::Unknown => None,
        }
    }
}

impl Display for SolveResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sat(_) => write!(f, "SATISFIABLE"),
            Self::Unsat => write!(f, "UNSATISFIABLE"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Search knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Give up with [`SolveResult::Unknown`] once this many conflicts have occurred.
    pub max_conflicts: Option<u64>,
    /// Conflicts per Luby unit.
    pub restart_unit: u64,
    /// VSIDS decay factor.
    pub var_decay: f64,
    /// Probability of a random decision instead of the most active variable.
    pub random_var_freq: f64,
    /// Seed of the random decisions.
    pub seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_conflicts: None,
            restart_unit: 100,
            var_decay: 0.95,
            random_var_freq: 0.01,
            seed: 91_648_253,
        }
    }
}

/// Counters collected during a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolutionStats {
    /// Conflicts encountered.
    pub conflicts: u64,
    /// Decisions made.
    pub decisions: u64,
    /// Literals propagated.
    pub propagations: u64,
    /// Restarts performed.
    pub restarts: u64,
    /// Clauses learnt from conflicts, units excluded.
    pub learnt_clauses: u64,
}

/// A SAT solver over a fixed CNF formula.
pub trait Solver {
    /// Creates a solver for `cnf` with the default configuration.
    fn new(cnf: Cnf) -> Self;
    /// Searches for a model.
    fn solve(&mut self) -> SolveResult;
    /// Counters of the search so far.
    fn stats(&self) -> SolutionStats;
}
