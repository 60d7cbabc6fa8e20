#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A CDCL SAT solver over CNF formulas.

/// Partial assignments and models.
pub mod assignment;
/// The CDCL search.
pub mod cdcl;
/// Clauses.
pub mod clause;
/// CNF formulas and DIMACS output.
pub mod cnf;
/// Packed literals.
pub mod literal;
/// Decision polarities.
pub mod phase_saving;
/// Restart schedule.
pub mod restarter;
/// The solver interface, results and statistics.
pub mod solver;
/// The assignment trail.
pub mod trail;
/// The decision heuristic.
pub mod variable_selection;
