#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Finite-domain formulas over integers, and a solver for them built on the
//! CDCL engine in [`crate::sat`].

/// The CDCL-backed [`solver::SolverAdapter`].
pub mod backend;
/// Lowering of formulas to CNF.
pub mod encoder;
/// The solver adapter seam, verdicts and models.
pub mod solver;
/// Integer terms and boolean formulas.
pub mod term;
