#![warn(missing_docs)]
//! Skyscraper puzzles solved through a SAT encoding.
//!
//! A puzzle is turned into integer and boolean constraints over one variable
//! per cell, those constraints are lowered to CNF, and a CDCL engine decides
//! the result. The grid is read back from the model.

/// The `sat` module implements the CDCL engine that decides CNF formulas.
pub mod sat;

/// The `smt` module provides the integer and boolean term language, the solver
/// adapter seam and a finite-domain backend that lowers terms to CNF.
pub mod smt;

/// The `skyscraper` module models puzzles, builds their constraints and decodes
/// solved grids.
pub mod skyscraper;
