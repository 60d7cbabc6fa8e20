#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Skyscraper puzzles: an N x N grid whose rows and columns are permutations
//! of `1..=N`, with edge clues counting the buildings visible from that edge.

/// Constraint construction.
pub mod builder;
/// Built-in puzzles.
pub mod catalog;
/// Reading grids back from models.
pub mod decoder;
/// Solved grids and their verification.
pub mod grid;
/// The puzzle file format.
pub mod parser;
/// Puzzle data.
pub mod puzzle;
/// Visibility formulas.
pub mod visibility;

pub use builder::{build, Constraints, Encoding, GridVars};
pub use decoder::{decode, SolveError, Verdict};
pub use grid::{visible_count, Grid, Violation};
pub use puzzle::{Cell, Direction, Puzzle, PuzzleError};

use crate::smt::solver::SolverAdapter;
use log::info;

/// Builds the constraints of `puzzle`, decides them with `solver` and decodes the grid.
///
/// # Errors
///
/// See [`decode`].
pub fn solve(
    puzzle: &Puzzle,
    encoding: Encoding,
    solver: &mut impl SolverAdapter,
) -> Result<Grid, SolveError> {
    let constraints = build(puzzle, encoding);
    constraints.post(solver);
    let verdict = Verdict::from_solver(solver);
    info!(
        "{}x{} puzzle, {} encoding: {}",
        puzzle.size(),
        puzzle.size(),
        constraints.encoding(),
        match &verdict {
            Verdict::Satisfiable(_) => "sat",
            Verdict::Unsatisfiable => "unsat",
            Verdict::Unknown => "unknown",
        }
    );
    decode(constraints.grid(), verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smt::backend::FiniteDomainSolver;
    use crate::smt::solver::{Model, SatResult};
    use crate::smt::term::BoolExpr;

    fn solve_with(puzzle: &Puzzle, encoding: Encoding) -> Result<Grid, SolveError> {
        solve(puzzle, encoding, &mut FiniteDomainSolver::new())
    }

    #[test]
    fn test_five_by_five_scenario() {
        let puzzle = Puzzle::empty(5)
            .with_cell(2, 2, 1)
            .with_clue(Direction::Top, 1, 2)
            .with_clue(Direction::Left, 3, 2)
            .with_clue(Direction::Bottom, 3, 1)
            .with_clue(Direction::Bottom, 4, 3)
            .with_clue(Direction::Right, 3, 2)
            .with_clue(Direction::Right, 4, 2)
            .with_clue(Direction::Right, 5, 3);

        for encoding in [Encoding::Arithmetic, Encoding::Boolean] {
            let grid = solve_with(&puzzle, encoding).unwrap();
            assert_eq!(grid.size(), 5);
            assert_eq!(grid.check(&puzzle), Ok(()), "{encoding} encoding");
            assert_eq!(grid.get(2, 2), Some(1));
        }
    }

    #[test]
    fn test_catalog_instances_solve() {
        for size in [5, 7] {
            let puzzle = catalog::instance(size).unwrap();
            for encoding in [Encoding::Arithmetic, Encoding::Boolean, Encoding::Auto] {
                let grid = solve_with(&puzzle, encoding).unwrap();
                assert_eq!(grid.check(&puzzle), Ok(()), "size {size}, {encoding} encoding");
            }
        }
    }

    #[test]
    fn test_clue_beyond_line_length_is_unsat() {
        for size in 1..=4 {
            for direction in Direction::ALL {
                let puzzle = Puzzle::empty(size).with_clue(direction, 1, size + 1);
                for encoding in [Encoding::Arithmetic, Encoding::Boolean] {
                    assert_eq!(
                        solve_with(&puzzle, encoding),
                        Err(SolveError::NoSolution),
                        "size {size}, {direction}, {encoding}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_empty_puzzle_is_sat() {
        for size in 1..=5 {
            let puzzle = Puzzle::empty(size);
            let grid = solve_with(&puzzle, Encoding::Boolean).unwrap();
            assert_eq!(grid.check(&puzzle), Ok(()));
        }
    }

    #[test]
    fn test_contradictory_cells_are_unsat() {
        let puzzle = Puzzle::empty(3).with_cell(1, 1, 2).with_cell(1, 3, 2);
        assert_eq!(
            solve_with(&puzzle, Encoding::Boolean),
            Err(SolveError::NoSolution)
        );
    }

    /// A backend that accepts everything and never reaches a verdict.
    #[derive(Default)]
    struct GiveUp(usize);

    impl SolverAdapter for GiveUp {
        fn add(&mut self, _: BoolExpr) {
            self.0 += 1;
        }

        fn check(&mut self) -> SatResult {
            SatResult::Unknown
        }

        fn model(&self) -> Option<&Model> {
            None
        }
    }

    #[test]
    fn test_unknown_verdict_is_undetermined() {
        let puzzle = catalog::instance(5).unwrap();
        let mut solver = GiveUp::default();
        assert_eq!(
            solve(&puzzle, Encoding::Boolean, &mut solver),
            Err(SolveError::Undetermined)
        );
        assert_eq!(solver.0, build(&puzzle, Encoding::Boolean).assertions().len());
    }
}
