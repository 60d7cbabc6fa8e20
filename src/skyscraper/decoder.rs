#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Turns a solver verdict into a grid.

use crate::skyscraper::builder::GridVars;
use crate::skyscraper::grid::Grid;
use crate::smt::solver::{Model, SatResult, SolverAdapter};
use thiserror::Error;

/// Outcome of a check, with the model when there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// A model was found.
    Satisfiable(Model),
    /// No model exists.
    Unsatisfiable,
    /// The solver gave up.
    Unknown,
}

impl Verdict {
    /// Runs `solver.check()` and captures the result.
    pub fn from_solver(solver: &mut impl SolverAdapter) -> Self {
        match solver.check() {
            SatResult::Sat => Self::Satisfiable(solver.model().cloned().unwrap_or_default()),
            SatResult::Unsat => Self::Unsatisfiable,
            SatResult::Unknown => Self::Unknown,
        }
    }
}

/// Why no grid could be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The clues admit no grid.
    #[error("no solution exists")]
    NoSolution,
    /// The solver gave up; a solution may still exist.
    #[error("solver could not decide the puzzle")]
    Undetermined,
    /// The model leaves a cell without a value.
    #[error("model has no value for cell ({row}, {col})")]
    IncompleteModel {
        /// Row of the cell.
        row: usize,
        /// Column of the cell.
        col: usize,
    },
    /// The model gives a cell a negative value.
    #[error("model assigns {value} to cell ({row}, {col})")]
    InvalidValue {
        /// Row of the cell.
        row: usize,
        /// Column of the cell.
        col: usize,
        /// The value assigned.
        value: i32,
    },
}

/// Reads every cell of `grid` out of a satisfiable verdict.
///
/// # Errors
///
/// [`SolveError::NoSolution`] and [`SolveError::Undetermined`] for the two
/// failing verdicts, or a model error if a cell is missing or negative.
pub fn decode(grid: &GridVars, verdict: Verdict) -> Result<Grid, SolveError> {
    let model = match verdict {
        Verdict::Satisfiable(model) => model,
        Verdict::Unsatisfiable => return Err(SolveError::NoSolution),
        Verdict::Unknown => return Err(SolveError::Undetermined),
    };

    let n = grid.size();
    let mut rows = Vec::with_capacity(n);
    for row in 1..=n {
        let mut values = Vec::with_capacity(n);
        for col in 1..=n {
            let value = grid
                .cell(row, col)
                .and_then(|var| model.get(var))
                .ok_or(SolveError::IncompleteModel { row, col })?;
            let value = usize::try_from(value)
                .map_err(|_| SolveError::InvalidValue { row, col, value })?;
            values.push(value);
        }
        rows.push(values);
    }

    Ok(Grid::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smt::term::Context;

    fn grid_vars(size: usize) -> GridVars {
        GridVars::new(&mut Context::new(), size)
    }

    #[test]
    fn test_round_trip() {
        let vars = grid_vars(3);
        let rows = vec![vec![1, 2, 3], vec![3, 1, 2], vec![2, 3, 1]];

        let mut model = Model::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                let var = vars.cell(r + 1, c + 1).unwrap();
                model.insert(var, i32::try_from(value).unwrap());
            }
        }

        let grid = decode(&vars, Verdict::Satisfiable(model)).unwrap();
        assert_eq!(grid, Grid::new(rows));
    }

    #[test]
    fn test_failures_stay_distinct() {
        let vars = grid_vars(2);
        assert_eq!(decode(&vars, Verdict::Unsatisfiable), Err(SolveError::NoSolution));
        assert_eq!(decode(&vars, Verdict::Unknown), Err(SolveError::Undetermined));
    }

    #[test]
    fn test_incomplete_model() {
        let vars = grid_vars(2);
        let mut model = Model::new();
        model.insert(vars.cell(1, 1).unwrap(), 1);
        assert_eq!(
            decode(&vars, Verdict::Satisfiable(model)),
            Err(SolveError::IncompleteModel { row: 1, col: 2 })
        );
    }

    #[test]
    fn test_negative_value() {
        let vars = grid_vars(1);
        let mut model = Model::new();
        model.insert(vars.cell(1, 1).unwrap(), -3);
        assert_eq!(
            decode(&vars, Verdict::Satisfiable(model)),
            Err(SolveError::InvalidValue {
                row: 1,
                col: 1,
                value: -3
            })
        );
    }
}
