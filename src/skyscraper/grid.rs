#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Concrete solved grids and their verification against a puzzle.

use crate::skyscraper::puzzle::{Direction, Puzzle};
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Number of elements of `line` strictly taller than everything before them.
#[must_use]
pub fn visible_count(line: &[usize]) -> usize {
    line.iter()
        .scan(None, |max: &mut Option<usize>, &height| {
            let visible = max.is_none_or(|m| height > m);
            if visible {
                *max = Some(height);
            }
            Some(visible)
        })
        .filter(|&visible| visible)
        .count()
}

/// The first way in which a grid fails to solve a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// The grid is not square of the puzzle's size.
    #[error("grid is not {expected}x{expected}")]
    WrongShape {
        /// Size of the puzzle.
        expected: usize,
    },
    /// A cell holds a height outside `1..=size`.
    #[error("cell ({row}, {col}) holds {value}, outside 1..={size}")]
    OutOfRange {
        /// Row of the cell.
        row: usize,
        /// Column of the cell.
        col: usize,
        /// Height found.
        value: usize,
        /// Size of the grid.
        size: usize,
    },
    /// A row holds the same height twice.
    #[error("row {row} repeats {value}")]
    RowRepeat {
        /// The row.
        row: usize,
        /// The repeated height.
        value: usize,
    },
    /// A column holds the same height twice.
    #[error("column {col} repeats {value}")]
    ColumnRepeat {
        /// The column.
        col: usize,
        /// The repeated height.
        value: usize,
    },
    /// A fixed cell holds another height.
    #[error("cell ({row}, {col}) should be {expected}, found {found}")]
    CellMismatch {
        /// Row of the cell.
        row: usize,
        /// Column of the cell.
        col: usize,
        /// Height fixed by the puzzle.
        expected: usize,
        /// Height in the grid.
        found: usize,
    },
    /// A line shows another number of buildings than its clue.
    #[error("{direction} clue {index} wants {expected} visible, found {found}")]
    ClueMismatch {
        /// Edge of the clue.
        direction: Direction,
        /// Line of the clue.
        index: usize,
        /// Count given by the clue.
        expected: usize,
        /// Count seen in the grid.
        found: usize,
    },
}

/// A solved grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid(Vec<Vec<usize>>);

impl Grid {
    /// Wraps row-major heights.
    #[must_use]
    pub const fn new(rows: Vec<Vec<usize>>) -> Self {
        Self(rows)
    }

    /// Number of rows.
    #[must_use]
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// The value at a 1-based position.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<usize> {
        self.0.get(row.checked_sub(1)?)?.get(col.checked_sub(1)?).copied()
    }

    /// Iterates over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &[usize]> {
        self.0.iter().map(Vec::as_slice)
    }

    /// Line `index` (1-based) in viewing order from `direction`.
    #[must_use]
    pub fn line(&self, direction: Direction, index: usize) -> Vec<usize> {
        let n = self.size();
        (1..=n)
            .filter_map(|k| match direction {
                Direction::Top => self.get(k, index),
                Direction::Bottom => self.get(n + 1 - k, index),
                Direction::Left => self.get(index, k),
                Direction::Right => self.get(index, n + 1 - k),
            })
            .collect()
    }

    /// Checks that every row and column is a permutation of `1..=N` and that
    /// every fixed cell and edge clue of `puzzle` holds.
    ///
    /// # Errors
    ///
    /// The first [`Violation`] found.
    pub fn check(&self, puzzle: &Puzzle) -> Result<(), Violation> {
        let n = puzzle.size();
        if self.size() != n || self.0.iter().any(|row| row.len() != n) {
            return Err(Violation::WrongShape { expected: n });
        }

        for (row, col) in (1..=n).cartesian_product(1..=n) {
            let value = self.get(row, col).unwrap_or_default();
            if !(1..=n).contains(&value) {
                return Err(Violation::OutOfRange {
                    row,
                    col,
                    value,
                    size: n,
                });
            }
        }

        for index in 1..=n {
            if let Some(value) = self.line(Direction::Left, index).into_iter().duplicates().next() {
                return Err(Violation::RowRepeat { row: index, value });
            }
            if let Some(value) = self.line(Direction::Top, index).into_iter().duplicates().next() {
                return Err(Violation::ColumnRepeat { col: index, value });
            }
        }

        for cell in puzzle.cells() {
            let found = self.get(cell.row, cell.col).unwrap_or_default();
            if found != cell.value {
                return Err(Violation::CellMismatch {
                    row: cell.row,
                    col: cell.col,
                    expected: cell.value,
                    found,
                });
            }
        }

        for direction in Direction::ALL {
            for &(index, expected) in puzzle.clues(direction) {
                let found = visible_count(&self.line(direction, index));
                if found != expected {
                    return Err(Violation::ClueMismatch {
                        direction,
                        index,
                        expected,
                        found,
                    });
                }
            }
        }

        Ok(())
    }
}

impl From<Vec<Vec<usize>>> for Grid {
    fn from(rows: Vec<Vec<usize>>) -> Self {
        Self::new(rows)
    }
}

impl From<Grid> for Vec<Vec<usize>> {
    fn from(grid: Grid) -> Self {
        grid.0
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in &self.0 {
            writeln!(f, "{}", row.iter().join(" "))?;
        }
        Ok(())
    }
}
