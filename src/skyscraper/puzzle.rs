#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Clue data for one skyscraper instance.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// The grid edge a clue is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Looks down a column, from row 1.
    Top,
    /// Looks along a row, from column 1.
    Left,
    /// Looks up a column, from row N.
    Bottom,
    /// Looks along a row, from column N.
    Right,
}

impl Direction {
    /// Every direction, in the order clue tables list them.
    pub const ALL: [Self; 4] = [Self::Top, Self::Left, Self::Bottom, Self::Right];

    /// Lower-case name, as used in puzzle files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Left => "left",
            Self::Bottom => "bottom",
            Self::Right => "right",
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown direction `{s}`"))
    }
}

/// A pre-filled grid entry. Rows, columns and values are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    /// Row, `1..=N`.
    pub row: usize,
    /// Column, `1..=N`.
    pub col: usize,
    /// Building height, `1..=N`.
    pub value: usize,
}

/// Malformed puzzle data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    /// The grid has no cells.
    #[error("puzzle size must be at least 1")]
    ZeroSize,
    /// A fixed cell has a position or value outside `1..=size`.
    #[error("cell ({row}, {col}) = {value} lies outside a {size}x{size} grid")]
    CellOutOfRange {
        /// Row of the cell.
        row: usize,
        /// Column of the cell.
        col: usize,
        /// Value fixed in the cell.
        value: usize,
        /// Size of the grid.
        size: usize,
    },
    /// A clue names a line or a count outside `1..=size`.
    #[error("{direction} clue {index} = {count} lies outside a {size}x{size} grid")]
    ClueOutOfRange {
        /// Edge of the clue.
        direction: Direction,
        /// Line of the clue.
        index: usize,
        /// Visible count of the clue.
        count: usize,
        /// Size of the grid.
        size: usize,
    },
    /// The same cell is fixed twice with different values.
    #[error("cell ({row}, {col}) is fixed to two different values")]
    ConflictingCell {
        /// Row of the cell.
        row: usize,
        /// Column of the cell.
        col: usize,
    },
    /// The same clue is given twice with different counts.
    #[error("{direction} clue {index} is given two different counts")]
    ConflictingClue {
        /// Edge of the clue.
        direction: Direction,
        /// Line of the clue.
        index: usize,
    },
    /// The catalog has no puzzle of this size.
    #[error("no built-in puzzle of size {0}")]
    NoSuchInstance(usize),
}

/// Size, fixed cells and per-edge visibility clues of a puzzle.
///
/// Clue lists are sparse: a line without a clue is unconstrained. Entries
/// are kept in insertion order and are not checked on insertion; call
/// [`Puzzle::validate`] before trusting data from outside the program.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Puzzle {
    size: usize,
    cells: Vec<Cell>,
    clues: [Vec<(usize, usize)>; 4],
}

impl Puzzle {
    /// A puzzle of the given size with no clues at all.
    #[must_use]
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Fixes cell `(row, col)` to `value`, builder style.
    #[must_use]
    pub fn with_cell(mut self, row: usize, col: usize, value: usize) -> Self {
        self.add_cell(row, col, value);
        self
    }

    /// Adds a clue, builder style.
    #[must_use]
    pub fn with_clue(mut self, direction: Direction, index: usize, count: usize) -> Self {
        self.add_clue(direction, index, count);
        self
    }

    /// Fixes cell `(row, col)` to `value`.
    pub fn add_cell(&mut self, row: usize, col: usize, value: usize) {
        self.cells.push(Cell { row, col, value });
    }

    /// Adds the clue that `count` buildings are visible on line `index` from `direction`.
    pub fn add_clue(&mut self, direction: Direction, index: usize, count: usize) {
        self.clues[direction.slot()].push((index, count));
    }

    /// Side length of the grid.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// The fixed cells, in insertion order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// `(index, count)` pairs given for one edge.
    #[must_use]
    pub fn clues(&self, direction: Direction) -> &[(usize, usize)] {
        &self.clues[direction.slot()]
    }

    /// The visible count required for line `index` seen from `direction`.
    #[must_use]
    pub fn clue(&self, direction: Direction, index: usize) -> Option<usize> {
        self.clues(direction)
            .iter()
            .find(|&&(i, _)| i == index)
            .map(|&(_, count)| count)
    }

    /// Total number of edge clues over all four directions.
    #[must_use]
    pub fn clue_count(&self) -> usize {
        self.clues.iter().map(Vec::len).sum()
    }

    /// Checks that every index and value lies in `1..=size` and that no cell
    /// or clue is given twice with different values.
    ///
    /// # Errors
    ///
    /// The first problem found, as a [`PuzzleError`].
    pub fn validate(&self) -> Result<(), PuzzleError> {
        let size = self.size;
        if size == 0 {
            return Err(PuzzleError::ZeroSize);
        }

        let in_range = |n: usize| (1..=size).contains(&n);

        for (i, cell) in self.cells.iter().enumerate() {
            if !(in_range(cell.row) && in_range(cell.col) && in_range(cell.value)) {
                return Err(PuzzleError::CellOutOfRange {
                    row: cell.row,
                    col: cell.col,
                    value: cell.value,
                    size,
                });
            }
            if self.cells[..i]
                .iter()
                .any(|other| other.row == cell.row && other.col == cell.col && other.value != cell.value)
            {
                return Err(PuzzleError::ConflictingCell {
                    row: cell.row,
                    col: cell.col,
                });
            }
        }

        for direction in Direction::ALL {
            let clues = self.clues(direction);
            for (i, &(index, count)) in clues.iter().enumerate() {
                if !(in_range(index) && in_range(count)) {
                    return Err(PuzzleError::ClueOutOfRange {
                        direction,
                        index,
                        count,
                        size,
                    });
                }
                if clues[..i].iter().any(|&(j, c)| j == index && c != count) {
                    return Err(PuzzleError::ConflictingClue { direction, index });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clue_lookup() {
        let puzzle = Puzzle::empty(5)
            .with_clue(Direction::Bottom, 3, 1)
            .with_clue(Direction::Bottom, 4, 3)
            .with_clue(Direction::Right, 5, 3);
        assert_eq!(puzzle.clue(Direction::Bottom, 4), Some(3));
        assert_eq!(puzzle.clue(Direction::Bottom, 5), None);
        assert_eq!(puzzle.clue(Direction::Top, 3), None);
        assert_eq!(puzzle.clue_count(), 3);
        assert!(puzzle.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_size() {
        assert_eq!(Puzzle::empty(0).validate(), Err(PuzzleError::ZeroSize));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let puzzle = Puzzle::empty(4).with_cell(1, 5, 2);
        assert!(matches!(
            puzzle.validate(),
            Err(PuzzleError::CellOutOfRange { col: 5, .. })
        ));

        let puzzle = Puzzle::empty(4).with_cell(1, 1, 0);
        assert!(matches!(puzzle.validate(), Err(PuzzleError::CellOutOfRange { .. })));

        let puzzle = Puzzle::empty(4).with_clue(Direction::Left, 2, 5);
        assert_eq!(
            puzzle.validate(),
            Err(PuzzleError::ClueOutOfRange {
                direction: Direction::Left,
                index: 2,
                count: 5,
                size: 4
            })
        );
    }

    #[test]
    fn test_validate_rejects_conflicts() {
        let puzzle = Puzzle::empty(4).with_cell(2, 2, 1).with_cell(2, 2, 3);
        assert_eq!(
            puzzle.validate(),
            Err(PuzzleError::ConflictingCell { row: 2, col: 2 })
        );

        let puzzle = Puzzle::empty(4)
            .with_clue(Direction::Top, 1, 2)
            .with_clue(Direction::Top, 1, 2);
        assert!(puzzle.validate().is_ok());

        let puzzle = puzzle.with_clue(Direction::Top, 1, 3);
        assert_eq!(
            puzzle.validate(),
            Err(PuzzleError::ConflictingClue {
                direction: Direction::Top,
                index: 1
            })
        );
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("Bottom".parse::<Direction>(), Ok(Direction::Bottom));
        assert!("north".parse::<Direction>().is_err());
        assert_eq!(Direction::Right.to_string(), "right");
    }
}
