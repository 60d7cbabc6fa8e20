#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Built-in puzzle instances, keyed by grid size.

use crate::skyscraper::puzzle::{Direction, Puzzle, PuzzleError};

struct Instance {
    size: usize,
    /// `(row, col, value)`
    cells: &'static [(usize, usize, usize)],
    /// `(index, count)` per edge, in [`Direction::ALL`] order.
    clues: [&'static [(usize, usize)]; 4],
}

const INSTANCES: [Instance; 4] = [
    Instance {
        size: 5,
        cells: &[(2, 2, 1)],
        clues: [
            &[(1, 2)],
            &[(3, 2)],
            &[(3, 1), (4, 3)],
            &[(3, 2), (4, 2), (5, 3)],
        ],
    },
    Instance {
        size: 7,
        cells: &[(2, 1, 3), (3, 1, 1), (3, 3, 2), (6, 5, 3), (7, 1, 2), (7, 6, 3)],
        clues: [
            &[(2, 3), (4, 3), (7, 4)],
            &[(2, 3), (4, 1), (6, 3)],
            &[(1, 3), (3, 1), (4, 3), (5, 3)],
            &[(2, 3), (3, 3), (5, 3), (7, 4)],
        ],
    },
    Instance {
        size: 8,
        cells: &[
            (1, 3, 5),
            (2, 6, 3),
            (3, 3, 2),
            (3, 8, 1),
            (4, 5, 5),
            (4, 8, 4),
            (5, 7, 1),
            (6, 4, 1),
            (6, 6, 2),
            (8, 2, 3),
        ],
        clues: [
            &[(1, 3), (4, 4), (5, 4), (6, 4)],
            &[(2, 4), (5, 4), (6, 3), (7, 3)],
            &[(1, 1), (2, 3), (6, 3), (8, 4)],
            &[(1, 3), (4, 4), (7, 3)],
        ],
    },
    Instance {
        size: 9,
        cells: &[
            (1, 2, 7),
            (3, 1, 3),
            (3, 5, 5),
            (3, 8, 4),
            (4, 3, 2),
            (5, 6, 2),
            (6, 2, 2),
            (6, 3, 1),
            (6, 5, 3),
            (7, 2, 3),
            (7, 8, 7),
            (8, 6, 6),
        ],
        clues: [
            &[(3, 3), (4, 2), (5, 2), (6, 3), (7, 3), (8, 2)],
            &[(3, 3), (4, 3), (5, 3), (6, 2), (7, 4), (8, 3), (9, 4)],
            &[(1, 4), (2, 4), (4, 2), (5, 2), (7, 3), (8, 4), (9, 4)],
            &[(2, 3), (3, 2)],
        ],
    },
];

/// Sizes with a built-in instance, ascending.
pub fn available_sizes() -> impl Iterator<Item = usize> {
    INSTANCES.iter().map(|instance| instance.size)
}

/// The built-in puzzle of the given size.
///
/// # Errors
///
/// [`PuzzleError::NoSuchInstance`] if there is no puzzle of that size. Use
/// [`Puzzle::empty`] for an unconstrained grid.
pub fn instance(size: usize) -> Result<Puzzle, PuzzleError> {
    let instance = INSTANCES
        .iter()
        .find(|instance| instance.size == size)
        .ok_or(PuzzleError::NoSuchInstance(size))?;

    let mut puzzle = Puzzle::empty(size);
    for &(row, col, value) in instance.cells {
        puzzle.add_cell(row, col, value);
    }
    for (direction, clues) in Direction::ALL.into_iter().zip(instance.clues) {
        for &(index, count) in clues {
            puzzle.add_clue(direction, index, count);
        }
    }

    Ok(puzzle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_valid() {
        for size in available_sizes() {
            let puzzle = instance(size).unwrap();
            assert_eq!(puzzle.size(), size);
            assert!(puzzle.validate().is_ok(), "instance {size} is malformed");
        }
    }

    #[test]
    fn test_catalog_contents() {
        let puzzle = instance(5).unwrap();
        assert_eq!(puzzle.cells().len(), 1);
        assert_eq!(puzzle.clue(Direction::Right, 5), Some(3));
        assert_eq!(puzzle.clue_count(), 7);
        assert_eq!(available_sizes().collect::<Vec<_>>(), vec![5, 7, 8, 9]);
    }

    #[test]
    fn test_unknown_size() {
        assert_eq!(instance(6), Err(PuzzleError::NoSuchInstance(6)));
    }
}
