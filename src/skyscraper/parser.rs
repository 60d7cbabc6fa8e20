#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A line-oriented text format for puzzles.
//!
//! ```text
//! # the 5x5 instance
//! size 5
//! cell 2 2 1
//! top 1 2
//! bottom 3 1
//! ```
//!
//! - `size N` gives the grid size and must appear exactly once.
//! - `cell ROW COL VALUE` fixes a cell.
//! - `top|left|bottom|right INDEX COUNT` gives an edge clue.
//! - `#` starts a comment; blank lines are skipped.
//!
//! Directives may appear in any order. The parsed puzzle is validated.

use crate::skyscraper::puzzle::{Direction, Puzzle, PuzzleError};
use std::io::{self, BufRead};
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading a puzzle file. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input could not be read.
    #[error("failed to read puzzle: {0}")]
    Io(#[from] io::Error),
    /// A line starts with an unknown keyword.
    #[error("line {line}: unknown directive `{keyword}`")]
    UnknownDirective {
        /// The offending line.
        line: usize,
        /// The keyword found.
        keyword: String,
    },
    /// A directive has the wrong number of arguments.
    #[error("line {line}: `{keyword}` takes {expected} numbers, found {found}")]
    WrongArity {
        /// The offending line.
        line: usize,
        /// The directive.
        keyword: String,
        /// Arguments the directive takes.
        expected: usize,
        /// Arguments given.
        found: usize,
    },
    /// An argument is not a non-negative integer.
    #[error("line {line}: `{token}` is not a non-negative integer")]
    InvalidNumber {
        /// The offending line.
        line: usize,
        /// The argument found.
        token: String,
    },
    /// A second `size` directive.
    #[error("line {line}: size given more than once")]
    DuplicateSize {
        /// The offending line.
        line: usize,
    },
    /// The input has no `size` directive.
    #[error("no `size` directive")]
    MissingSize,
    /// The puzzle parsed but failed validation.
    #[error(transparent)]
    Invalid(#[from] PuzzleError),
}

enum Directive {
    Cell(usize, usize, usize),
    Clue(Direction, usize, usize),
}

fn numbers<const N: usize>(
    line: usize,
    keyword: &str,
    tokens: &[&str],
) -> Result<[usize; N], ParseError> {
    if tokens.len() != N {
        return Err(ParseError::WrongArity {
            line,
            keyword: keyword.to_string(),
            expected: N,
            found: tokens.len(),
        });
    }

    let mut out = [0; N];
    for (slot, token) in out.iter_mut().zip(tokens) {
        *slot = token.parse().map_err(|_| ParseError::InvalidNumber {
            line,
            token: (*token).to_string(),
        })?;
    }
    Ok(out)
}

/// Parses a puzzle from a reader.
///
/// # Errors
///
/// I/O failures, malformed lines (reported with their 1-based line number),
/// a missing or repeated `size`, or a puzzle that fails [`Puzzle::validate`].
pub fn parse_puzzle<R: BufRead>(reader: R) -> Result<Puzzle, ParseError> {
    let mut size = None;
    let mut directives = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let number = number + 1;
        let content = line.split('#').next().unwrap_or_default();
        let tokens: Vec<&str> = content.split_whitespace().collect();

        let Some((&keyword, args)) = tokens.split_first() else {
            continue;
        };

        match keyword {
            "size" => {
                let [n] = numbers::<1>(number, keyword, args)?;
                if size.replace(n).is_some() {
                    return Err(ParseError::DuplicateSize { line: number });
                }
            }
            "cell" => {
                let [row, col, value] = numbers::<3>(number, keyword, args)?;
                directives.push(Directive::Cell(row, col, value));
            }
            _ => {
                let direction: Direction =
                    keyword.parse().map_err(|_| ParseError::UnknownDirective {
                        line: number,
                        keyword: keyword.to_string(),
                    })?;
                let [index, count] = numbers::<2>(number, keyword, args)?;
                directives.push(Directive::Clue(direction, index, count));
            }
        }
    }

    let mut puzzle = Puzzle::empty(size.ok_or(ParseError::MissingSize)?);
    for directive in directives {
        match directive {
            Directive::Cell(row, col, value) => puzzle.add_cell(row, col, value),
            Directive::Clue(direction, index, count) => puzzle.add_clue(direction, index, count),
        }
    }

    puzzle.validate()?;
    Ok(puzzle)
}

/// Parses the puzzle file at `path`.
///
/// # Errors
///
/// See [`parse_puzzle`]; opening the file may also fail.
pub fn parse_puzzle_file(path: impl AsRef<Path>) -> Result<Puzzle, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_puzzle(io::BufReader::new(file))
}
