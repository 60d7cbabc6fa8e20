#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Assembles the full constraint set of a puzzle.

use crate::skyscraper::puzzle::{Direction, Puzzle};
use crate::skyscraper::visibility::{arithmetic_visible_count, exactly_n_visible};
use crate::smt::solver::SolverAdapter;
use crate::smt::term::{BoolExpr, Context, IntExpr, IntVar};
use clap::ValueEnum;
use log::debug;
use std::fmt::{Display, Formatter};

/// How edge clues are turned into constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Encoding {
    /// `visible_count(line) == clue`, with the count as a running `ite` fold.
    Arithmetic,
    /// A case split over the positions of the visible elements.
    #[default]
    Boolean,
    /// `boolean` when the puzzle has at most `2 * N` edge clues, else `arithmetic`.
    Auto,
}

impl Encoding {
    /// The concrete encoding used for `puzzle`. Never returns [`Encoding::Auto`].
    #[must_use]
    pub fn resolve(self, puzzle: &Puzzle) -> Self {
        match self {
            Self::Auto if puzzle.clue_count() <= 2 * puzzle.size() => Self::Boolean,
            Self::Auto => Self::Arithmetic,
            concrete => concrete,
        }
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Arithmetic => write!(f, "arithmetic"),
            Self::Boolean => write!(f, "boolean"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

fn int(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// The unknown grid: one integer variable per cell, ranging over `1..=N`.
#[derive(Debug, Clone)]
pub struct GridVars {
    size: usize,
    /// Row-major.
    cells: Vec<IntVar>,
}

impl GridVars {
    /// Declares one variable per cell of a `size` x `size` grid in `context`.
    pub fn new(context: &mut Context, size: usize) -> Self {
        let cells = (1..=size)
            .flat_map(|row| (1..=size).map(move |col| (row, col)))
            .map(|(row, col)| context.int_var(format!("grid_{row}_{col}"), 1, int(size)))
            .collect();
        Self { size, cells }
    }

    /// Side length of the grid.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// The variable of a 1-based cell position.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&IntVar> {
        if !(1..=self.size).contains(&row) || !(1..=self.size).contains(&col) {
            return None;
        }
        self.cells.get((row - 1) * self.size + (col - 1))
    }

    /// Line `index` (1-based) in viewing order from `direction`: bottom and
    /// right clues read their column or row reversed.
    #[must_use]
    pub fn line(&self, direction: Direction, index: usize) -> Vec<IntExpr> {
        let n = self.size;
        (1..=n)
            .filter_map(|k| match direction {
                Direction::Top => self.cell(k, index),
                Direction::Bottom => self.cell(n + 1 - k, index),
                Direction::Left => self.cell(index, k),
                Direction::Right => self.cell(index, n + 1 - k),
            })
            .map(IntVar::expr)
            .collect()
    }
}

/// Every constraint of one puzzle, ready to be posted to a solver.
#[derive(Debug, Clone)]
pub struct Constraints {
    context: Context,
    grid: GridVars,
    encoding: Encoding,
    assertions: Vec<BoolExpr>,
}

impl Constraints {
    /// The cell variables.
    #[must_use]
    pub const fn grid(&self) -> &GridVars {
        &self.grid
    }

    /// The encoding the clues were built with, after resolving [`Encoding::Auto`].
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// The assertions, in posting order.
    #[must_use]
    pub fn assertions(&self) -> &[BoolExpr] {
        &self.assertions
    }

    /// Adds every assertion to `solver`.
    pub fn post(&self, solver: &mut impl SolverAdapter) {
        for assertion in &self.assertions {
            solver.add(assertion.clone());
        }
    }
}

/// The constraints as an SMT-LIB script.
impl Display for Constraints {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.context)?;
        for assertion in &self.assertions {
            writeln!(f, "(assert {assertion})")?;
        }
        Ok(())
    }
}

/// Builds the constraints of `puzzle`: cell domains, distinct rows and
/// columns, fixed cells, and one constraint per edge clue.
///
/// Lines without a clue are left unconstrained. The puzzle is not validated;
/// fixed cells outside the grid are ignored and clues on lines outside the
/// grid are unsatisfiable.
#[must_use]
pub fn build(puzzle: &Puzzle, encoding: Encoding) -> Constraints {
    let encoding = encoding.resolve(puzzle);
    let n = puzzle.size();
    let mut context = Context::new();
    let grid = GridVars::new(&mut context, n);
    let mut assertions = Vec::new();

    for var in &grid.cells {
        let x = var.expr();
        assertions.push(BoolExpr::and([x.ge(1), x.le(int(n))]));
    }

    for index in 1..=n {
        assertions.push(BoolExpr::distinct(grid.line(Direction::Left, index)));
        assertions.push(BoolExpr::distinct(grid.line(Direction::Top, index)));
    }

    for cell in puzzle.cells() {
        if let Some(var) = grid.cell(cell.row, cell.col) {
            assertions.push(var.expr().equals(int(cell.value)));
        }
    }

    for direction in Direction::ALL {
        for &(index, count) in puzzle.clues(direction) {
            let line = grid.line(direction, index);
            assertions.push(match encoding {
                Encoding::Arithmetic => arithmetic_visible_count(&line).equals(int(count)),
                Encoding::Boolean | Encoding::Auto => exactly_n_visible(count, &line),
            });
        }
    }

    debug!(
        "built {} assertions for a {n}x{n} puzzle with {} clues ({encoding} encoding)",
        assertions.len(),
        puzzle.clue_count()
    );

    Constraints {
        context,
        grid,
        encoding,
        assertions,
    }
}
