#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The boundary between formula construction and the decision procedure.

use crate::smt::term::{BoolExpr, IntExpr, IntVar, Valuation};
use rustc_hash::FxHashMap;
use std::fmt::{Display, Formatter};

/// Verdict of a satisfiability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SatResult {
    /// The formulas have a model.
    Sat,
    /// The formulas have no model.
    Unsat,
    /// The backend gave up before reaching a verdict.
    Unknown,
}

impl Display for SatResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sat => write!(f, "sat"),
            Self::Unsat => write!(f, "unsat"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Concrete values for the variables of a satisfied formula, keyed by variable id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model(FxHashMap<usize, i32>);

impl Model {
    /// An empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of `var`.
    pub fn insert(&mut self, var: &IntVar, value: i32) {
        self.0.insert(var.id(), value);
    }

    /// The value of `var`, if it has one.
    #[must_use]
    pub fn get(&self, var: &IntVar) -> Option<i32> {
        self.0.get(&var.id()).copied()
    }

    /// Evaluates `expr` under this model.
    #[must_use]
    pub fn eval(&self, expr: &IntExpr) -> Option<i32> {
        expr.eval(self)
    }

    /// Number of variables with a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if no variable has a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Valuation for Model {
    fn value(&self, var: &IntVar) -> Option<i32> {
        self.get(var)
    }
}

impl FromIterator<(usize, i32)> for Model {
    fn from_iter<T: IntoIterator<Item = (usize, i32)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A decision procedure for conjunctions of formulas.
///
/// Implementations accept constraints one at a time, decide their
/// conjunction on [`check`](Self::check), and expose a model after a
/// [`SatResult::Sat`] verdict.
pub trait SolverAdapter {
    /// Adds `constraint` to the conjunction.
    fn add(&mut self, constraint: BoolExpr);

    /// Decides the conjunction of everything added so far.
    fn check(&mut self) -> SatResult;

    /// The model found by the last [`check`](Self::check), if it returned `Sat`.
    fn model(&self) -> Option<&Model>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smt::term::Context;

    #[test]
    fn test_model_eval() {
        let mut ctx = Context::new();
        let x = ctx.int_var("x", 1, 9);
        let y = ctx.int_var("y", 1, 9);

        let mut model = Model::new();
        model.insert(&x, 4);
        assert_eq!(model.get(&x), Some(4));
        assert_eq!(model.get(&y), None);
        assert_eq!(model.eval(&(x.expr() + IntExpr::constant(1))), Some(5));
        assert_eq!(model.eval(&(x.expr() + y.expr())), None);

        model.insert(&y, 2);
        assert_eq!(model.len(), 2);
        assert_eq!(model.eval(&(x.expr() + y.expr())), Some(6));
    }
}
