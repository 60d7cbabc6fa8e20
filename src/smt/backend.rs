#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A [`SolverAdapter`] that decides finite-domain formulas with the CDCL engine.

use crate::sat::cdcl::Cdcl;
use crate::sat::cnf::Cnf;
use crate::sat::solver::{SolutionStats, SolveResult, Solver, SolverConfig};
use crate::smt::encoder::Encoder;
use crate::smt::solver::{Model, SatResult, SolverAdapter};
use crate::smt::term::BoolExpr;
use log::debug;

/// Knobs of the finite-domain backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendConfig {
    /// Conflicts the SAT search may spend before reporting [`SatResult::Unknown`].
    pub max_conflicts: Option<u64>,
    /// Seed for the randomised decisions of the SAT search.
    pub seed: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            max_conflicts: None,
            seed: SolverConfig::default().seed,
        }
    }
}

/// Lowers every added constraint to CNF as it arrives and runs a fresh CDCL
/// search over the accumulated clauses on each [`check`](SolverAdapter::check).
#[derive(Debug, Default)]
pub struct FiniteDomainSolver {
    config: BackendConfig,
    encoder: Encoder,
    /// Asserted formulas, in the order they were added.
    assertions: Vec<BoolExpr>,
    model: Option<Model>,
    stats: SolutionStats,
}

impl FiniteDomainSolver {
    /// A backend with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend with explicit knobs.
    #[must_use]
    pub fn with_config(config: BackendConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The CNF built so far, e.g. for DIMACS export.
    #[must_use]
    pub const fn cnf(&self) -> &Cnf {
        self.encoder.cnf()
    }

    /// Everything added so far.
    #[must_use]
    pub fn assertions(&self) -> &[BoolExpr] {
        &self.assertions
    }

    /// Statistics of the last search.
    #[must_use]
    pub const fn stats(&self) -> SolutionStats {
        self.stats
    }
}

impl SolverAdapter for FiniteDomainSolver {
    fn add(&mut self, constraint: BoolExpr) {
        self.encoder.assert(&constraint);
        self.assertions.push(constraint);
        self.model = None;
    }

    fn check(&mut self) -> SatResult {
        let cnf = self.encoder.cnf();
        debug!(
            "checking {} assertions: {} integer variables, {} boolean variables, {} clauses, {} literals",
            self.assertions.len(),
            self.encoder.num_int_vars(),
            cnf.num_vars,
            cnf.len(),
            cnf.num_literals()
        );

        let config = SolverConfig {
            max_conflicts: self.config.max_conflicts,
            seed: self.config.seed,
            ..SolverConfig::default()
        };
        let mut solver = Cdcl::with_config(cnf.clone(), config);
        let result = solver.solve();
        self.stats = solver.stats();
        debug!("{result} after {} conflicts", self.stats.conflicts);

        match result {
            SolveResult::Sat(solutions) => {
                self.model = Some(self.encoder.model(&solutions));
                SatResult::Sat
            }
            SolveResult::Unsat => {
                self.model = None;
                SatResult::Unsat
            }
            SolveResult::Unknown => {
                self.model = None;
                SatResult::Unknown
            }
        }
    }

    fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smt::term::{Context, IntExpr};

    #[test]
    fn test_sat_with_model() {
        let mut ctx = Context::new();
        let x = ctx.int_var("x", 1, 9).expr();
        let y = ctx.int_var("y", 1, 9).expr();

        let mut solver = FiniteDomainSolver::new();
        solver.add((x.clone() + y.clone()).equals(10));
        solver.add(x.gt(6));
        solver.add(y.ge(&x));
        assert!(solver.model().is_none());

        assert_eq!(solver.check(), SatResult::Unsat);

        let mut solver = FiniteDomainSolver::new();
        solver.add((x.clone() + y.clone()).equals(10));
        solver.add(x.gt(3));
        solver.add(x.lt(&y));
        assert_eq!(solver.check(), SatResult::Sat);

        let model = solver.model().expect("model after sat");
        let (vx, vy) = (model.eval(&x).unwrap(), model.eval(&y).unwrap());
        assert_eq!(vx + vy, 10);
        assert!(vx > 3 && vx < vy);
        assert_eq!(solver.assertions().len(), 3);
    }

    #[test]
    fn test_distinct_beyond_domain_is_unsat() {
        let mut ctx = Context::new();
        let vars: Vec<IntExpr> = (0..5).map(|i| ctx.int_var(format!("v{i}"), 1, 4).expr()).collect();
        let mut solver = FiniteDomainSolver::new();
        solver.add(BoolExpr::distinct(vars));
        assert_eq!(solver.check(), SatResult::Unsat);
        assert!(solver.model().is_none());
    }

    #[test]
    fn test_zero_budget_is_unknown() {
        let mut ctx = Context::new();
        let vars: Vec<IntExpr> = (0..3).map(|i| ctx.int_var(format!("v{i}"), 1, 2).expr()).collect();
        let mut solver = FiniteDomainSolver::with_config(BackendConfig {
            max_conflicts: Some(0),
            ..BackendConfig::default()
        });
        solver.add(BoolExpr::distinct(vars));
        assert_eq!(solver.check(), SatResult::Unknown);
        assert!(solver.model().is_none());
    }

    #[test]
    fn test_dimacs_export() {
        let mut ctx = Context::new();
        let x = ctx.int_var("x", 1, 3).expr();
        let mut solver = FiniteDomainSolver::new();
        solver.add(x.not_equals(2));
        let dimacs = solver.cnf().to_string();
        assert!(dimacs.starts_with("p cnf "));
        assert_eq!(dimacs.lines().count(), solver.cnf().len() + 1);
    }
}
