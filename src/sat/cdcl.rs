#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Conflict-driven clause learning.
//!
//! Two watched literals per clause, first-UIP learning with
//! non-chronological backjumping, VSIDS decisions with phase saving and Luby
//! restarts. Learnt clauses are kept for the whole search; the formulas built
//! from puzzles are small enough that clause deletion does not pay off.

use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::cnf::{Cnf, DecisionLevel};
use crate::sat::literal::Literal;
use crate::sat::phase_saving::SavedPhases;
use crate::sat::restarter::Luby;
use crate::sat::solver::{SolutionStats, SolveResult, Solver, SolverConfig};
use crate::sat::trail::{Reason, Trail};
use crate::sat::variable_selection::Vsids;
use bit_vec::BitVec;
use log::trace;

/// A CDCL solver over one formula.
#[derive(Debug, Clone)]
pub struct Cdcl {
    /// Original clauses followed by learnt ones; watch lists refer to indices in here.
    cnf: Cnf,
    assignment: Assignment,
    trail: Trail,
    /// Clauses watching each literal, visited when that literal becomes false.
    watches: Vec<Vec<usize>>,
    selector: Vsids,
    phases: SavedPhases,
    restarter: Luby,
    config: SolverConfig,
    rng: fastrand::Rng,
    stats: SolutionStats,
    seen: BitVec,
    /// Set once a conflict at decision level zero has been derived.
    inconsistent: bool,
}

impl Cdcl {
    /// Creates a solver for `cnf` with explicit search knobs.
    ///
    /// Unit clauses are propagated immediately; a contradiction found here
    /// makes the later search return [`SolveResult::Unsat`] at once.
    #[must_use]
    pub fn with_config(cnf: Cnf, config: SolverConfig) -> Self {
        let num_vars = cnf.num_vars;
        let mut solver = Self {
            cnf: Cnf {
                clauses: Vec::with_capacity(cnf.len()),
                num_vars,
            },
            assignment: Assignment::new(num_vars),
            trail: Trail::new(num_vars),
            watches: vec![Vec::new(); 2 * (num_vars + 1)],
            selector: Vsids::new(num_vars, config.var_decay),
            phases: SavedPhases::new(num_vars),
            restarter: Luby::new(config.restart_unit),
            rng: fastrand::Rng::with_seed(config.seed),
            config,
            stats: SolutionStats::default(),
            seen: BitVec::from_elem(num_vars + 1, false),
            inconsistent: false,
        };

        for clause in cnf.clauses {
            solver.add_clause(clause);
        }

        solver
    }

    /// Adds a problem clause. Only valid at decision level zero.
    fn add_clause(&mut self, mut clause: Clause) {
        if self.inconsistent {
            return;
        }

        clause.normalise();
        if clause.is_tautology()
            || clause
                .iter()
                .any(|&lit| self.assignment.literal_value(lit) == Some(true))
        {
            return;
        }

        let assignment = &self.assignment;
        clause.retain(|lit| assignment.literal_value(lit) != Some(false));

        match clause.len() {
            0 => self.inconsistent = true,
            1 => {
                self.enqueue(clause[0], Reason::Unit);
                if self.propagate().is_some() {
                    self.inconsistent = true;
                }
            }
            _ => {
                self.attach(clause);
            }
        }
    }

    fn attach(&mut self, clause: Clause) -> usize {
        let c_ref = self.cnf.len();
        self.watches[clause[0].index()].push(c_ref);
        self.watches[clause[1].index()].push(c_ref);
        self.cnf.clauses.push(clause);
        c_ref
    }

    fn enqueue(&mut self, lit: Literal, reason: Reason) {
        self.assignment.assign(lit);
        self.trail.push(lit, reason);
    }

    /// Unit propagation over the watch lists. Returns the index of a falsified clause.
    fn propagate(&mut self) -> Option<usize> {
        while self.trail.curr_idx < self.trail.len() {
            let lit = self.trail[self.trail.curr_idx];
            self.trail.curr_idx += 1;
            self.stats.propagations += 1;

            let false_lit = !lit;
            let mut watchers = std::mem::take(&mut self.watches[false_lit.index()]);
            let mut conflict = None;
            let mut i = 0;

            while i < watchers.len() {
                let c_ref = watchers[i];
                let clause = &mut self.cnf.clauses[c_ref];

                if clause[0] == false_lit {
                    clause.swap(0, 1);
                }

                let first = clause[0];
                if self.assignment.literal_value(first) == Some(true) {
                    i += 1;
                    continue;
                }

                let replacement = (2..clause.len())
                    .find(|&k| self.assignment.literal_value(clause[k]) != Some(false));

                if let Some(k) = replacement {
                    clause.swap(1, k);
                    let watch = clause[1];
                    self.watches[watch.index()].push(c_ref);
                    watchers.swap_remove(i);
                    continue;
                }

                if self.assignment.literal_value(first) == Some(false) {
                    conflict = Some(c_ref);
                    break;
                }

                self.enqueue(first, Reason::Clause(c_ref));
                i += 1;
            }

            self.watches[false_lit.index()] = watchers;

            if conflict.is_some() {
                self.trail.curr_idx = self.trail.len();
                return conflict;
            }
        }

        None
    }

    /// First-UIP analysis. Returns the learnt clause, asserting literal first,
    /// and the level to backjump to.
    fn analyse(&mut self, conflict: usize) -> (Vec<Literal>, DecisionLevel) {
        let level = self.trail.decision_level();
        let mut learnt = vec![Literal::default()];
        let mut path = 0_usize;
        let mut index = self.trail.len();
        let mut c_ref = conflict;
        let mut skip_implied = false;

        loop {
            let clause = &self.cnf.clauses[c_ref];
            for &lit in clause.iter().skip(usize::from(skip_implied)) {
                let var = lit.variable();
                if self.seen[var as usize] || self.trail.level(var) == 0 {
                    continue;
                }

                self.seen.set(var as usize, true);
                self.selector.bump(var);

                if self.trail.level(var) >= level {
                    path += 1;
                } else {
                    learnt.push(lit);
                }
            }

            let pivot = loop {
                index -= 1;
                let lit = self.trail[index];
                if self.seen[lit.variable() as usize] {
                    break lit;
                }
            };

            self.seen.set(pivot.variable() as usize, false);
            path -= 1;

            if path == 0 {
                learnt[0] = !pivot;
                break;
            }

            let Reason::Clause(reason) = self.trail.reason(pivot.variable()) else {
                unreachable!("implied literal {pivot} has no reason clause");
            };
            c_ref = reason;
            skip_implied = true;
        }

        for lit in &learnt[1..] {
            self.seen.set(lit.variable() as usize, false);
        }

        let backjump = learnt
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, lit)| (i, self.trail.level(lit.variable())))
            .max_by_key(|&(_, level)| level);

        match backjump {
            Some((pos, level)) => {
                learnt.swap(1, pos);
                (learnt, level)
            }
            None => (learnt, 0),
        }
    }

    fn backstep_to(&mut self, level: DecisionLevel) {
        for lit in self.trail.backstep_to(level) {
            self.assignment.unassign(lit.variable());
            self.phases.save(lit);
            self.selector.insert(lit.variable());
        }
    }

    fn decide(&mut self) -> Option<Literal> {
        let num_vars = self.cnf.num_vars;
        if num_vars > 0 && self.rng.f64() < self.config.random_var_freq {
            #[allow(clippy::cast_possible_truncation)]
            let var = self.rng.u32(1..=num_vars as u32);
            if self.assignment.is_unassigned(var) {
                return Some(self.phases.get_next(var));
            }
        }

        let assignment = &self.assignment;
        let var = self.selector.pick(|var| assignment.is_unassigned(var))?;
        Some(self.phases.get_next(var))
    }

    fn learn(&mut self, learnt: Vec<Literal>) {
        let asserting = learnt[0];
        if learnt.len() == 1 {
            self.enqueue(asserting, Reason::Unit);
            return;
        }

        let c_ref = self.attach(Clause::learnt(learnt));
        self.stats.learnt_clauses += 1;
        self.enqueue(asserting, Reason::Clause(c_ref));
    }
}

impl Solver for Cdcl {
    fn new(cnf: Cnf) -> Self {
        Self::with_config(cnf, SolverConfig::default())
    }

    fn solve(&mut self) -> SolveResult {
        if self.inconsistent || self.propagate().is_some() {
            self.inconsistent = true;
            return SolveResult::Unsat;
        }

        loop {
            if let Some(conflict) = self.propagate() {
                self.stats.conflicts += 1;

                if self.trail.decision_level() == 0 {
                    self.inconsistent = true;
                    return SolveResult::Unsat;
                }

                if self
                    .config
                    .max_conflicts
                    .is_some_and(|max| self.stats.conflicts > max)
                {
                    self.backstep_to(0);
                    return SolveResult::Unknown;
                }

                let (learnt, level) = self.analyse(conflict);
                self.backstep_to(level);
                self.learn(learnt);
                self.selector.decay();

                if self.restarter.should_restart() {
                    self.stats.restarts += 1;
                    trace!(
                        "restart {} after {} conflicts",
                        self.stats.restarts,
                        self.stats.conflicts
                    );
                    self.backstep_to(0);
                }
            } else {
                let Some(lit) = self.decide() else {
                    return SolveResult::Sat(self.assignment.get_solutions());
                };

                self.stats.decisions += 1;
                self.trail.new_decision_level();
                self.enqueue(lit, Reason::Decision);
            }
        }
    }

    fn stats(&self) -> SolutionStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three pigeons, two holes.
    fn pigeonhole() -> Cnf {
        let var = |pigeon: i32, hole: i32| (pigeon - 1) * 2 + hole;
        let mut clauses = Vec::new();
        for pigeon in 1..=3 {
            clauses.push(vec![var(pigeon, 1), var(pigeon, 2)]);
        }
        for hole in 1..=2 {
            for a in 1..=3 {
                for b in a + 1..=3 {
                    clauses.push(vec![-var(a, hole), -var(b, hole)]);
                }
            }
        }
        Cnf::new(clauses)
    }

    #[test]
    fn test_solve_units() {
        let cnf = Cnf::new(vec![vec![1], vec![-2], vec![3]]);
        let mut solver = Cdcl::new(cnf.clone());
        let result = solver.solve();
        let solutions = result.solutions().expect("satisfiable");
        assert!(cnf.verify(solutions));
        assert!(solutions.check(Literal::from_i32(-2)));
    }

    #[test]
    fn test_solve_unsat_units() {
        let cnf = Cnf::new(vec![vec![1], vec![-1]]);
        assert_eq!(Cdcl::new(cnf).solve(), SolveResult::Unsat);
    }

    #[test]
    fn test_empty_clause_is_unsat() {
        let mut cnf = Cnf::new(vec![vec![1, 2]]);
        cnf.add_clause(Clause::default());
        assert_eq!(Cdcl::new(cnf).solve(), SolveResult::Unsat);
    }

    #[test]
    fn test_empty_formula_is_sat() {
        let mut solver = Cdcl::new(Cnf::default());
        assert!(matches!(solver.solve(), SolveResult::Sat(_)));
    }

    #[test]
    fn test_pigeonhole_is_unsat() {
        let mut solver = Cdcl::new(pigeonhole());
        assert_eq!(solver.solve(), SolveResult::Unsat);
        assert!(solver.stats().conflicts > 0);
    }

    #[test]
    fn test_conflict_budget_gives_unknown() {
        let config = SolverConfig {
            max_conflicts: Some(0),
            ..SolverConfig::default()
        };
        let mut solver = Cdcl::with_config(pigeonhole(), config);
        assert_eq!(solver.solve(), SolveResult::Unknown);
    }

    #[test]
    fn test_model_satisfies_formula() {
        // (x1 | x2) & (!x1 | x3) & (!x2 | !x3) & (x2 | x3) & (!x1 | !x2)
        let cnf = Cnf::new(vec![
            vec![1, 2],
            vec![-1, 3],
            vec![-2, -3],
            vec![2, 3],
            vec![-1, -2],
        ]);
        let mut solver = Cdcl::new(cnf.clone());
        let result = solver.solve();
        assert!(cnf.verify(result.solutions().expect("satisfiable")));
    }

    #[test]
    fn test_learning_on_chain() {
        // x_i -> x_{i+1} for a chain, with the last forced false and a wide
        // clause that requires one of the chain members.
        let mut clauses: Vec<Vec<i32>> = (1..10).map(|i| vec![-i, i + 1]).collect();
        clauses.push(vec![-10]);
        clauses.push((1..=10).collect());
        clauses.push(vec![11, 12]);
        assert_eq!(Cdcl::new(Cnf::new(clauses)).solve(), SolveResult::Unsat);
    }
}
