#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Lowering of finite-domain formulas to CNF.
//!
//! Every integer term is direct-encoded: each value it can take gets a
//! literal `term = value`, and exactly one of those literals holds. Boolean
//! nodes become Tseitin gate literals. A reserved `truth` literal, fixed by a
//! unit clause, stands for constants, so singleton domains and decided
//! comparisons cost no variables.
//!
//! Encodings are memoised by node identity (variables by id), which keeps the
//! CNF linear in the size of the formula DAG rather than its tree expansion.
//! The memo tables hold a clone of every node they key by address, so an
//! address cannot be reused by another node while the encoder is alive.

use crate::sat::assignment::Solutions;
use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use crate::smt::solver::Model;
use crate::smt::term::{BoolExpr, BoolNode, CmpOp, IntExpr, IntNode, IntVar};
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::iter;
use std::rc::Rc;

/// The values a term can take, ascending, each with the literal `term = value`.
pub type Domain = Rc<[(i32, Literal)]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum IntKey {
    Var(usize),
    Node(*const IntNode),
}

fn literal_for(domain: &[(i32, Literal)], value: i32) -> Option<Literal> {
    domain
        .binary_search_by_key(&value, |&(v, _)| v)
        .ok()
        .map(|pos| domain[pos].1)
}

/// Incremental lowering of formulas into one growing CNF.
#[derive(Debug)]
pub struct Encoder {
    cnf: Cnf,
    truth: Literal,
    /// Declared variables in encoding order, for reading back a model.
    vars: Vec<(IntVar, Domain)>,
    ints: FxHashMap<IntKey, (IntExpr, Domain)>,
    gates: FxHashMap<*const BoolNode, (BoolExpr, Literal)>,
    /// Keyed by operand keys, whose nodes are held by `ints`.
    comparisons: FxHashMap<(CmpOp, IntKey, IntKey), Literal>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    /// An encoder whose CNF holds only the unit clause fixing `truth`.
    #[must_use]
    pub fn new() -> Self {
        let mut cnf = Cnf::default();
        let truth = Literal::new(cnf.new_var(), true);
        cnf.add_clause(Clause::from([truth]));

        Self {
            cnf,
            truth,
            vars: Vec::new(),
            ints: FxHashMap::default(),
            gates: FxHashMap::default(),
            comparisons: FxHashMap::default(),
        }
    }

    /// The clauses generated so far.
    #[must_use]
    pub const fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    /// Number of integer variables encoded so far.
    #[must_use]
    pub fn num_int_vars(&self) -> usize {
        self.vars.len()
    }

    /// Adds clauses forcing `formula` to hold.
    ///
    /// Top-level conjunctions are split and top-level comparisons and
    /// `distinct` constraints are encoded by blocking clauses directly,
    /// without a gate literal.
    pub fn assert(&mut self, formula: &BoolExpr) {
        match formula.node() {
            BoolNode::Val(true) => {}
            BoolNode::Val(false) => self.clause(iter::empty()),
            BoolNode::And(operands) => {
                for operand in operands {
                    self.assert(operand);
                }
            }
            BoolNode::Or(operands) => {
                let lits: Vec<Literal> = operands.iter().map(|e| self.literal(e)).collect();
                self.clause(lits);
            }
            BoolNode::Cmp(op, a, b) => {
                let (da, db) = (self.int(a), self.int(b));
                for (&(va, la), &(vb, lb)) in da.iter().cartesian_product(db.iter()) {
                    if !op.holds(va, vb) {
                        self.clause([!la, !lb]);
                    }
                }
            }
            BoolNode::Distinct(operands) => {
                for (a, b) in operands.iter().tuple_combinations() {
                    let (da, db) = (self.int(a), self.int(b));
                    for &(value, la) in da.iter() {
                        if let Some(lb) = literal_for(&db, value) {
                            self.clause([!la, !lb]);
                        }
                    }
                }
            }
            BoolNode::Not(_) => {
                let lit = self.literal(formula);
                self.clause([lit]);
            }
        }
    }

    /// Reads the value of every encoded variable out of a SAT model.
    #[must_use]
    pub fn model(&self, solutions: &Solutions) -> Model {
        self.vars
            .iter()
            .filter_map(|(var, domain)| {
                domain
                    .iter()
                    .find(|&&(_, lit)| solutions.check(lit))
                    .map(|&(value, _)| (var.id(), value))
            })
            .collect()
    }

    fn fresh(&mut self) -> Literal {
        Literal::new(self.cnf.new_var(), true)
    }

    /// Adds a clause, dropping false literals and skipping satisfied clauses.
    fn clause(&mut self, lits: impl IntoIterator<Item = Literal>) {
        let mut clause = Vec::new();
        for lit in lits {
            if lit == self.truth {
                return;
            }
            if lit != !self.truth {
                clause.push(lit);
            }
        }
        self.cnf.add_clause(Clause::new(clause));
    }

    fn exactly_one(&mut self, lits: &[Literal]) {
        self.clause(lits.iter().copied());
        for (&a, &b) in lits.iter().tuple_combinations() {
            self.clause([!a, !b]);
        }
    }

    /// Allocates a fresh one-hot domain over `values` (ascending, distinct).
    fn one_hot(&mut self, values: Vec<i32>) -> Domain {
        if let [value] = values[..] {
            return Rc::from(vec![(value, self.truth)]);
        }

        let domain: Vec<(i32, Literal)> = values.into_iter().map(|v| (v, self.fresh())).collect();
        let lits: Vec<Literal> = domain.iter().map(|&(_, lit)| lit).collect();
        self.exactly_one(&lits);
        Rc::from(domain)
    }

    fn int_key(expr: &IntExpr) -> IntKey {
        match expr.node() {
            IntNode::Var(var) => IntKey::Var(var.id()),
            _ => IntKey::Node(expr.as_ptr()),
        }
    }

    /// The domain table of an integer term.
    pub fn int(&mut self, expr: &IntExpr) -> Domain {
        let key = Self::int_key(expr);
        if let Some((_, domain)) = self.ints.get(&key) {
            return domain.clone();
        }

        let domain = match expr.node() {
            IntNode::Const(value) => Rc::from(vec![(*value, self.truth)]),
            IntNode::Var(var) => {
                let domain = self.one_hot((var.lo()..=var.hi()).collect());
                self.vars.push((var.clone(), domain.clone()));
                domain
            }
            IntNode::Add(a, b) => {
                let (da, db) = (self.int(a), self.int(b));
                let pairs = da.iter().cartesian_product(db.iter());
                let values = pairs
                    .clone()
                    .map(|(&(va, _), &(vb, _))| va + vb)
                    .sorted_unstable()
                    .dedup()
                    .collect();
                let out = self.one_hot(values);
                for (&(va, la), &(vb, lb)) in pairs {
                    if let Some(lo) = literal_for(&out, va + vb) {
                        self.clause([!la, !lb, lo]);
                    }
                }
                out
            }
            IntNode::Ite(cond, then, otherwise) => {
                let cond = self.literal(cond);
                if cond == self.truth {
                    self.int(then)
                } else if cond == !self.truth {
                    self.int(otherwise)
                } else {
                    let (dt, de) = (self.int(then), self.int(otherwise));
                    let values = dt
                        .iter()
                        .chain(de.iter())
                        .map(|&(v, _)| v)
                        .sorted_unstable()
                        .dedup()
                        .collect();
                    let out = self.one_hot(values);
                    for &(value, lit) in dt.iter() {
                        if let Some(lo) = literal_for(&out, value) {
                            self.clause([!cond, !lit, lo]);
                        }
                    }
                    for &(value, lit) in de.iter() {
                        if let Some(lo) = literal_for(&out, value) {
                            self.clause([cond, !lit, lo]);
                        }
                    }
                    out
                }
            }
        };

        self.ints.insert(key, (expr.clone(), domain.clone()));
        domain
    }

    /// A literal equivalent to `formula`.
    pub fn literal(&mut self, formula: &BoolExpr) -> Literal {
        let key = formula.as_ptr();
        if let Some(&(_, lit)) = self.gates.get(&key) {
            return lit;
        }

        let lit = match formula.node() {
            BoolNode::Val(value) => {
                if *value {
                    self.truth
                } else {
                    !self.truth
                }
            }
            BoolNode::Not(operand) => !self.literal(operand),
            BoolNode::And(operands) => {
                let lits = operands.iter().map(|e| self.literal(e)).collect();
                self.gate_and(lits)
            }
            BoolNode::Or(operands) => {
                let lits = operands.iter().map(|e| !self.literal(e)).collect();
                !self.gate_and(lits)
            }
            BoolNode::Cmp(op, a, b) => self.compare(*op, a, b),
            BoolNode::Distinct(operands) => {
                let lits = operands
                    .iter()
                    .tuple_combinations()
                    .map(|(a, b)| self.compare(CmpOp::Ne, a, b))
                    .collect();
                self.gate_and(lits)
            }
        };

        self.gates.insert(key, (formula.clone(), lit));
        lit
    }

    /// Tseitin AND gate over `inputs`, simplified against constants.
    fn gate_and(&mut self, mut inputs: Vec<Literal>) -> Literal {
        if inputs.contains(&!self.truth) {
            return !self.truth;
        }

        let truth = self.truth;
        inputs.retain(|&lit| lit != truth);
        inputs.sort_unstable();
        inputs.dedup();

        // `l` and `!l` differ only in the lowest bit, so they end up adjacent.
        if inputs.windows(2).any(|pair| pair[0] == !pair[1]) {
            return !self.truth;
        }

        match inputs[..] {
            [] => self.truth,
            [lit] => lit,
            _ => {
                let out = self.fresh();
                for &lit in &inputs {
                    self.clause([!out, lit]);
                }
                self.clause(inputs.iter().map(|&lit| !lit).chain(iter::once(out)));
                out
            }
        }
    }

    /// A literal equivalent to `a op b`.
    fn compare(&mut self, op: CmpOp, a: &IntExpr, b: &IntExpr) -> Literal {
        let (op, a, b) = match op {
            CmpOp::Gt | CmpOp::Ge => (op.swapped(), b, a),
            _ => (op, a, b),
        };

        let key = (op, Self::int_key(a), Self::int_key(b));
        if let Some(&lit) = self.comparisons.get(&key) {
            return lit;
        }

        let (da, db) = (self.int(a), self.int(b));
        let lit = match (op, da.len(), db.len()) {
            (CmpOp::Eq | CmpOp::Ne, _, 1) | (CmpOp::Eq | CmpOp::Ne, 1, _) => {
                let (value, other) = if db.len() == 1 {
                    (db[0].0, &da)
                } else {
                    (da[0].0, &db)
                };
                let eq = literal_for(other, value).unwrap_or(!self.truth);
                if op == CmpOp::Eq {
                    eq
                } else {
                    !eq
                }
            }
            _ => {
                let pairs = da.iter().cartesian_product(db.iter());
                let holding = pairs.clone().filter(|&(&(va, _), &(vb, _))| op.holds(va, vb)).count();

                if holding == da.len() * db.len() {
                    self.truth
                } else if holding == 0 {
                    !self.truth
                } else {
                    let out = self.fresh();
                    for (&(va, la), &(vb, lb)) in pairs {
                        let implied = if op.holds(va, vb) { out } else { !out };
                        self.clause([!la, !lb, implied]);
                    }
                    out
                }
            }
        };

        self.comparisons.insert(key, lit);
        lit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::cdcl::Cdcl;
    use crate::sat::solver::{SolveResult, Solver};
    use crate::smt::term::Context;

    fn solve(encoder: &Encoder) -> Option<Model> {
        let mut solver = Cdcl::new(encoder.cnf().clone());
        match solver.solve() {
            SolveResult::Sat(solutions) => {
                assert!(encoder.cnf().verify(&solutions));
                Some(encoder.model(&solutions))
            }
            _ => None,
        }
    }

    #[test]
    fn test_var_is_one_hot() {
        let mut ctx = Context::new();
        let x = ctx.int_var("x", 3, 6);
        let mut encoder = Encoder::new();
        let domain = encoder.int(&x.expr());
        assert_eq!(domain.iter().map(|&(v, _)| v).collect::<Vec<_>>(), vec![3, 4, 5, 6]);
        // Re-encoding a fresh node of the same variable reuses the table.
        assert_eq!(encoder.int(&x.expr()), domain);
        assert_eq!(encoder.num_int_vars(), 1);
    }

    #[test]
    fn test_constants_cost_nothing() {
        let mut encoder = Encoder::new();
        let before = encoder.cnf().num_vars;
        let two = IntExpr::constant(2);
        let (lt, eq) = (two.lt(3), two.equals(3));
        assert_eq!(encoder.literal(&lt), encoder.truth);
        assert_eq!(encoder.literal(&eq), !encoder.truth);
        assert_eq!(encoder.cnf().num_vars, before);
    }

    #[test]
    fn test_comparison_memo() {
        let mut ctx = Context::new();
        let x = ctx.int_var("x", 1, 3).expr();
        let y = ctx.int_var("y", 1, 3).expr();
        let mut encoder = Encoder::new();
        let (lt, gt, eq) = (x.lt(&y), y.gt(&x), x.equals(&y));
        let a = encoder.literal(&lt);
        let b = encoder.literal(&gt);
        assert_eq!(a, b);
        assert_ne!(encoder.literal(&eq), a);
    }

    #[test]
    fn test_temporaries_do_not_share_literals() {
        let mut ctx = Context::new();
        let x = ctx.int_var("x", 1, 3).expr();
        let y = ctx.int_var("y", 1, 3).expr();
        let mut encoder = Encoder::new();
        for _ in 0..50 {
            let lt = encoder.literal(&x.lt(&y));
            let eq = encoder.literal(&x.equals(&y));
            assert_ne!(lt, eq);
            assert_eq!(encoder.literal(&BoolExpr::and([x.lt(&y)])), lt);
        }

        let sum = encoder.int(&(x.clone() + IntExpr::constant(1)));
        let diff = encoder.int(&(x.clone() + IntExpr::constant(-1)));
        assert_eq!(sum.iter().map(|&(v, _)| v).collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(diff.iter().map(|&(v, _)| v).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_assert_and_model() {
        let mut ctx = Context::new();
        let x = ctx.int_var("x", 1, 4);
        let y = ctx.int_var("y", 1, 4);
        let mut encoder = Encoder::new();
        let sum = x.expr() + y.expr();
        let formula = BoolExpr::and([sum.equals(7), x.expr().gt(&y.expr())]);
        encoder.assert(&formula);

        let model = solve(&encoder).expect("satisfiable");
        assert_eq!(model.get(&x), Some(4));
        assert_eq!(model.get(&y), Some(3));
        assert_eq!(formula.eval(&model), Some(true));
    }

    #[test]
    fn test_ite_matches_model() {
        let mut ctx = Context::new();
        let x = ctx.int_var("x", 1, 5);
        let y = ctx.int_var("y", 1, 5);
        let max = IntExpr::ite(x.expr().gt(&y.expr()), x.expr(), y.expr());
        let mut encoder = Encoder::new();
        let formula = BoolExpr::and([max.equals(2), x.expr().not_equals(&y.expr())]);
        encoder.assert(&formula);

        let model = solve(&encoder).expect("satisfiable");
        assert_eq!(model.eval(&max), Some(2));
        let (vx, vy) = (model.get(&x).unwrap(), model.get(&y).unwrap());
        assert_eq!(vx.max(vy), 2);
        assert_ne!(vx, vy);
    }

    #[test]
    fn test_distinct_pigeonhole() {
        let mut ctx = Context::new();
        let vars: Vec<IntExpr> = (0..4).map(|i| ctx.int_var(format!("v{i}"), 1, 3).expr()).collect();
        let mut encoder = Encoder::new();
        encoder.assert(&BoolExpr::distinct(vars));
        assert!(solve(&encoder).is_none());
    }

    #[test]
    fn test_nested_distinct_and_or() {
        let mut ctx = Context::new();
        let x = ctx.int_var("x", 1, 2).expr();
        let y = ctx.int_var("y", 1, 2).expr();
        let mut encoder = Encoder::new();
        let formula = BoolExpr::or([
            BoolExpr::and([BoolExpr::distinct([x.clone(), y.clone()]), x.equals(2)]),
            x.equals(5),
        ]);
        encoder.assert(&formula);
        let model = solve(&encoder).expect("satisfiable");
        assert_eq!(model.eval(&x), Some(2));
        assert_eq!(model.eval(&y), Some(1));
    }

    #[test]
    fn test_false_is_unsat() {
        let mut encoder = Encoder::new();
        encoder.assert(&BoolExpr::val(false));
        assert!(solve(&encoder).is_none());
    }
}
