#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Integer terms and boolean formulas over finite-domain integer variables.
//!
//! Both term types are immutable DAGs behind [`Rc`]. Cloning a term clones a
//! pointer, so a fold that mentions the same sub-term twice shares it instead
//! of copying it. Terms render as SMT-LIB2 s-expressions.

use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Not};
use std::rc::Rc;

/// An integer unknown with a declared inclusive domain `[lo, hi]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntVar {
    id: usize,
    name: Rc<str>,
    lo: i32,
    hi: i32,
}

impl IntVar {
    /// Index of the variable within the [`Context`] that created it.
    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }

    /// The name used in the SMT-LIB script.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Smallest value of the domain.
    #[must_use]
    pub const fn lo(&self) -> i32 {
        self.lo
    }

    /// Largest value of the domain.
    #[must_use]
    pub const fn hi(&self) -> i32 {
        self.hi
    }

    /// The variable as a term.
    #[must_use]
    pub fn expr(&self) -> IntExpr {
        IntExpr(Rc::new(IntNode::Var(self.clone())))
    }
}

/// Mints the variables of one formula. Each solve uses its own context.
#[derive(Debug, Clone, Default)]
pub struct Context {
    vars: Vec<IntVar>,
}

impl Context {
    /// An empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a fresh integer variable ranging over `lo..=hi`.
    pub fn int_var(&mut self, name: impl Into<Rc<str>>, lo: i32, hi: i32) -> IntVar {
        let var = IntVar {
            id: self.vars.len(),
            name: name.into(),
            lo,
            hi,
        };
        self.vars.push(var.clone());
        var
    }

    /// Every variable declared so far, in declaration order.
    #[must_use]
    pub fn vars(&self) -> &[IntVar] {
        &self.vars
    }
}

/// SMT-LIB declarations of every variable in the context.
impl Display for Context {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for var in &self.vars {
            writeln!(f, "(declare-const {} Int)", var.name)?;
        }
        Ok(())
    }
}

/// Comparison operators between integer terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CmpOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `=`
    Eq,
    /// `distinct`, for two operands.
    Ne,
    /// `>=`
    Ge,
    /// `>`
    Gt,
}

impl CmpOp {
    /// Whether `a op b` holds for concrete values.
    #[must_use]
    pub const fn holds(self, a: i32, b: i32) -> bool {
        match self {
            Self::Lt => a < b,
            Self::Le => a <= b,
            Self::Eq => a == b,
            Self::Ne => a != b,
            Self::Ge => a >= b,
            Self::Gt => a > b,
        }
    }

    /// The operator `op'` with `a op b == b op' a`.
    #[must_use]
    pub const fn swapped(self) -> Self {
        match self {
            Self::Lt => Self::Gt,
            Self::Le => Self::Ge,
            Self::Ge => Self::Le,
            Self::Gt => Self::Lt,
            Self::Eq | Self::Ne => self,
        }
    }

    /// The SMT-LIB operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "=",
            Self::Ne => "distinct",
            Self::Ge => ">=",
            Self::Gt => ">",
        }
    }
}

/// The node of an [`IntExpr`].
#[derive(Debug, Clone, PartialEq)]
pub enum IntNode {
    /// A constant.
    Const(i32),
    /// A variable.
    Var(IntVar),
    /// The sum of two terms.
    Add(IntExpr, IntExpr),
    /// `if cond then a else b`.
    Ite(BoolExpr, IntExpr, IntExpr),
}

/// The node of a [`BoolExpr`].
#[derive(Debug, Clone, PartialEq)]
pub enum BoolNode {
    /// A constant.
    Val(bool),
    /// Negation.
    Not(BoolExpr),
    /// Conjunction of all operands.
    And(Vec<BoolExpr>),
    /// Disjunction of all operands.
    Or(Vec<BoolExpr>),
    /// Comparison of two integer terms.
    Cmp(CmpOp, IntExpr, IntExpr),
    /// Pairwise distinctness of all operands.
    Distinct(Vec<IntExpr>),
}

/// An integer-valued term.
#[derive(Debug, Clone)]
pub struct IntExpr(Rc<IntNode>);

/// A boolean formula.
#[derive(Debug, Clone)]
pub struct BoolExpr(Rc<BoolNode>);

impl IntExpr {
    /// The constant `value`.
    #[must_use]
    pub fn constant(value: i32) -> Self {
        Self(Rc::new(IntNode::Const(value)))
    }

    /// `then` if `cond` holds, else `otherwise`.
    #[must_use]
    pub fn ite(cond: BoolExpr, then: Self, otherwise: Self) -> Self {
        Self(Rc::new(IntNode::Ite(cond, then, otherwise)))
    }

    /// The root node.
    #[must_use]
    pub fn node(&self) -> &IntNode {
        &self.0
    }

    /// Identity of the shared node. Two clones of one term have the same pointer.
    #[must_use]
    pub fn as_ptr(&self) -> *const IntNode {
        Rc::as_ptr(&self.0)
    }

    fn compare(&self, op: CmpOp, other: impl Into<Self>) -> BoolExpr {
        BoolExpr(Rc::new(BoolNode::Cmp(op, self.clone(), other.into())))
    }

    /// `self < other`
    #[must_use]
    pub fn lt(&self, other: impl Into<Self>) -> BoolExpr {
        self.compare(CmpOp::Lt, other)
    }

    /// `self <= other`
    #[must_use]
    pub fn le(&self, other: impl Into<Self>) -> BoolExpr {
        self.compare(CmpOp::Le, other)
    }

    /// `self > other`
    #[must_use]
    pub fn gt(&self, other: impl Into<Self>) -> BoolExpr {
        self.compare(CmpOp::Gt, other)
    }

    /// `self >= other`
    #[must_use]
    pub fn ge(&self, other: impl Into<Self>) -> BoolExpr {
        self.compare(CmpOp::Ge, other)
    }

    /// `self = other`
    #[must_use]
    pub fn equals(&self, other: impl Into<Self>) -> BoolExpr {
        self.compare(CmpOp::Eq, other)
    }

    /// `self != other`
    #[must_use]
    pub fn not_equals(&self, other: impl Into<Self>) -> BoolExpr {
        self.compare(CmpOp::Ne, other)
    }

    /// Value of the term, or `None` if it mentions an unassigned variable.
    pub fn eval<V: Valuation + ?Sized>(&self, valuation: &V) -> Option<i32> {
        Evaluator::new(valuation).int(self)
    }
}

impl BoolExpr {
    /// The constant `value`.
    #[must_use]
    pub fn val(value: bool) -> Self {
        Self(Rc::new(BoolNode::Val(value)))
    }

    /// Conjunction. An empty conjunction is `true`, a single operand is returned as is.
    pub fn and(operands: impl IntoIterator<Item = Self>) -> Self {
        let mut operands: Vec<Self> = operands.into_iter().collect();
        match operands.len() {
            0 => Self::val(true),
            1 => operands.swap_remove(0),
            _ => Self(Rc::new(BoolNode::And(operands))),
        }
    }

    /// Disjunction. An empty disjunction is `false`, a single operand is returned as is.
    pub fn or(operands: impl IntoIterator<Item = Self>) -> Self {
        let mut operands: Vec<Self> = operands.into_iter().collect();
        match operands.len() {
            0 => Self::val(false),
            1 => operands.swap_remove(0),
            _ => Self(Rc::new(BoolNode::Or(operands))),
        }
    }

    /// Pairwise distinctness. Fewer than two operands give `true`.
    pub fn distinct(operands: impl IntoIterator<Item = IntExpr>) -> Self {
        let operands: Vec<IntExpr> = operands.into_iter().collect();
        if operands.len() < 2 {
            return Self::val(true);
        }
        Self(Rc::new(BoolNode::Distinct(operands)))
    }

    /// The root node.
    #[must_use]
    pub fn node(&self) -> &BoolNode {
        &self.0
    }

    /// Identity of the shared node. Two clones of one formula have the same pointer.
    #[must_use]
    pub fn as_ptr(&self) -> *const BoolNode {
        Rc::as_ptr(&self.0)
    }

    /// Truth value of the formula, or `None` if it mentions an unassigned variable.
    pub fn eval<V: Valuation + ?Sized>(&self, valuation: &V) -> Option<bool> {
        Evaluator::new(valuation).bool(self)
    }
}

impl PartialEq for IntExpr {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl PartialEq for BoolExpr {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl From<i32> for IntExpr {
    fn from(value: i32) -> Self {
        Self::constant(value)
    }
}

impl From<&IntExpr> for IntExpr {
    fn from(expr: &IntExpr) -> Self {
        expr.clone()
    }
}

impl From<&IntVar> for IntExpr {
    fn from(var: &IntVar) -> Self {
        var.expr()
    }
}

impl Add for IntExpr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(Rc::new(IntNode::Add(self, rhs)))
    }
}

impl Not for BoolExpr {
    type Output = Self;

    fn not(self) -> Self {
        match self.node() {
            BoolNode::Val(value) => Self::val(!value),
            _ => Self(Rc::new(BoolNode::Not(self))),
        }
    }
}

impl Display for IntExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.node() {
            IntNode::Const(value) if *value < 0 => write!(f, "(- {})", value.unsigned_abs()),
            IntNode::Const(value) => write!(f, "{value}"),
            IntNode::Var(var) => write!(f, "{}", var.name),
            IntNode::Add(a, b) => write!(f, "(+ {a} {b})"),
            IntNode::Ite(cond, a, b) => write!(f, "(ite {cond} {a} {b})"),
        }
    }
}

impl Display for BoolExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.node() {
            BoolNode::Val(value) => write!(f, "{value}"),
            BoolNode::Not(e) => write!(f, "(not {e})"),
            BoolNode::And(es) => write!(f, "(and {})", es.iter().join(" ")),
            BoolNode::Or(es) => write!(f, "(or {})", es.iter().join(" ")),
            BoolNode::Cmp(op, a, b) => write!(f, "({} {a} {b})", op.symbol()),
            BoolNode::Distinct(es) => write!(f, "(distinct {})", es.iter().join(" ")),
        }
    }
}

/// An assignment of concrete values to integer variables.
pub trait Valuation {
    /// The value of `var`, or `None` if it has none.
    fn value(&self, var: &IntVar) -> Option<i32>;
}

/// Evaluates terms with a cache keyed by node identity, so shared sub-terms
/// are computed once.
struct Evaluator<'a, V: ?Sized> {
    valuation: &'a V,
    ints: FxHashMap<*const IntNode, Option<i32>>,
}

impl<'a, V: Valuation + ?Sized> Evaluator<'a, V> {
    fn new(valuation: &'a V) -> Self {
        Self {
            valuation,
            ints: FxHashMap::default(),
        }
    }

    fn int(&mut self, expr: &IntExpr) -> Option<i32> {
        if let Some(&value) = self.ints.get(&expr.as_ptr()) {
            return value;
        }

        let value = match expr.node() {
            IntNode::Const(value) => Some(*value),
            IntNode::Var(var) => self.valuation.value(var),
            IntNode::Add(a, b) => match (self.int(a), self.int(b)) {
                (Some(a), Some(b)) => a.checked_add(b),
                _ => None,
            },
            IntNode::Ite(cond, a, b) => match self.bool(cond) {
                Some(true) => self.int(a),
                Some(false) => self.int(b),
                None => None,
            },
        };

        self.ints.insert(expr.as_ptr(), value);
        value
    }

    fn bool(&mut self, expr: &BoolExpr) -> Option<bool> {
        match expr.node() {
            BoolNode::Val(value) => Some(*value),
            BoolNode::Not(e) => self.bool(e).map(|value| !value),
            BoolNode::And(es) => es
                .iter()
                .try_fold(true, |acc, e| Some(self.bool(e)? && acc)),
            BoolNode::Or(es) => es
                .iter()
                .try_fold(false, |acc, e| Some(self.bool(e)? || acc)),
            BoolNode::Cmp(op, a, b) => Some(op.holds(self.int(a)?, self.int(b)?)),
            BoolNode::Distinct(es) => {
                let values = es
                    .iter()
                    .map(|e| self.int(e))
                    .collect::<Option<Vec<_>>>()?;
                Some(values.iter().all_unique())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<i32>);

    impl Valuation for Fixed {
        fn value(&self, var: &IntVar) -> Option<i32> {
            self.0.get(var.id()).copied()
        }
    }

    #[test]
    fn test_context_ids() {
        let mut ctx = Context::new();
        let x = ctx.int_var("x", 1, 3);
        let y = ctx.int_var("y", 0, 9);
        assert_eq!(x.id(), 0);
        assert_eq!(y.id(), 1);
        assert_eq!(ctx.vars().len(), 2);
        assert_eq!(
            ctx.to_string(),
            "(declare-const x Int)\n(declare-const y Int)\n"
        );
    }

    #[test]
    fn test_display() {
        let mut ctx = Context::new();
        let x = ctx.int_var("x", 1, 3).expr();
        let y = ctx.int_var("y", 1, 3).expr();
        let e = IntExpr::ite(x.gt(&y), x.clone(), y.clone()) + IntExpr::constant(-2);
        assert_eq!(e.to_string(), "(+ (ite (> x y) x y) (- 2))");
        assert_eq!(x.not_equals(&y).to_string(), "(distinct x y)");
        assert_eq!(
            BoolExpr::and([x.le(3), !y.equals(1)]).to_string(),
            "(and (<= x 3) (not (= y 1)))"
        );
    }

    #[test]
    fn test_and_or_degenerate() {
        assert_eq!(BoolExpr::and([]), BoolExpr::val(true));
        assert_eq!(BoolExpr::or([]), BoolExpr::val(false));
        assert_eq!(!BoolExpr::val(true), BoolExpr::val(false));
        assert_eq!(BoolExpr::distinct([IntExpr::constant(1)]), BoolExpr::val(true));
    }

    #[test]
    fn test_eval() {
        let mut ctx = Context::new();
        let x = ctx.int_var("x", 1, 3).expr();
        let y = ctx.int_var("y", 1, 3).expr();
        let max = IntExpr::ite(x.gt(&y), x.clone(), y.clone());

        let valuation = Fixed(vec![2, 3]);
        assert_eq!(max.eval(&valuation), Some(3));
        assert_eq!((x.clone() + max).eval(&valuation), Some(5));
        assert_eq!(BoolExpr::distinct([x.clone(), y.clone()]).eval(&valuation), Some(true));
        assert_eq!(BoolExpr::or([x.equals(1), y.ge(3)]).eval(&valuation), Some(true));
        assert_eq!(x.lt(&y).eval(&Fixed(vec![2])), None);
    }

    #[test]
    fn test_swapped() {
        for op in [CmpOp::Lt, CmpOp::Le, CmpOp::Eq, CmpOp::Ne, CmpOp::Ge, CmpOp::Gt] {
            for a in 0..3 {
                for b in 0..3 {
                    assert_eq!(op.holds(a, b), op.swapped().holds(b, a));
                }
            }
        }
    }
}
