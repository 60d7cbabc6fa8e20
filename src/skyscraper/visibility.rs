#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Formulas for the number of buildings visible along a line.
//!
//! An element is visible when it is strictly taller than everything before
//! it, so the first element is always visible.

use crate::smt::term::{BoolExpr, IntExpr};

/// An integer term equal to the number of visible elements of `line`.
///
/// A left fold carrying the running maximum and the running count; each step
/// adds one `ite` to both. The comparison of a step is shared between them.
#[must_use]
pub fn arithmetic_visible_count(line: &[IntExpr]) -> IntExpr {
    let Some((first, rest)) = line.split_first() else {
        return IntExpr::constant(0);
    };

    let mut max = first.clone();
    let mut count = IntExpr::constant(1);

    for x in rest {
        let taller = x.gt(&max);
        count = count + IntExpr::ite(taller.clone(), 1.into(), 0.into());
        max = IntExpr::ite(taller, x.clone(), max);
    }

    count
}

/// A formula that holds iff exactly `n` elements of `line` are visible.
///
/// Case split on the position `i` of the second visible element: everything
/// strictly between the first element and `i` is shorter than the first, the
/// element at `i` is taller, and the suffix starting at `i` has exactly
/// `n - 1` visible elements. Positions too close to the end to leave room for
/// `n - 1` visible elements are skipped. No counter terms are introduced.
#[must_use]
pub fn exactly_n_visible(n: usize, line: &[IntExpr]) -> BoolExpr {
    let len = line.len();
    if n < 1 || n > len {
        return BoolExpr::val(false);
    }
    if len == 1 {
        return BoolExpr::val(n == 1);
    }

    let first = &line[0];
    if n == 1 {
        return BoolExpr::and(line[1..].iter().map(|x| x.lt(first)));
    }

    BoolExpr::or((1..=len + 1 - n).map(|i| {
        let hidden = line[1..i].iter().map(|x| first.gt(x));
        BoolExpr::and(hidden.chain([
            first.lt(&line[i]),
            exactly_n_visible(n - 1, &line[i..]),
        ]))
    }))
}
