#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! VSIDS decision heuristic.
//!
//! Activities live in a dense vector; a binary heap keyed on the activity at
//! push time yields candidates lazily. Entries whose key no longer matches
//! the current activity, or whose variable is already assigned, are skipped
//! when popped.

use crate::sat::literal::Variable;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

const RESCALE_LIMIT: f64 = 1e100;

/// Variable State Independent Decaying Sum activity scores.
#[derive(Debug, Clone, Default)]
pub struct Vsids {
    activity: Vec<f64>,
    increment: f64,
    decay: f64,
    heap: BinaryHeap<(OrderedFloat<f64>, Reverse<Variable>)>,
}

impl Vsids {
    /// Creates the heuristic for variables `1..=num_vars` with the given decay factor.
    #[must_use]
    pub fn new(num_vars: usize, decay: f64) -> Self {
        let mut vsids = Self {
            activity: vec![0.0; num_vars + 1],
            increment: 1.0,
            decay,
            heap: BinaryHeap::with_capacity(num_vars),
        };
        vsids.rebuild();
        vsids
    }

    /// The current activity of `var`.
    #[must_use]
    pub fn activity(&self, var: Variable) -> f64 {
        self.activity[var as usize]
    }

    /// Raises the activity of `var`, rescaling all activities when they grow too large.
    pub fn bump(&mut self, var: Variable) {
        self.activity[var as usize] += self.increment;

        if self.activity[var as usize] > RESCALE_LIMIT {
            for value in &mut self.activity {
                *value /= RESCALE_LIMIT;
            }
            self.increment /= RESCALE_LIMIT;
            self.rebuild();
        } else {
            self.insert(var);
        }

        if self.heap.len() > 4 * self.activity.len() + 64 {
            self.rebuild();
        }
    }

    /// Grows the bump increment, which decays every earlier bump relative to future ones.
    pub fn decay(&mut self) {
        self.increment /= self.decay;
    }

    /// Makes `var` available for selection again after it was unassigned.
    pub fn insert(&mut self, var: Variable) {
        self.heap
            .push((OrderedFloat(self.activity[var as usize]), Reverse(var)));
    }

    /// Pops the most active variable for which `is_unassigned` holds.
    pub fn pick(&mut self, is_unassigned: impl Fn(Variable) -> bool) -> Option<Variable> {
        while let Some((OrderedFloat(key), Reverse(var))) = self.heap.pop() {
            if key.to_bits() == self.activity[var as usize].to_bits() && is_unassigned(var) {
                return Some(var);
            }
        }
        None
    }

    fn rebuild(&mut self) {
        self.heap = (1..self.activity.len())
            .map(|var| {
                #[allow(clippy::cast_possible_truncation)]
                let var = var as Variable;
                (OrderedFloat(self.activity[var as usize]), Reverse(var))
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_prefers_bumped_variable() {
        let mut vsids = Vsids::new(4, 0.95);
        vsids.bump(3);
        vsids.bump(3);
        vsids.bump(2);
        assert_eq!(vsids.pick(|_| true), Some(3));
        assert_eq!(vsids.pick(|_| true), Some(2));
    }

    #[test]
    fn test_pick_skips_assigned() {
        let mut vsids = Vsids::new(3, 0.95);
        vsids.bump(1);
        assert_eq!(vsids.pick(|var| var != 1), Some(2));
    }

    #[test]
    fn test_pick_exhausts() {
        let mut vsids = Vsids::new(2, 0.95);
        assert!(vsids.pick(|_| false).is_none());
        vsids.insert(2);
        assert_eq!(vsids.pick(|_| true), Some(2));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut vsids = Vsids::new(3, 0.95);
        vsids.bump(2);
        let mut copy = vsids.clone();
        assert_eq!(copy.pick(|_| true), Some(2));
        vsids.bump(3);
        vsids.bump(3);
        assert_eq!(vsids.pick(|_| true), Some(3));
        assert_eq!(copy.pick(|var| var != 2), Some(1));
    }

    #[test]
    fn test_decay_raises_increment() {
        let mut vsids = Vsids::new(2, 0.5);
        vsids.bump(1);
        vsids.decay();
        vsids.bump(2);
        assert!(vsids.activity(2) > vsids.activity(1));
    }
}
