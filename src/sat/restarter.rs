#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Luby restart schedule.
//!
//! The solver restarts after `unit * luby(i)` conflicts, where `luby` is the
//! sequence 1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8, ...

/// Restart schedule following the Luby sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Luby {
    unit: u64,
    restarts: u64,
    conflicts_left: u64,
}

impl Luby {
    /// A schedule restarting after `unit * luby(i)` conflicts. A unit of `0` counts as `1`.
    #[must_use]
    pub fn new(unit: u64) -> Self {
        let unit = unit.max(1);
        Self {
            unit,
            restarts: 0,
            conflicts_left: unit * luby(0),
        }
    }

    /// Records one conflict and reports whether the schedule asks for a restart.
    pub fn should_restart(&mut self) -> bool {
        self.conflicts_left = self.conflicts_left.saturating_sub(1);
        if self.conflicts_left > 0 {
            return false;
        }

        self.restarts += 1;
        self.conflicts_left = self.unit * luby(self.restarts);
        true
    }

    /// Restarts requested so far.
    #[must_use]
    pub const fn num_restarts(&self) -> u64 {
        self.restarts
    }
}

/// The `index`-th (0-based) element of the Luby sequence.
#[must_use]
pub fn luby(mut index: u64) -> u64 {
    let mut size = 1_u64;
    let mut seq = 0_u32;
    while size < index + 1 {
        seq += 1;
        size = 2 * size + 1;
    }
    while size - 1 != index {
        size = (size - 1) >> 1;
        seq -= 1;
        index %= size;
    }
    1 << seq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luby_sequence() {
        let seq: Vec<u64> = (0..15).map(luby).collect();
        assert_eq!(seq, vec![1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8]);
    }

    #[test]
    fn test_restart_intervals() {
        let mut luby = Luby::new(2);
        let mut restarts_at = Vec::new();
        for conflict in 1..=12 {
            if luby.should_restart() {
                restarts_at.push(conflict);
            }
        }
        // intervals 2, 2, 4, 2, 2
        assert_eq!(restarts_at, vec![2, 4, 8, 10, 12]);
        assert_eq!(luby.num_restarts(), 5);
    }
}
