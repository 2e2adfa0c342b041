use std::collections::VecDeque;

use crate::support::micromet::stability::relative_change;

/// Number of past Obukhov lengths kept per element.
const DEPTH: usize = 6;

/// Recent Obukhov lengths of every element, newest first.
///
/// Besides the change since the previous pass, the history detects an
/// iteration that settles into a two- or three-pass cycle.
#[derive(Debug, Clone)]
pub(super) struct History {
    lengths: Vec<VecDeque<f64>>,
}

impl History {
    pub(super) fn new(len: usize) -> Self {
        Self {
            lengths: vec![VecDeque::with_capacity(DEPTH); len],
        }
    }

    /// Records a new Obukhov length for element `i`.
    pub(super) fn push(&mut self, i: usize, l: f64) {
        let queue = &mut self.lengths[i];
        if queue.len() == DEPTH {
            queue.pop_back();
        }
        queue.push_front(l);
    }

    /// Largest relative change between the two newest lengths of element `i`.
    pub(super) fn last_change(&self, i: usize) -> f64 {
        let queue = &self.lengths[i];
        match (queue.front(), queue.get(1)) {
            (Some(&new), Some(&old)) => relative_change(new, old),
            _ => f64::INFINITY,
        }
    }

    /// Returns `true` if element `i` has settled within `tolerance`.
    ///
    /// At least four lengths (the seed and three passes) are needed. Cycles
    /// are only tested once the history is full.
    pub(super) fn has_converged(&self, i: usize, tolerance: f64) -> bool {
        let queue = &self.lengths[i];
        let within = |a: usize, b: usize| relative_change(queue[a], queue[b]) < tolerance;

        if queue.len() < 4 {
            return false;
        }
        if within(0, 1) {
            return true;
        }
        if queue.len() < DEPTH {
            return false;
        }
        let two_cycle = within(0, 2) && within(1, 3);
        let three_cycle = within(0, 3) && within(1, 4) && within(2, 5);
        two_cycle || three_cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_four_lengths() {
        let mut history = History::new(1);
        for l in [f64::INFINITY, -10.0, -10.0] {
            history.push(0, l);
        }
        assert!(!history.has_converged(0, 1e-3));
        history.push(0, -10.0);
        assert!(history.has_converged(0, 1e-3));
    }

    #[test]
    fn detects_two_cycle() {
        let mut history = History::new(1);
        for l in [-5.0, -20.0, -5.0, -20.0, -5.0] {
            history.push(0, l);
        }
        assert!(!history.has_converged(0, 1e-3));
        history.push(0, -20.0);
        assert!(history.has_converged(0, 1e-3));
    }

    #[test]
    fn detects_three_cycle() {
        let mut history = History::new(1);
        for l in [-5.0, -20.0, -40.0, -5.0, -20.0, -40.0] {
            history.push(0, l);
        }
        assert!(history.has_converged(0, 1e-3));
    }

    #[test]
    fn neutral_lengths_have_no_change() {
        let mut history = History::new(1);
        history.push(0, f64::INFINITY);
        history.push(0, f64::INFINITY);
        assert_eq!(history.last_change(0), 0.0);
    }
}
