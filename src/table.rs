//! Transient data structures used by the engine during one decode.
//!
//! A [`Frontier`] holds one score per state for a single layer; the engine
//! keeps two and swaps them. A [`BackpointerTable`] records, for every
//! layer after the first, the best predecessor of each state.

use crate::traits::ScoreSpace;
use crate::utils::first_strict_max;

/// Scores of every state at one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Frontier {
    /// Best path score ending in each state.
    pub scores: Vec<f64>,
}

impl Frontier {
    /// A row where every state has zero probability in space `S`.
    pub fn dead<S: ScoreSpace>(n_states: usize) -> Self {
        Self {
            scores: vec![S::zero(); n_states],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// True if no state carries a positive probability.
    pub fn is_dead<S: ScoreSpace>(&self) -> bool {
        self.scores.iter().all(|&s| !(s > S::zero()))
    }

    /// First state whose score strictly beats every earlier one and zero.
    pub fn best<S: ScoreSpace>(&self) -> Option<(usize, f64)> {
        first_strict_max(self.scores.iter().copied().enumerate(), S::zero())
    }
}

/// Best-predecessor table, `N x (T - 1)`, allocated once.
///
/// Row `t - 1` holds the predecessors chosen at layer `t`. `None` marks a
/// state that no positive-probability path reaches at that layer.
#[derive(Debug, Clone, PartialEq)]
pub struct BackpointerTable {
    n_states: usize,
    cells: Vec<Option<usize>>,
}

impl BackpointerTable {
    /// Table for `n_layers` layers of `n_states` states.
    pub fn new(n_states: usize, n_layers: usize) -> Self {
        let steps = n_layers.saturating_sub(1);
        Self {
            n_states,
            cells: vec![None; n_states * steps],
        }
    }

    /// Number of recorded transitions (layers minus one).
    #[inline]
    pub fn steps(&self) -> usize {
        if self.n_states == 0 {
            0
        } else {
            self.cells.len() / self.n_states
        }
    }

    /// Mutable row for `layer` (`1..T`).
    ///
    /// # Panics
    /// Panics if `layer == 0` or `layer >= T`.
    pub fn layer_mut(&mut self, layer: usize) -> &mut [Option<usize>] {
        assert!(layer >= 1, "layer 0 has no predecessors");
        let start = (layer - 1) * self.n_states;
        &mut self.cells[start..start + self.n_states]
    }

    /// Predecessor of `state` at `layer` (`1..T`).
    #[inline]
    pub fn get(&self, layer: usize, state: usize) -> Option<usize> {
        debug_assert!(layer >= 1);
        self.cells[(layer - 1) * self.n_states + state]
    }

    /// Walk back from `end` at the last layer to layer 0.
    ///
    /// Returns the states in chronological order, or the layer at which
    /// the chain was broken.
    pub fn backtrace(&self, end: usize) -> Result<Vec<usize>, usize> {
        let steps = self.steps();
        let mut path = Vec::with_capacity(steps + 1);
        let mut current = end;
        path.push(current);
        for layer in (1..=steps).rev() {
            current = self.get(layer, current).ok_or(layer)?;
            path.push(current);
        }
        path.reverse();
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{Linear, LogSpace};

    #[test]
    fn single_layer_has_no_steps() {
        let table = BackpointerTable::new(3, 1);
        assert_eq!(table.steps(), 0);
        assert_eq!(table.backtrace(2), Ok(vec![2]));
    }

    #[test]
    fn backtrace_follows_pointers() {
        let mut table = BackpointerTable::new(2, 4);
        table.layer_mut(1).copy_from_slice(&[Some(0), Some(0)]);
        table.layer_mut(2).copy_from_slice(&[Some(1), Some(0)]);
        table.layer_mut(3).copy_from_slice(&[Some(1), Some(1)]);
        assert_eq!(table.steps(), 3);
        assert_eq!(table.backtrace(0), Ok(vec![0, 0, 1, 0]));
        assert_eq!(table.backtrace(1), Ok(vec![0, 0, 1, 1]));
    }

    #[test]
    fn broken_chain_reports_layer() {
        let mut table = BackpointerTable::new(2, 3);
        table.layer_mut(2).copy_from_slice(&[None, Some(0)]);
        assert_eq!(table.backtrace(1), Err(1));
        assert_eq!(table.backtrace(0), Err(2));
    }

    #[test]
    fn frontier_best_is_first_wins() {
        let f = Frontier {
            scores: vec![0.1, 0.4, 0.4, 0.2],
        };
        assert_eq!(f.best::<Linear>(), Some((1, 0.4)));
        assert!(!f.is_dead::<Linear>());
    }

    #[test]
    fn dead_frontiers() {
        assert!(Frontier::dead::<Linear>(3).is_dead::<Linear>());
        assert!(Frontier::dead::<LogSpace>(3).is_dead::<LogSpace>());
        assert_eq!(Frontier::dead::<Linear>(2).best::<Linear>(), None);
    }
}
