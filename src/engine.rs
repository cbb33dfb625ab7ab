//! Generic max-product trellis engine.
//!
//! This module implements the four Viterbi phases over any [`Trellis`]:
//! 1. Initialization of the layer-0 frontier.
//! 2. A forward sweep that keeps only the previous and current frontier
//!    and fills a preallocated [`BackpointerTable`].
//! 3. Termination: the first state with the strictly highest final score.
//! 4. A backtrace over the backpointer table.
//!
//! The engine is generic over the problem and over the [`ScoreSpace`].

use crate::error::DecodeError;
use crate::table::{BackpointerTable, Frontier};
use crate::traits::{Linear, ScoreSpace, Trellis};
use crate::utils::{first_strict_max, DEFAULT_PARALLEL_MIN_STATES};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::marker::PhantomData;

/// Result of a successful run: state indices per layer and the best score.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// One state index per layer, in chronological order.
    pub states: Vec<usize>,
    /// Score of the best path, in the engine's score space.
    pub score: f64,
}

/// Max-product decoding engine for a given problem instance `P`.
///
/// Typical usage goes through [`ViterbiDecoder`](crate::ViterbiDecoder),
/// which wraps an HMM in a [`Trellis`] and runs this engine.
pub struct TrellisEngine<P, S = Linear> {
    problem: P,
    parallel_min_states: usize,
    _space: PhantomData<S>,
}

impl<P: Trellis, S: ScoreSpace> TrellisEngine<P, S> {
    /// Create a new engine with the default parallel threshold.
    pub fn new(problem: P) -> Self {
        Self::with_parallel_min_states(problem, DEFAULT_PARALLEL_MIN_STATES)
    }

    /// Create a new engine that relaxes layers in parallel once a layer has
    /// at least `min_states` states. Only consulted with the `parallel`
    /// feature.
    ///
    /// # Panics
    /// Panics if `min_states == 0`.
    pub fn with_parallel_min_states(problem: P, min_states: usize) -> Self {
        assert!(min_states > 0, "parallel_min_states must be positive");
        Self {
            problem,
            parallel_min_states: min_states,
            _space: PhantomData,
        }
    }

    /// Expose immutable reference to the underlying problem.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Return the configured parallel threshold.
    pub fn parallel_min_states(&self) -> usize {
        self.parallel_min_states
    }

    /// Run initialization, recurrence, termination and backtrace.
    ///
    /// # Errors
    /// - [`DecodeError::EmptyInput`] if the problem has no layers.
    /// - Any error returned by the problem's weight queries.
    /// - [`DecodeError::NoPath`] if every final score is zero; `step` is the
    ///   first layer at which every state had zero probability.
    pub fn run(&self) -> Result<Decoded, DecodeError> {
        let t = self.problem.num_layers();
        let n = self.problem.num_states();

        #[cfg(feature = "tracing")]
        let span = tracing::debug_span!("trellis_run", layers = t, states = n, space = S::NAME);
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        if t == 0 {
            return Err(DecodeError::EmptyInput);
        }

        let mut prev = self.init_frontier()?;
        let mut dead_since = prev.is_dead::<S>().then_some(0);
        let mut next = Frontier::dead::<S>(n);
        let mut backpointers = BackpointerTable::new(n, t);
        let transitions = if t > 1 {
            self.lift_transitions()?
        } else {
            Vec::new()
        };
        let mut emissions = vec![S::zero(); n];

        for layer in 1..t {
            for (state, e) in emissions.iter_mut().enumerate() {
                *e = S::lift(self.problem.emission_weight(layer, state)?);
            }
            relax_layer::<S>(
                &prev,
                &emissions,
                &transitions,
                &mut next,
                backpointers.layer_mut(layer),
                self.parallel_min_states,
            );
            std::mem::swap(&mut prev, &mut next);

            if dead_since.is_none() && prev.is_dead::<S>() {
                #[cfg(feature = "tracing")]
                tracing::debug!(layer, "every state has zero probability");
                dead_since = Some(layer);
            }
        }

        let (end, score) = prev.best::<S>().ok_or(DecodeError::NoPath {
            step: dead_since.unwrap_or(t - 1),
        })?;
        let states = backpointers
            .backtrace(end)
            .map_err(|step| DecodeError::NoPath { step })?;

        #[cfg(feature = "tracing")]
        tracing::debug!(end_state = end, score, "backtrace complete");

        Ok(Decoded { states, score })
    }

    fn init_frontier(&self) -> Result<Frontier, DecodeError> {
        let scores = (0..self.problem.num_states())
            .map(|state| {
                let emit = self.problem.emission_weight(0, state)?;
                let prior = self.problem.initial_weight(state)?;
                Ok(S::extend(S::lift(emit), S::lift(prior)))
            })
            .collect::<Result<Vec<_>, DecodeError>>()?;
        Ok(Frontier { scores })
    }

    /// Row-major `N x N` table of lifted transition weights, `[from * N + to]`.
    fn lift_transitions(&self) -> Result<Vec<f64>, DecodeError> {
        let n = self.problem.num_states();
        let mut out = Vec::with_capacity(n * n);
        for from in 0..n {
            for to in 0..n {
                out.push(S::lift(self.problem.transition_weight(1, from, to)?));
            }
        }
        Ok(out)
    }
}

/// Best predecessor of `to` given the previous frontier.
///
/// Sources are scanned in index order and only a strictly greater candidate
/// replaces the running maximum, which starts at zero probability.
#[inline]
fn relax<S: ScoreSpace>(
    prev: &[f64],
    emission: f64,
    transitions: &[f64],
    to: usize,
) -> (f64, Option<usize>) {
    let n = prev.len();
    let candidates = prev.iter().enumerate().map(|(from, &score)| {
        (
            from,
            S::extend(S::extend(score, emission), transitions[from * n + to]),
        )
    });
    match first_strict_max(candidates, S::zero()) {
        Some((from, best)) => (best, Some(from)),
        None => (S::zero(), None),
    }
}

fn relax_sequential<S: ScoreSpace>(
    prev: &Frontier,
    emissions: &[f64],
    transitions: &[f64],
    next: &mut Frontier,
    row: &mut [Option<usize>],
) {
    for (to, (score, bp)) in next.scores.iter_mut().zip(row.iter_mut()).enumerate() {
        (*score, *bp) = relax::<S>(&prev.scores, emissions[to], transitions, to);
    }
}

#[cfg(feature = "parallel")]
fn relax_layer<S: ScoreSpace>(
    prev: &Frontier,
    emissions: &[f64],
    transitions: &[f64],
    next: &mut Frontier,
    row: &mut [Option<usize>],
    parallel_min_states: usize,
) {
    if prev.len() < parallel_min_states {
        relax_sequential::<S>(prev, emissions, transitions, next, row);
        return;
    }
    next.scores
        .par_iter_mut()
        .zip(row.par_iter_mut())
        .enumerate()
        .for_each(|(to, (score, bp))| {
            (*score, *bp) = relax::<S>(&prev.scores, emissions[to], transitions, to);
        });
}

#[cfg(not(feature = "parallel"))]
fn relax_layer<S: ScoreSpace>(
    prev: &Frontier,
    emissions: &[f64],
    transitions: &[f64],
    next: &mut Frontier,
    row: &mut [Option<usize>],
    _parallel_min_states: usize,
) {
    relax_sequential::<S>(prev, emissions, transitions, next, row);
}
