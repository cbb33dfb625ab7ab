//! Core trait definitions for layered max-product decoding.
//!
//! To run a recurrence through [`TrellisEngine`](crate::engine::TrellisEngine),
//! implement [`Trellis`] for a struct that captures your instance (model,
//! observations, prior).
//!
//! The engine owns the four classical phases:
//! - Initialization: one score per state at layer 0.
//! - Recurrence: `score(s, t) = max_k score(k, t-1) * emit(t, s) * trans(k, s)`.
//! - Termination: pick the best state at the last layer.
//! - Backtrace: follow backpointers back to layer 0.
//!
//! Implementations only answer weight queries. Weights are plain
//! probabilities; the engine lifts them into its [`ScoreSpace`].

use crate::error::DecodeError;

/// A fixed layered decoding instance.
///
/// Semantics:
/// - There are `T = num_layers()` layers and `N = num_states()` states per layer.
/// - Every state at layer `t` may be reached from every state at layer `t-1`.
/// - Weight queries may fail when the instance is incomplete; the engine
///   propagates the error unchanged.
pub trait Trellis {
    /// Number of layers `T` (observation length).
    fn num_layers(&self) -> usize;

    /// Number of states `N` in every layer.
    fn num_states(&self) -> usize;

    /// Probability of starting in `state`.
    fn initial_weight(&self, state: usize) -> Result<f64, DecodeError>;

    /// Probability that `state` produces the observation at `layer`.
    fn emission_weight(&self, layer: usize, state: usize) -> Result<f64, DecodeError>;

    /// Probability of `from -> to`.
    ///
    /// `layer` is the destination layer and is only used for error context.
    fn transition_weight(&self, layer: usize, from: usize, to: usize)
        -> Result<f64, DecodeError>;
}

/// Numeric representation of path scores.
///
/// The engine never compares scores against anything but each other and
/// [`zero`](ScoreSpace::zero), so any strictly monotone image of the
/// probabilities yields the same path and tie-breaking.
pub trait ScoreSpace: Copy + Default + Send + Sync + 'static {
    /// Name used in logs.
    const NAME: &'static str;

    /// Score of a zero-probability path.
    fn zero() -> f64;

    /// Map a probability into this space.
    fn lift(p: f64) -> f64;

    /// Combine a path score with one more factor.
    fn extend(score: f64, factor: f64) -> f64;

    /// Map a score back to a probability.
    fn to_probability(score: f64) -> f64;

    /// Map a score to a natural-log probability.
    fn to_log_probability(score: f64) -> f64;
}

/// Plain probability products. The default score space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Linear;

/// Sums of natural-log probabilities; `-inf` is zero probability.
///
/// Avoids underflow on long sequences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogSpace;

impl ScoreSpace for Linear {
    const NAME: &'static str = "linear";

    #[inline]
    fn zero() -> f64 {
        0.0
    }

    #[inline]
    fn lift(p: f64) -> f64 {
        p
    }

    #[inline]
    fn extend(score: f64, factor: f64) -> f64 {
        score * factor
    }

    #[inline]
    fn to_probability(score: f64) -> f64 {
        score
    }

    #[inline]
    fn to_log_probability(score: f64) -> f64 {
        score.ln()
    }
}

impl ScoreSpace for LogSpace {
    const NAME: &'static str = "log";

    #[inline]
    fn zero() -> f64 {
        f64::NEG_INFINITY
    }

    #[inline]
    fn lift(p: f64) -> f64 {
        p.ln()
    }

    #[inline]
    fn extend(score: f64, factor: f64) -> f64 {
        score + factor
    }

    #[inline]
    fn to_probability(score: f64) -> f64 {
        score.exp()
    }

    #[inline]
    fn to_log_probability(score: f64) -> f64 {
        score
    }
}
