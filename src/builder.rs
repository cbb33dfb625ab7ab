//! Builder for configuring a [`ViterbiDecoder`].

use crate::model::Prior;
use crate::traits::{Linear, LogSpace, ScoreSpace};
use crate::utils::DEFAULT_PARALLEL_MIN_STATES;
use crate::viterbi::ViterbiDecoder;
use std::marker::PhantomData;

/// Configures a [`ViterbiDecoder`].
///
/// ```
/// use viterbi_dp::{DecoderBuilder, Prior};
///
/// let decoder = DecoderBuilder::new()
///     .prior(Prior::Uniform)
///     .log_space()
///     .build();
/// assert_eq!(decoder.prior(), &Prior::Uniform);
/// ```
#[derive(Clone, Debug)]
pub struct DecoderBuilder<S = Linear> {
    prior: Prior,
    parallel_min_states: Option<usize>,
    _space: PhantomData<S>,
}

impl Default for DecoderBuilder<Linear> {
    fn default() -> Self {
        Self::new()
    }
}

impl DecoderBuilder<Linear> {
    pub fn new() -> Self {
        Self {
            prior: Prior::default(),
            parallel_min_states: None,
            _space: PhantomData,
        }
    }
}

impl<S: ScoreSpace> DecoderBuilder<S> {
    pub fn prior(mut self, prior: Prior) -> Self {
        self.prior = prior;
        self
    }

    pub fn with_parallel_min_states(mut self, min_states: usize) -> Self {
        self.parallel_min_states = Some(min_states);
        self
    }

    /// Switch the score representation.
    pub fn score_space<T: ScoreSpace>(self) -> DecoderBuilder<T> {
        DecoderBuilder {
            prior: self.prior,
            parallel_min_states: self.parallel_min_states,
            _space: PhantomData,
        }
    }

    /// Accumulate log-probabilities instead of probabilities.
    pub fn log_space(self) -> DecoderBuilder<LogSpace> {
        self.score_space::<LogSpace>()
    }

    /// # Panics
    /// Panics if the parallel threshold was set to zero.
    pub fn build(self) -> ViterbiDecoder<S> {
        let min_states = self
            .parallel_min_states
            .unwrap_or(DEFAULT_PARALLEL_MIN_STATES);
        assert!(min_states > 0, "parallel_min_states must be positive");
        ViterbiDecoder::from_parts(self.prior, min_states)
    }
}
