//! Viterbi decoding of discrete hidden Markov models.
//!
//! [`ViterbiDecoder`] adapts an [`Hmm`] and an observation sequence into a
//! [`Trellis`] and runs the generic [`TrellisEngine`] over it.

use crate::builder::DecoderBuilder;
use crate::engine::TrellisEngine;
use crate::error::{DecodeError, Result};
use crate::labels::{StateId, StateSet, SymbolId};
use crate::model::{Hmm, Model, ObservationSequence, Prior};
use crate::traits::{Linear, ScoreSpace, Trellis};
use crate::utils::DEFAULT_PARALLEL_MIN_STATES;
use std::marker::PhantomData;

/// Finds the single most probable hidden-state path for an observation
/// sequence.
///
/// A decoder holds only configuration; it is cheap to clone and can be
/// shared across threads. Each call allocates its own tables.
#[derive(Clone, Debug)]
pub struct ViterbiDecoder<S = Linear> {
    prior: Prior,
    parallel_min_states: usize,
    _space: PhantomData<S>,
}

impl ViterbiDecoder<Linear> {
    /// Linear-space decoder with the default `Fixed(0.5)` prior.
    pub fn new() -> Self {
        DecoderBuilder::new().build()
    }

    pub fn builder() -> DecoderBuilder<Linear> {
        DecoderBuilder::new()
    }
}

impl<S: ScoreSpace> ViterbiDecoder<S> {
    pub(crate) fn from_parts(prior: Prior, parallel_min_states: usize) -> Self {
        Self {
            prior,
            parallel_min_states,
            _space: PhantomData,
        }
    }

    pub fn prior(&self) -> &Prior {
        &self.prior
    }

    /// Decode the observation sequence bundled in `model`.
    pub fn decode(&self, model: &Model) -> Result<DecodedPath> {
        self.decode_observations(model.hmm(), model.observations())
    }

    /// Decode `observations` under `hmm`.
    ///
    /// # Errors
    /// - [`DecodeError::EmptyInput`] for an empty sequence.
    /// - [`DecodeError::Model`] for a foreign symbol, a bad prior, or a
    ///   transition/emission entry the sweep needs but the model lacks.
    /// - [`DecodeError::NoPath`] if every path has zero probability.
    pub fn decode_observations(
        &self,
        hmm: &Hmm,
        observations: &ObservationSequence,
    ) -> Result<DecodedPath> {
        if observations.is_empty() {
            return Err(DecodeError::EmptyInput);
        }
        for symbol in observations.iter() {
            hmm.alphabet().check(symbol)?;
        }
        let prior = self.prior.resolve(hmm.states().len())?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            states = hmm.states().len(),
            symbols = hmm.alphabet().len(),
            observations = observations.len(),
            space = S::NAME,
            "decoding"
        );

        let trellis = HmmTrellis {
            hmm,
            observations: observations.as_slice(),
            prior,
        };
        let decoded =
            TrellisEngine::<_, S>::with_parallel_min_states(trellis, self.parallel_min_states)
                .run()?;

        Ok(DecodedPath {
            states: decoded.states.into_iter().map(StateId).collect(),
            probability: S::to_probability(decoded.score),
            log_probability: S::to_log_probability(decoded.score),
        })
    }
}

impl<S: ScoreSpace> Default for ViterbiDecoder<S> {
    fn default() -> Self {
        Self::from_parts(Prior::default(), DEFAULT_PARALLEL_MIN_STATES)
    }
}

struct HmmTrellis<'a> {
    hmm: &'a Hmm,
    observations: &'a [SymbolId],
    prior: Vec<f64>,
}

impl Trellis for HmmTrellis<'_> {
    fn num_layers(&self) -> usize {
        self.observations.len()
    }

    fn num_states(&self) -> usize {
        self.hmm.states().len()
    }

    fn initial_weight(&self, state: usize) -> Result<f64> {
        Ok(self.prior[state])
    }

    fn emission_weight(&self, layer: usize, state: usize) -> Result<f64> {
        Ok(self
            .hmm
            .emission(StateId(state), self.observations[layer], layer)?)
    }

    fn transition_weight(&self, layer: usize, from: usize, to: usize) -> Result<f64> {
        Ok(self.hmm.transition(StateId(from), StateId(to), layer)?)
    }
}

/// The most probable hidden path and its probability.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedPath {
    states: Vec<StateId>,
    probability: f64,
    log_probability: f64,
}

impl DecodedPath {
    pub fn states(&self) -> &[StateId] {
        &self.states
    }

    pub fn into_states(self) -> Vec<StateId> {
        self.states
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Joint probability of the path and the observations. In linear space
    /// this is exactly the decoder's final score; in log space it is
    /// `exp` of it and may underflow to zero.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Natural log of [`probability`](Self::probability).
    pub fn log_probability(&self) -> f64 {
        self.log_probability
    }

    /// State labels in path order.
    pub fn labels<'a>(&self, states: &'a StateSet) -> Vec<&'a str> {
        self.states.iter().map(|&s| states.label(s)).collect()
    }

    /// Concatenated state labels, e.g. `"AABBA"`.
    pub fn render(&self, states: &StateSet) -> String {
        self.labels(states).concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::labels::SymbolAlphabet;
    use crate::matrix::{EmissionMatrix, TransitionMatrix};
    use crate::traits::LogSpace;

    fn canonical_hmm() -> Hmm {
        let states = StateSet::from_chars("AB").unwrap();
        let alphabet = SymbolAlphabet::from_chars("xy").unwrap();
        let transitions =
            TransitionMatrix::from_rows(&states, vec![vec![0.7, 0.3], vec![0.2, 0.8]]).unwrap();
        let emissions =
            EmissionMatrix::from_rows(&states, &alphabet, vec![vec![0.9, 0.1], vec![0.3, 0.7]])
                .unwrap();
        Hmm::new(states, alphabet, transitions, emissions).unwrap()
    }

    fn model(hmm: Hmm, obs: &str) -> Model {
        let obs = ObservationSequence::from_chars(hmm.alphabet(), obs).unwrap();
        Model::new(hmm, obs).unwrap()
    }

    #[test]
    fn canonical_two_state_trace() {
        // t0: A = 0.5 * 0.9 = 0.45, B = 0.5 * 0.3 = 0.15
        // t1 (y): A <- max(0.45 * 0.1 * 0.7, 0.15 * 0.1 * 0.2) = 0.0315 via A
        //         B <- max(0.45 * 0.7 * 0.3, 0.15 * 0.7 * 0.8) = 0.0945 via A
        let m = model(canonical_hmm(), "xy");
        let path = ViterbiDecoder::new().decode(&m).unwrap();
        assert_eq!(path.labels(m.hmm().states()), vec!["A", "B"]);
        assert!((path.probability() - 0.0945).abs() < 1e-15);
        assert!((path.log_probability() - 0.0945f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn log_space_matches_linear() {
        let m = model(canonical_hmm(), "xyyxyxxyyy");
        let lin = ViterbiDecoder::new().decode(&m).unwrap();
        let log = ViterbiDecoder::builder().log_space().build().decode(&m).unwrap();
        assert_eq!(lin.states(), log.states());
        assert!((lin.probability() - log.probability()).abs() < 1e-12);
    }

    #[test]
    fn single_observation_picks_best_initial_state() {
        let m = model(canonical_hmm(), "y");
        let path = ViterbiDecoder::new().decode(&m).unwrap();
        assert_eq!(path.render(m.hmm().states()), "B");
        assert!((path.probability() - 0.35).abs() < 1e-15);
    }

    #[test]
    fn explicit_prior_can_change_the_start() {
        let m = model(canonical_hmm(), "y");
        let decoder = ViterbiDecoder::builder()
            .prior(Prior::Explicit(vec![0.9, 0.1]))
            .build();
        let path = decoder.decode(&m).unwrap();
        // A: 0.9 * 0.1 = 0.09 beats B: 0.1 * 0.7 = 0.07
        assert_eq!(path.render(m.hmm().states()), "A");
    }

    #[test]
    fn empty_observations_are_rejected() {
        let m = Model::new(canonical_hmm(), ObservationSequence::default()).unwrap();
        assert_eq!(
            ViterbiDecoder::new().decode(&m),
            Err(DecodeError::EmptyInput)
        );
    }

    #[test]
    fn missing_emission_names_state_symbol_and_step() {
        let states = StateSet::from_chars("AB").unwrap();
        let alphabet = SymbolAlphabet::from_chars("xy").unwrap();
        let transitions =
            TransitionMatrix::from_rows(&states, vec![vec![0.5, 0.5], vec![0.5, 0.5]]).unwrap();
        let mut emissions = EmissionMatrix::new(&states, &alphabet);
        emissions.set(StateId(0), SymbolId(0), 0.5).unwrap();
        emissions.set(StateId(1), SymbolId(0), 0.5).unwrap();
        emissions.set(StateId(0), SymbolId(1), 0.5).unwrap();
        let hmm = Hmm::new(states, alphabet, transitions, emissions).unwrap();
        let m = model(hmm, "xxy");
        assert_eq!(
            ViterbiDecoder::new().decode(&m),
            Err(DecodeError::Model(ModelError::MissingEmission {
                state: "B".into(),
                symbol: "y".into(),
                step: 2
            }))
        );
    }

    #[test]
    fn missing_transition_only_matters_past_first_step() {
        let states = StateSet::from_chars("AB").unwrap();
        let alphabet = SymbolAlphabet::from_chars("xy").unwrap();
        let emissions =
            EmissionMatrix::from_rows(&states, &alphabet, vec![vec![0.9, 0.1], vec![0.3, 0.7]])
                .unwrap();
        let hmm = Hmm::new(
            states.clone(),
            alphabet,
            TransitionMatrix::new(&states),
            emissions,
        )
        .unwrap();
        assert!(ViterbiDecoder::new().decode(&model(hmm.clone(), "x")).is_ok());
        let err = ViterbiDecoder::new().decode(&model(hmm, "xy")).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Model(ModelError::MissingTransition { step: 1, .. })
        ));
    }

    #[test]
    fn unemittable_symbol_has_no_path() {
        let states = StateSet::from_chars("AB").unwrap();
        let alphabet = SymbolAlphabet::from_chars("xyz").unwrap();
        let transitions =
            TransitionMatrix::from_rows(&states, vec![vec![0.7, 0.3], vec![0.2, 0.8]]).unwrap();
        let emissions = EmissionMatrix::from_rows(
            &states,
            &alphabet,
            vec![vec![0.9, 0.1, 0.0], vec![0.3, 0.7, 0.0]],
        )
        .unwrap();
        let hmm = Hmm::new(states, alphabet, transitions, emissions).unwrap();
        let m = model(hmm, "xyzx");
        assert_eq!(
            ViterbiDecoder::new().decode(&m),
            Err(DecodeError::NoPath { step: 2 })
        );
        assert_eq!(
            ViterbiDecoder::<LogSpace>::default().decode(&m),
            Err(DecodeError::NoPath { step: 2 })
        );
    }

    #[test]
    fn bad_prior_is_a_model_error() {
        let m = model(canonical_hmm(), "xy");
        let decoder = ViterbiDecoder::builder()
            .prior(Prior::Explicit(vec![1.0]))
            .build();
        assert!(matches!(
            decoder.decode(&m),
            Err(DecodeError::Model(ModelError::PriorLength { .. }))
        ));
    }
}
