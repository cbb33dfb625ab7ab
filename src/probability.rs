//! Probabilities of a fixed hidden path.
//!
//! These score a path that is already known instead of searching for one.
//! [`joint_probability`] is the quantity the decoder maximizes, so scoring a
//! decoded path with it reproduces the decoder's best score.

use crate::error::ModelError;
use crate::labels::{StateId, StateSet, SymbolAlphabet, SymbolId};
use crate::matrix::{EmissionMatrix, TransitionMatrix};
use crate::model::{Hmm, Prior};

/// Probability of `path` under the transition matrix alone:
/// `prior(path[0]) * prod transition(path[i-1], path[i])`.
///
/// An empty path has probability 1.
pub fn hidden_path_probability(
    states: &StateSet,
    transitions: &TransitionMatrix,
    path: &[StateId],
    prior: &Prior,
) -> Result<f64, ModelError> {
    check_shape("transition matrix", "rows", states.len(), transitions.num_states())?;
    let Some(&first) = path.first() else {
        return Ok(1.0);
    };
    for &s in path {
        states.check(s)?;
    }
    let prior = prior.resolve(states.len())?;
    let mut p = prior[first.0];
    for (step, pair) in path.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);
        p *= transitions
            .get(from, to)
            .ok_or_else(|| ModelError::MissingTransition {
                from: states.label(from).to_string(),
                to: states.label(to).to_string(),
                step: step + 1,
            })?;
    }
    Ok(p)
}

/// Probability that `path` emits `observations`:
/// `prod emission(path[i], observations[i])`.
pub fn emission_probability(
    states: &StateSet,
    alphabet: &SymbolAlphabet,
    emissions: &EmissionMatrix,
    path: &[StateId],
    observations: &[SymbolId],
) -> Result<f64, ModelError> {
    check_shape("emission matrix", "rows", states.len(), emissions.num_states())?;
    check_shape("emission matrix", "columns", alphabet.len(), emissions.num_symbols())?;
    if path.len() != observations.len() {
        return Err(ModelError::LengthMismatch {
            path: path.len(),
            observations: observations.len(),
        });
    }
    let mut p = 1.0;
    for (step, (&state, &symbol)) in path.iter().zip(observations).enumerate() {
        states.check(state)?;
        alphabet.check(symbol)?;
        p *= emissions
            .get(state, symbol)
            .ok_or_else(|| ModelError::MissingEmission {
                state: states.label(state).to_string(),
                symbol: alphabet.label(symbol).to_string(),
                step,
            })?;
    }
    Ok(p)
}

/// Joint probability of `path` and `observations` under `hmm`, using the
/// same factor order as the decoder.
pub fn joint_probability(
    hmm: &Hmm,
    prior: &Prior,
    path: &[StateId],
    observations: &[SymbolId],
) -> Result<f64, ModelError> {
    if path.len() != observations.len() {
        return Err(ModelError::LengthMismatch {
            path: path.len(),
            observations: observations.len(),
        });
    }
    let Some(&first) = path.first() else {
        return Ok(1.0);
    };
    for &s in path {
        hmm.states().check(s)?;
    }
    for &o in observations {
        hmm.alphabet().check(o)?;
    }
    let prior = prior.resolve(hmm.states().len())?;
    let mut p = hmm.emission(first, observations[0], 0)? * prior[first.0];
    for step in 1..path.len() {
        let emit = hmm.emission(path[step], observations[step], step)?;
        p = p * emit * hmm.transition(path[step - 1], path[step], step)?;
    }
    Ok(p)
}

fn check_shape(
    what: &'static str,
    axis: &'static str,
    expected: usize,
    got: usize,
) -> Result<(), ModelError> {
    if expected != got {
        return Err(ModelError::Shape {
            what,
            axis,
            expected,
            got,
        });
    }
    Ok(())
}
