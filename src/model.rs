//! Hidden Markov model bundle consumed by the decoder.

use crate::error::ModelError;
use crate::labels::{StateId, StateSet, SymbolAlphabet, SymbolId};
use crate::matrix::{EmissionMatrix, TransitionMatrix};

/// Discrete hidden Markov model: states, symbols and their probability tables.
#[derive(Clone, Debug, PartialEq)]
pub struct Hmm {
    states: StateSet,
    alphabet: SymbolAlphabet,
    transitions: TransitionMatrix,
    emissions: EmissionMatrix,
}

impl Hmm {
    /// Bundle the parts, checking that the tables match the label sets.
    pub fn new(
        states: StateSet,
        alphabet: SymbolAlphabet,
        transitions: TransitionMatrix,
        emissions: EmissionMatrix,
    ) -> Result<Self, ModelError> {
        if transitions.num_states() != states.len() {
            return Err(ModelError::Shape {
                what: "transition matrix",
                axis: "rows",
                expected: states.len(),
                got: transitions.num_states(),
            });
        }
        if emissions.num_states() != states.len() {
            return Err(ModelError::Shape {
                what: "emission matrix",
                axis: "rows",
                expected: states.len(),
                got: emissions.num_states(),
            });
        }
        if emissions.num_symbols() != alphabet.len() {
            return Err(ModelError::Shape {
                what: "emission matrix",
                axis: "columns",
                expected: alphabet.len(),
                got: emissions.num_symbols(),
            });
        }
        Ok(Self {
            states,
            alphabet,
            transitions,
            emissions,
        })
    }

    pub fn states(&self) -> &StateSet {
        &self.states
    }

    pub fn alphabet(&self) -> &SymbolAlphabet {
        &self.alphabet
    }

    pub fn transitions(&self) -> &TransitionMatrix {
        &self.transitions
    }

    pub fn emissions(&self) -> &EmissionMatrix {
        &self.emissions
    }

    /// `from -> to`, or a [`ModelError::MissingTransition`] naming both labels.
    pub fn transition(&self, from: StateId, to: StateId, step: usize) -> Result<f64, ModelError> {
        self.transitions
            .get(from, to)
            .ok_or_else(|| ModelError::MissingTransition {
                from: self.states.label(from).to_string(),
                to: self.states.label(to).to_string(),
                step,
            })
    }

    /// `state` emitting `symbol`, or a [`ModelError::MissingEmission`].
    pub fn emission(
        &self,
        state: StateId,
        symbol: SymbolId,
        step: usize,
    ) -> Result<f64, ModelError> {
        self.emissions
            .get(state, symbol)
            .ok_or_else(|| ModelError::MissingEmission {
                state: self.states.label(state).to_string(),
                symbol: self.alphabet.label(symbol).to_string(),
                step,
            })
    }
}

/// Ordered symbols observed, drawn from a [`SymbolAlphabet`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObservationSequence {
    symbols: Vec<SymbolId>,
}

impl ObservationSequence {
    /// Wrap already-resolved symbol ids. Empty sequences are allowed here;
    /// the decoder rejects them.
    pub fn new(symbols: Vec<SymbolId>) -> Self {
        Self { symbols }
    }

    /// Resolve labels against `alphabet`.
    pub fn from_labels<'a, L>(alphabet: &SymbolAlphabet, labels: L) -> Result<Self, ModelError>
    where
        L: IntoIterator<Item = &'a str>,
    {
        Ok(Self::new(alphabet.resolve(labels)?))
    }

    /// One symbol per character of `text`.
    pub fn from_chars(alphabet: &SymbolAlphabet, text: &str) -> Result<Self, ModelError> {
        let mut buf = [0u8; 4];
        text.chars()
            .map(|c| alphabet.require(c.encode_utf8(&mut buf)))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn as_slice(&self) -> &[SymbolId] {
        &self.symbols
    }

    pub fn iter(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.symbols.iter().copied()
    }
}

impl From<Vec<SymbolId>> for ObservationSequence {
    fn from(symbols: Vec<SymbolId>) -> Self {
        Self::new(symbols)
    }
}

/// An [`Hmm`] together with the observation sequence to explain.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    hmm: Hmm,
    observations: ObservationSequence,
}

impl Model {
    /// Check that every observation belongs to the model's alphabet.
    pub fn new(hmm: Hmm, observations: ObservationSequence) -> Result<Self, ModelError> {
        for symbol in observations.iter() {
            hmm.alphabet().check(symbol)?;
        }
        Ok(Self { hmm, observations })
    }

    pub fn hmm(&self) -> &Hmm {
        &self.hmm
    }

    pub fn observations(&self) -> &ObservationSequence {
        &self.observations
    }
}

/// Initial state distribution used at step 0.
#[derive(Clone, Debug, PartialEq)]
pub enum Prior {
    /// The same probability for every state, whatever the state count.
    /// `Fixed(0.5)` is the default and does not sum to one for more
    /// than two states.
    Fixed(f64),
    /// `1 / |states|` for every state.
    Uniform,
    /// One probability per state, in state order.
    Explicit(Vec<f64>),
}

impl Default for Prior {
    fn default() -> Self {
        Prior::Fixed(0.5)
    }
}

impl Prior {
    /// Expand into one probability per state.
    pub fn resolve(&self, n_states: usize) -> Result<Vec<f64>, ModelError> {
        let probs = match self {
            Prior::Fixed(p) => vec![*p; n_states],
            Prior::Uniform => vec![1.0 / n_states as f64; n_states],
            Prior::Explicit(ps) => {
                if ps.len() != n_states {
                    return Err(ModelError::PriorLength {
                        expected: n_states,
                        got: ps.len(),
                    });
                }
                ps.clone()
            }
        };
        for (state, &value) in probs.iter().enumerate() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ModelError::InvalidPrior { state, value });
            }
        }
        Ok(probs)
    }
}
