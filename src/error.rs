//! Structured error types for model construction, decoding and parsing.

use thiserror::Error;

/// A model is malformed, incomplete, or inconsistent with its inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A transition entry needed by the recurrence is absent.
    #[error("missing transition probability {from} -> {to} (needed at step {step})")]
    MissingTransition {
        from: String,
        to: String,
        step: usize,
    },

    /// An emission entry needed at some step is absent.
    #[error("missing emission probability for state {state} emitting {symbol} (needed at step {step})")]
    MissingEmission {
        state: String,
        symbol: String,
        step: usize,
    },

    /// A label set was built from zero labels.
    #[error("{kind} set is empty")]
    EmptyLabels { kind: &'static str },

    /// The same label appears twice in one label set.
    #[error("duplicate {kind} label `{label}`")]
    DuplicateLabel { kind: &'static str, label: String },

    /// A label that is not a member of the relevant set.
    #[error("unknown {kind} label `{label}`")]
    UnknownLabel { kind: &'static str, label: String },

    /// An index outside the relevant set.
    #[error("{kind} index {index} is out of range for a set of {len}")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    /// A probability that is non-finite or outside `[0, 1]`.
    #[error("probability {value} at ({row}, {col}) is outside [0, 1]")]
    InvalidProbability { row: usize, col: usize, value: f64 },

    /// A prior entry that is non-finite or outside `[0, 1]`.
    #[error("prior probability {value} for state {state} is outside [0, 1]")]
    InvalidPrior { state: usize, value: f64 },

    /// Matrix dimensions disagree with the label sets.
    #[error("{what} has {got} {axis}, expected {expected}")]
    Shape {
        what: &'static str,
        axis: &'static str,
        expected: usize,
        got: usize,
    },

    /// An explicit prior whose length differs from the state count.
    #[error("prior has {got} entries but the model has {expected} states")]
    PriorLength { expected: usize, got: usize },

    /// A hidden path and an observation sequence of different lengths.
    #[error("hidden path has {path} states but there are {observations} observations")]
    LengthMismatch { path: usize, observations: usize },
}

/// Failure of a single decode call. None of these are transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// The observation sequence has no symbols.
    #[error("observation sequence is empty")]
    EmptyInput,

    /// Every path has zero probability (or underflowed to zero).
    #[error("no state path can emit the observations: every path has zero probability from step {step}")]
    NoPath { step: usize },
}

/// Failure to read a text dataset.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The dataset has the wrong number of dash-separated sections.
    #[error("expected {expected} sections, found {found}")]
    Sections { expected: usize, found: usize },

    /// A malformed line (1-based line number).
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("invalid model: {0}")]
    Model(#[from] ModelError),
}

/// Convenience alias for decoding results.
pub type Result<T> = std::result::Result<T, DecodeError>;
