//! Viterbi decoding for discrete hidden Markov models.
//!
//! Given an HMM (ordered states, ordered emission symbols, a transition
//! matrix and an emission matrix) and an observed symbol sequence, this
//! crate finds the single hidden-state path that maximizes the joint
//! probability of path and observations.
//!
//! ## Core idea
//! 1. Describe the model with [`Hmm`] and the observations with
//!    [`ObservationSequence`], or parse both with [`parse::parse_decoding`].
//! 2. Configure a [`ViterbiDecoder`] (prior, score space) via
//!    [`DecoderBuilder`].
//! 3. [`ViterbiDecoder::decode`] runs the max-product recurrence on the
//!    generic [`TrellisEngine`], keeping only two score rows plus a
//!    preallocated backpointer table, and backtraces the best path.
//!
//! ## Quick start
//! ```
//! use viterbi_dp::{parse, ViterbiDecoder};
//!
//! let text = "xy\n--\nx y\n--\nA B\n--\n  A B\nA 0.7 0.3\nB 0.2 0.8\n--\n  x y\nA 0.9 0.1\nB 0.3 0.7\n";
//! let model = parse::parse_decoding(text).unwrap();
//! let path = ViterbiDecoder::new().decode(&model).unwrap();
//! assert_eq!(path.render(model.hmm().states()), "AB");
//! assert!((path.probability() - 0.0945).abs() < 1e-12);
//! ```
//!
//! ## Ties and zero probabilities
//! Candidates are scanned in state order and only a strictly greater score
//! replaces the running best, which starts at zero probability. Ties go to
//! the lowest-index state, and a state no positive-probability path reaches
//! keeps an empty backpointer.
//!
//! ## Cargo features
//! - `parallel`: relax the states of a layer on rayon for large state sets.
//! - `tracing`: emit `tracing` spans and events from the engine.
//! - `cli`: build the `viterbi` command-line tool (default).

pub mod builder;
pub mod engine;
pub mod error;
pub mod labels;
pub mod matrix;
pub mod model;
pub mod parse;
pub mod probability;
pub mod table;
pub mod traits;
pub mod utils;
pub mod viterbi;

pub use crate::builder::DecoderBuilder;
pub use crate::engine::TrellisEngine;
pub use crate::error::{DecodeError, ModelError, ParseError};
pub use crate::labels::{StateId, StateSet, SymbolAlphabet, SymbolId};
pub use crate::matrix::{EmissionMatrix, TransitionMatrix};
pub use crate::model::{Hmm, Model, ObservationSequence, Prior};
pub use crate::traits::{Linear, LogSpace, ScoreSpace, Trellis};
pub use crate::viterbi::{DecodedPath, ViterbiDecoder};
