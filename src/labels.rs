//! Ordered, duplicate-free label sets for states and emission symbols.
//!
//! A label's position in its set is the index used by the probability
//! matrices, so a set never reorders after construction.

use crate::error::ModelError;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// Typed index into a [`LabelSet`].
pub trait LabelId: Copy + Eq + fmt::Debug {
    /// Human-readable kind used in error messages.
    const KIND: &'static str;

    fn from_index(index: usize) -> Self;
    fn index(self) -> usize;
}

/// Index of a hidden state within a [`StateSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub usize);

/// Index of an emission symbol within a [`SymbolAlphabet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub usize);

impl LabelId for StateId {
    const KIND: &'static str = "state";

    #[inline]
    fn from_index(index: usize) -> Self {
        StateId(index)
    }

    #[inline]
    fn index(self) -> usize {
        self.0
    }
}

impl LabelId for SymbolId {
    const KIND: &'static str = "symbol";

    #[inline]
    fn from_index(index: usize) -> Self {
        SymbolId(index)
    }

    #[inline]
    fn index(self) -> usize {
        self.0
    }
}

/// Ordered set of labels addressed by a typed id.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelSet<I> {
    labels: Vec<String>,
    index: HashMap<String, usize>,
    _id: PhantomData<I>,
}

/// Ordered hidden states.
pub type StateSet = LabelSet<StateId>;

/// Ordered emission symbols.
pub type SymbolAlphabet = LabelSet<SymbolId>;

impl<I: LabelId> LabelSet<I> {
    /// Build a set from labels in order.
    ///
    /// Fails on an empty input or a repeated label.
    pub fn new<L, S>(labels: L) -> Result<Self, ModelError>
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out = Vec::new();
        let mut index = HashMap::new();
        for label in labels {
            let label = label.into();
            if index.contains_key(&label) {
                return Err(ModelError::DuplicateLabel {
                    kind: I::KIND,
                    label,
                });
            }
            index.insert(label.clone(), out.len());
            out.push(label);
        }
        if out.is_empty() {
            return Err(ModelError::EmptyLabels { kind: I::KIND });
        }
        Ok(Self {
            labels: out,
            index,
            _id: PhantomData,
        })
    }

    /// One label per character, e.g. `"AB"` for states `A` and `B`.
    pub fn from_chars(chars: &str) -> Result<Self, ModelError> {
        Self::new(chars.chars().map(String::from))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false: construction rejects empty sets.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Look up the id of `label`.
    pub fn get(&self, label: &str) -> Option<I> {
        self.index.get(label).map(|&i| I::from_index(i))
    }

    /// Like [`get`](Self::get) but reports unknown labels as errors.
    pub fn require(&self, label: &str) -> Result<I, ModelError> {
        self.get(label).ok_or_else(|| ModelError::UnknownLabel {
            kind: I::KIND,
            label: label.to_string(),
        })
    }

    /// Label of `id`.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this set.
    pub fn label(&self, id: I) -> &str {
        &self.labels[id.index()]
    }

    /// Check that `id` addresses a member of this set.
    pub fn check(&self, id: I) -> Result<I, ModelError> {
        if id.index() < self.len() {
            Ok(id)
        } else {
            Err(ModelError::IndexOutOfRange {
                kind: I::KIND,
                index: id.index(),
                len: self.len(),
            })
        }
    }

    /// Ids in set order.
    pub fn ids(&self) -> impl Iterator<Item = I> + '_ {
        (0..self.labels.len()).map(I::from_index)
    }

    /// `(id, label)` pairs in set order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &str)> + '_ {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, l)| (I::from_index(i), l.as_str()))
    }

    /// Map a sequence of labels to ids.
    pub fn resolve<'a, L>(&self, labels: L) -> Result<Vec<I>, ModelError>
    where
        L: IntoIterator<Item = &'a str>,
    {
        labels.into_iter().map(|l| self.require(l)).collect()
    }
}
