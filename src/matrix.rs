//! Transition and emission probability tables.
//!
//! Both tables are dense `rows x cols` grids of optional probabilities.
//! An absent entry is not an error until the decoder actually needs it.
//! No row normalization is performed.

use crate::error::ModelError;
use crate::labels::{StateId, StateSet, SymbolAlphabet, SymbolId};

#[derive(Clone, Debug, PartialEq)]
struct ProbabilityTable {
    rows: usize,
    cols: usize,
    cells: Vec<Option<f64>>,
}

impl ProbabilityTable {
    fn missing(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    fn from_rows(
        what: &'static str,
        cols: usize,
        expected_rows: usize,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, ModelError> {
        if rows.len() != expected_rows {
            return Err(ModelError::Shape {
                what,
                axis: "rows",
                expected: expected_rows,
                got: rows.len(),
            });
        }
        let mut table = Self::missing(expected_rows, cols);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(ModelError::Shape {
                    what,
                    axis: "columns",
                    expected: cols,
                    got: row.len(),
                });
            }
            for (c, p) in row.into_iter().enumerate() {
                table.set(r, c, p)?;
            }
        }
        Ok(table)
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> Option<f64> {
        debug_assert!(row < self.rows && col < self.cols);
        self.cells[row * self.cols + col]
    }

    fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), ModelError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(ModelError::InvalidProbability { row, col, value });
        }
        self.cells[row * self.cols + col] = Some(value);
        Ok(())
    }

    fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

/// Probability of moving from one state to another between steps.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionMatrix {
    table: ProbabilityTable,
}

impl TransitionMatrix {
    /// A matrix for `states` with every entry absent.
    pub fn new(states: &StateSet) -> Self {
        let n = states.len();
        Self {
            table: ProbabilityTable::missing(n, n),
        }
    }

    /// Build a complete matrix; `rows[from][to]` in state order.
    pub fn from_rows(states: &StateSet, rows: Vec<Vec<f64>>) -> Result<Self, ModelError> {
        let n = states.len();
        Ok(Self {
            table: ProbabilityTable::from_rows("transition matrix", n, n, rows)?,
        })
    }

    pub fn num_states(&self) -> usize {
        self.table.rows
    }

    /// Set `from -> to`, validating the probability.
    pub fn set(&mut self, from: StateId, to: StateId, p: f64) -> Result<(), ModelError> {
        self.check(from)?;
        self.check(to)?;
        self.table.set(from.0, to.0, p)
    }

    /// Probability of `from -> to`, or `None` if absent.
    #[inline]
    pub fn get(&self, from: StateId, to: StateId) -> Option<f64> {
        self.table.get(from.0, to.0)
    }

    pub fn is_complete(&self) -> bool {
        self.table.is_complete()
    }

    fn check(&self, id: StateId) -> Result<(), ModelError> {
        if id.0 < self.table.rows {
            Ok(())
        } else {
            Err(ModelError::IndexOutOfRange {
                kind: "state",
                index: id.0,
                len: self.table.rows,
            })
        }
    }
}

/// Probability that a state emits a symbol.
#[derive(Clone, Debug, PartialEq)]
pub struct EmissionMatrix {
    table: ProbabilityTable,
}

impl EmissionMatrix {
    /// A matrix for `states x alphabet` with every entry absent.
    pub fn new(states: &StateSet, alphabet: &SymbolAlphabet) -> Self {
        Self {
            table: ProbabilityTable::missing(states.len(), alphabet.len()),
        }
    }

    /// Build a complete matrix; `rows[state][symbol]` in set order.
    pub fn from_rows(
        states: &StateSet,
        alphabet: &SymbolAlphabet,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, ModelError> {
        Ok(Self {
            table: ProbabilityTable::from_rows(
                "emission matrix",
                alphabet.len(),
                states.len(),
                rows,
            )?,
        })
    }

    pub fn num_states(&self) -> usize {
        self.table.rows
    }

    pub fn num_symbols(&self) -> usize {
        self.table.cols
    }

    pub fn set(&mut self, state: StateId, symbol: SymbolId, p: f64) -> Result<(), ModelError> {
        if state.0 >= self.table.rows {
            return Err(ModelError::IndexOutOfRange {
                kind: "state",
                index: state.0,
                len: self.table.rows,
            });
        }
        if symbol.0 >= self.table.cols {
            return Err(ModelError::IndexOutOfRange {
                kind: "symbol",
                index: symbol.0,
                len: self.table.cols,
            });
        }
        self.table.set(state.0, symbol.0, p)
    }

    #[inline]
    pub fn get(&self, state: StateId, symbol: SymbolId) -> Option<f64> {
        self.table.get(state.0, symbol.0)
    }

    pub fn is_complete(&self) -> bool {
        self.table.is_complete()
    }
}
