//! Reader for the dash-separated text dataset format.
//!
//! A dataset is a list of sections separated by lines made only of `-`
//! characters. A decoding dataset looks like:
//!
//! ```text
//! xyxzzxyxyy
//! --------
//! x   y   z
//! --------
//! A   B
//! --------
//!     A       B
//! A   0.641   0.359
//! B   0.729   0.271
//! --------
//!     x       y       z
//! A   0.117   0.691   0.192
//! B   0.097   0.42    0.483
//! ```
//!
//! Sequence lines without whitespace are read one label per character.
//! Table entries are matched by row and column label; rows missing from a
//! table leave their entries absent.

use crate::error::{ModelError, ParseError};
use crate::labels::{LabelId, LabelSet, StateId, StateSet, SymbolAlphabet};
use crate::matrix::{EmissionMatrix, TransitionMatrix};
use crate::model::{Hmm, Model, ObservationSequence};
use std::io::Read;

/// Dataset for scoring a fixed hidden path under the transition matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct HiddenPathDataset {
    pub path: Vec<StateId>,
    pub states: StateSet,
    pub transitions: TransitionMatrix,
}

/// Dataset for scoring an observation sequence given a fixed hidden path.
#[derive(Clone, Debug, PartialEq)]
pub struct OutcomeDataset {
    pub observations: ObservationSequence,
    pub alphabet: SymbolAlphabet,
    pub path: Vec<StateId>,
    pub states: StateSet,
    pub emissions: EmissionMatrix,
}

#[derive(Clone, Copy, Debug)]
struct Line<'a> {
    number: usize,
    text: &'a str,
}

type Section<'a> = Vec<Line<'a>>;

/// Read all of `reader` as UTF-8 text.
pub fn read_text<R: Read>(mut reader: R) -> Result<String, ParseError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}

/// Parse a decoding dataset: observations, alphabet, states, transition
/// table, emission table.
pub fn parse_decoding(text: &str) -> Result<Model, ParseError> {
    let sections = split_sections(text, 5)?;
    let alphabet: SymbolAlphabet = label_set(&sections[1])?;
    let observations = observation_line(&sections[0], &alphabet)?;
    let states: StateSet = label_set(&sections[2])?;

    let mut transitions = TransitionMatrix::new(&states);
    fill_table(&sections[3], &states, &states, |from, to, p| {
        transitions.set(from, to, p)
    })?;
    let mut emissions = EmissionMatrix::new(&states, &alphabet);
    fill_table(&sections[4], &states, &alphabet, |state, symbol, p| {
        emissions.set(state, symbol, p)
    })?;

    let hmm = Hmm::new(states, alphabet, transitions, emissions)?;
    Ok(Model::new(hmm, observations)?)
}

/// Parse a hidden-path dataset: path, states, transition table.
pub fn parse_hidden_path(text: &str) -> Result<HiddenPathDataset, ParseError> {
    let sections = split_sections(text, 3)?;
    let states: StateSet = label_set(&sections[1])?;
    let path = sequence_line(&sections[0], &states)?;
    let mut transitions = TransitionMatrix::new(&states);
    fill_table(&sections[2], &states, &states, |from, to, p| {
        transitions.set(from, to, p)
    })?;
    Ok(HiddenPathDataset {
        path,
        states,
        transitions,
    })
}

/// Parse an outcome dataset: observations, alphabet, path, states,
/// emission table.
pub fn parse_outcome(text: &str) -> Result<OutcomeDataset, ParseError> {
    let sections = split_sections(text, 5)?;
    let alphabet: SymbolAlphabet = label_set(&sections[1])?;
    let observations = observation_line(&sections[0], &alphabet)?;
    let states: StateSet = label_set(&sections[3])?;
    let path = sequence_line(&sections[2], &states)?;
    let mut emissions = EmissionMatrix::new(&states, &alphabet);
    fill_table(&sections[4], &states, &alphabet, |state, symbol, p| {
        emissions.set(state, symbol, p)
    })?;
    Ok(OutcomeDataset {
        observations,
        alphabet,
        path,
        states,
        emissions,
    })
}

fn is_separator(line: &str) -> bool {
    line.len() >= 2 && line.bytes().all(|b| b == b'-')
}

fn split_sections(text: &str, expected: usize) -> Result<Vec<Section<'_>>, ParseError> {
    let mut sections: Vec<Section<'_>> = vec![Vec::new()];
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if is_separator(line) {
            sections.push(Vec::new());
            continue;
        }
        if let Some(current) = sections.last_mut() {
            current.push(Line {
                number: i + 1,
                text: line,
            });
        }
    }
    while sections.len() > 1 && sections.last().is_some_and(|s| s.is_empty()) {
        sections.pop();
    }
    let found = sections.iter().filter(|s| !s.is_empty()).count();
    if sections.len() != expected || found != expected {
        return Err(ParseError::Sections { expected, found });
    }
    Ok(sections)
}

fn single_line<'a>(section: &Section<'a>) -> Result<Line<'a>, ParseError> {
    match section.as_slice() {
        [line] => Ok(*line),
        [_, extra, ..] => Err(ParseError::Syntax {
            line: extra.number,
            message: "expected a single line".into(),
        }),
        [] => Err(ParseError::Syntax {
            line: 0,
            message: "empty section".into(),
        }),
    }
}

/// Labels of a sequence line: whitespace-separated tokens if there is any
/// whitespace, otherwise one label per character.
fn sequence_tokens(text: &str) -> Vec<&str> {
    if text.contains(char::is_whitespace) {
        text.split_whitespace().collect()
    } else {
        text.char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect()
    }
}

fn sequence_line<I: LabelId>(
    section: &Section<'_>,
    set: &LabelSet<I>,
) -> Result<Vec<I>, ParseError> {
    let line = single_line(section)?;
    set.resolve(sequence_tokens(line.text))
        .map_err(|e| syntax(line, e))
}

fn observation_line(
    section: &Section<'_>,
    alphabet: &SymbolAlphabet,
) -> Result<ObservationSequence, ParseError> {
    sequence_line(section, alphabet).map(ObservationSequence::new)
}

fn label_set<I: LabelId>(section: &Section<'_>) -> Result<LabelSet<I>, ParseError> {
    let labels = section.iter().flat_map(|l| l.text.split_whitespace());
    Ok(LabelSet::new(labels)?)
}

fn fill_table<R, C, F>(
    section: &Section<'_>,
    rows: &LabelSet<R>,
    cols: &LabelSet<C>,
    mut set: F,
) -> Result<(), ParseError>
where
    R: LabelId,
    C: LabelId,
    F: FnMut(R, C, f64) -> Result<(), ModelError>,
{
    let Some((header, body)) = section.split_first() else {
        return Ok(());
    };
    let columns = cols
        .resolve(header.text.split_whitespace())
        .map_err(|e| syntax(*header, e))?;

    for &line in body {
        let mut tokens = line.text.split_whitespace();
        let row = match tokens.next() {
            Some(label) => rows.require(label).map_err(|e| syntax(line, e))?,
            None => continue,
        };
        let values: Vec<&str> = tokens.collect();
        if values.len() != columns.len() {
            return Err(ParseError::Syntax {
                line: line.number,
                message: format!(
                    "expected {} values, found {}",
                    columns.len(),
                    values.len()
                ),
            });
        }
        for (&col, token) in columns.iter().zip(values) {
            let p: f64 = token.parse().map_err(|_| ParseError::Syntax {
                line: line.number,
                message: format!("invalid probability `{token}`"),
            })?;
            set(row, col, p).map_err(|e| syntax(line, e))?;
        }
    }
    Ok(())
}

fn syntax(line: Line<'_>, err: ModelError) -> ParseError {
    ParseError::Syntax {
        line: line.number,
        message: err.to_string(),
    }
}
