//! Dense lookup tables of sequence run values over the roster.
//!
//! `quads` is the 9x9x9x9 table the lineup kernel reads. `pairs` and
//! `leadoff` hold the two- and one-batter values used when choosing which
//! rotation of a cycle to start with.

use crate::domain::{ROSTER_SIZE, TUPLE_LEN};
use crate::model::SequenceScorer;
use crate::rates::RateModel;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const QUAD_COUNT: usize = ROSTER_SIZE * ROSTER_SIZE * ROSTER_SIZE * ROSTER_SIZE;
pub const PAIR_COUNT: usize = ROSTER_SIZE * ROSTER_SIZE;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("{kind} table needs {expected} values, got {actual}")]
    WrongLength {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{kind} value at index {index} is not finite")]
    NonFinite { kind: &'static str, index: usize },
    #[error("table needs one rate model per rostered player, got {0}")]
    WrongRoster(usize),
}

/// Deserialization goes through [`SequenceTable::from_parts`], so a stored
/// table with the wrong shape is rejected rather than indexed out of bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct SequenceTable {
    quads: Vec<f64>,
    pairs: Vec<f64>,
    leadoff: Vec<f64>,
}

#[derive(Deserialize)]
struct RawTable {
    quads: Vec<f64>,
    pairs: Vec<f64>,
    leadoff: Vec<f64>,
}

impl TryFrom<RawTable> for SequenceTable {
    type Error = TableError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        Self::from_parts(raw.quads, raw.pairs, raw.leadoff)
    }
}

impl Default for SequenceTable {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl SequenceTable {
    pub fn zeroed() -> Self {
        Self {
            quads: vec![0.0; QUAD_COUNT],
            pairs: vec![0.0; PAIR_COUNT],
            leadoff: vec![0.0; ROSTER_SIZE],
        }
    }

    pub fn from_parts(quads: Vec<f64>, pairs: Vec<f64>, leadoff: Vec<f64>) -> Result<Self, TableError> {
        for (kind, values, expected) in [
            ("quad", &quads, QUAD_COUNT),
            ("pair", &pairs, PAIR_COUNT),
            ("leadoff", &leadoff, ROSTER_SIZE),
        ] {
            if values.len() != expected {
                return Err(TableError::WrongLength {
                    kind,
                    expected,
                    actual: values.len(),
                });
            }
            if let Some(index) = values.iter().position(|v| !v.is_finite()) {
                return Err(TableError::NonFinite { kind, index });
            }
        }
        Ok(Self {
            quads,
            pairs,
            leadoff,
        })
    }

    /// Scores every distinct tuple, pair and leadoff on the calling thread.
    pub fn build(rates: &[RateModel], scorer: &SequenceScorer) -> Result<Self, TableError> {
        if rates.len() != ROSTER_SIZE {
            return Err(TableError::WrongRoster(rates.len()));
        }
        let mut table = Self::zeroed();
        for tuple in distinct_tuples() {
            let batters = tuple.map(|i| &rates[i]);
            table.set(tuple, scorer.run_value(&batters));
        }
        table.fill_short_sequences(rates, scorer);
        Ok(table)
    }

    /// Fills the pair and leadoff tables. Cheap next to the quads.
    pub fn fill_short_sequences(&mut self, rates: &[RateModel], scorer: &SequenceScorer) {
        for a in 0..ROSTER_SIZE {
            self.leadoff[a] = scorer.run_value(&[&rates[a]]);
            for b in (0..ROSTER_SIZE).filter(|&b| b != a) {
                self.pairs[a * ROSTER_SIZE + b] = scorer.run_value(&[&rates[a], &rates[b]]);
            }
        }
    }

    #[inline]
    pub fn quad_index(tuple: [usize; TUPLE_LEN]) -> usize {
        ((tuple[0] * ROSTER_SIZE + tuple[1]) * ROSTER_SIZE + tuple[2]) * ROSTER_SIZE + tuple[3]
    }

    #[inline]
    pub fn get(&self, tuple: [usize; TUPLE_LEN]) -> f64 {
        self.quads[Self::quad_index(tuple)]
    }

    pub fn set(&mut self, tuple: [usize; TUPLE_LEN], value: f64) {
        self.quads[Self::quad_index(tuple)] = value;
    }

    pub fn pair(&self, first: usize, second: usize) -> f64 {
        self.pairs[first * ROSTER_SIZE + second]
    }

    pub fn set_pair(&mut self, first: usize, second: usize, value: f64) {
        self.pairs[first * ROSTER_SIZE + second] = value;
    }

    pub fn leadoff(&self, player: usize) -> f64 {
        self.leadoff[player]
    }

    pub fn set_leadoff(&mut self, player: usize, value: f64) {
        self.leadoff[player] = value;
    }

    pub fn quads(&self) -> &[f64] {
        &self.quads
    }
}

/// The 9*8*7*6 ordered tuples of distinct roster indices, lexicographic.
pub fn distinct_tuples() -> impl Iterator<Item = [usize; TUPLE_LEN]> {
    (0..QUAD_COUNT).filter_map(|idx| {
        let t = [
            idx / (ROSTER_SIZE * ROSTER_SIZE * ROSTER_SIZE),
            idx / (ROSTER_SIZE * ROSTER_SIZE) % ROSTER_SIZE,
            idx / ROSTER_SIZE % ROSTER_SIZE,
            idx % ROSTER_SIZE,
        ];
        let distinct = (0..TUPLE_LEN).all(|i| (i + 1..TUPLE_LEN).all(|j| t[i] != t[j]));
        distinct.then_some(t)
    })
}
