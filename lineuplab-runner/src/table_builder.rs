//! Parallel construction of the sequence table.

use rayon::prelude::*;
use tracing::debug;

use lineuplab_core::table::distinct_tuples;
use lineuplab_core::{RateModel, SequenceScorer, SequenceTable, TableError, ROSTER_SIZE};

/// Scores every distinct tuple, on the rayon pool when `parallel`.
///
/// Each tuple is scored independently and written to its own cell, so the
/// table is identical either way.
pub fn build_table(
    rates: &[RateModel],
    scorer: &SequenceScorer,
    parallel: bool,
) -> Result<SequenceTable, TableError> {
    if rates.len() != ROSTER_SIZE {
        return Err(TableError::WrongRoster(rates.len()));
    }
    let tuples: Vec<[usize; 4]> = distinct_tuples().collect();
    let score = |t: &[usize; 4]| scorer.run_value(&t.map(|i| &rates[i]));

    let values: Vec<f64> = if parallel {
        tuples.par_iter().map(score).collect()
    } else {
        tuples.iter().map(score).collect()
    };

    let mut table = SequenceTable::zeroed();
    for (t, v) in tuples.iter().zip(values) {
        table.set(*t, v);
    }
    table.fill_short_sequences(rates, scorer);
    debug!(tuples = tuples.len(), parallel, "sequence table built");
    Ok(table)
}
