//! Exhaustive batched search over a candidate space.
//!
//! The space is cut into rank ranges of `batch_size`. Each batch unranks its
//! first candidate, steps through the rest with `next_permutation`, filters
//! on handedness, scores, and keeps a local [`TopN`]. Batches share nothing
//! mutable; the reduction merges local boards under the leaderboard's total
//! order, so parallel and serial runs return the same ranking.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::leaderboard::{RankedCandidate, TopN};
use lineuplab_core::constraints::circular_runs;
use lineuplab_core::{CandidateSpace, Handedness, HandednessLimits, LineupKernel, ROSTER_SIZE};

/// Everything a batch needs, all borrowed read-only.
#[derive(Debug, Clone, Copy)]
pub struct SearchSpace<'a> {
    pub candidates: &'a CandidateSpace,
    pub kernel: LineupKernel<'a>,
    pub hands: &'a [Handedness; ROSTER_SIZE],
    pub limits: HandednessLimits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub top_n: usize,
    pub batch_size: usize,
    pub parallel: bool,
    /// Batches that have not started by this instant are skipped.
    pub deadline: Option<Instant>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            top_n: 1,
            batch_size: 10_000,
            parallel: true,
            deadline: None,
        }
    }
}

/// Counters and survivors of one search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best first.
    pub top: Vec<RankedCandidate>,
    /// Candidates generated, whether or not they passed the filter.
    pub generated: u64,
    /// Candidates that passed the filter and were scored.
    pub scored: u64,
    /// Candidates whose left-handed run was too long.
    pub left_violations: u64,
    /// Candidates whose right-handed run was too long.
    pub right_violations: u64,
    pub skipped_batches: usize,
    /// False when the deadline cut the search short.
    pub completed: bool,
}

impl SearchOutcome {
    pub fn rejected(&self) -> u64 {
        self.generated - self.scored
    }
}

struct BatchOutcome {
    board: TopN,
    generated: u64,
    scored: u64,
    left_violations: u64,
    right_violations: u64,
    skipped: bool,
}

impl BatchOutcome {
    fn empty(top_n: usize) -> Self {
        Self {
            board: TopN::new(top_n),
            generated: 0,
            scored: 0,
            left_violations: 0,
            right_violations: 0,
            skipped: false,
        }
    }

    fn combine(mut self, other: Self) -> Self {
        self.board.merge(other.board);
        self.generated += other.generated;
        self.scored += other.scored;
        self.left_violations += other.left_violations;
        self.right_violations += other.right_violations;
        self
    }
}

fn run_batch(space: &SearchSpace<'_>, opts: &SearchOptions, start: u64, end: u64) -> BatchOutcome {
    let mut out = BatchOutcome::empty(opts.top_n);
    if opts.deadline.is_some_and(|d| Instant::now() >= d) {
        out.skipped = true;
        return out;
    }
    let check_hands = !space.limits.is_unconstrained();
    for (rank, order) in space.candidates.range(start, end) {
        out.generated += 1;
        if check_hands {
            let runs = circular_runs(&order, space.hands);
            let left = space.limits.left_exceeded(&runs);
            let right = space.limits.right_exceeded(&runs);
            if left || right {
                out.left_violations += u64::from(left);
                out.right_violations += u64::from(right);
                continue;
            }
        }
        out.scored += 1;
        let score = space.kernel.score_order(&order);
        if out.board.admits(score) {
            out.board.insert(RankedCandidate { score, rank, order });
        }
    }
    debug!(
        start,
        end,
        scored = out.scored,
        generated = out.generated,
        "batch done"
    );
    out
}

/// Walks the whole space (or as much as the deadline allows).
pub fn search(space: &SearchSpace<'_>, opts: &SearchOptions) -> SearchOutcome {
    let total = space.candidates.len();
    let batch = opts.batch_size.max(1) as u64;
    let ranges: Vec<(u64, u64)> = (0..total.div_ceil(batch))
        .map(|i| (i * batch, ((i + 1) * batch).min(total)))
        .collect();

    let batches: Vec<BatchOutcome> = if opts.parallel {
        ranges
            .par_iter()
            .map(|&(start, end)| run_batch(space, opts, start, end))
            .collect()
    } else {
        ranges
            .iter()
            .map(|&(start, end)| run_batch(space, opts, start, end))
            .collect()
    };

    let skipped_batches = batches.iter().filter(|b| b.skipped).count();
    let merged = batches
        .into_iter()
        .fold(BatchOutcome::empty(opts.top_n), BatchOutcome::combine);

    if skipped_batches > 0 {
        warn!(
            skipped_batches,
            total_batches = ranges.len(),
            "deadline reached, returning best lineups found so far"
        );
    }

    SearchOutcome {
        top: merged.board.into_sorted_vec(),
        generated: merged.generated,
        scored: merged.scored,
        left_violations: merged.left_violations,
        right_violations: merged.right_violations,
        skipped_batches,
        completed: skipped_batches == 0,
    }
}
