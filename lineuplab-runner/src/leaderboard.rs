//! Bounded top-N leaderboard of candidate lineups.
//!
//! Entries are ordered by score (higher first) and then by generation rank
//! (lower first), a total order, so boards built from disjoint batches and
//! merged in any order end up identical to a board built serially.

use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use lineuplab_core::ROSTER_SIZE;

/// A scored candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub score: f64,
    /// Lexicographic rank within the candidate space.
    pub rank: u64,
    pub order: [usize; ROSTER_SIZE],
}

impl RankedCandidate {
    /// `Greater` means `self` ranks ahead of `other`.
    pub fn precedence(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.rank.cmp(&self.rank))
    }
}

/// Heap wrapper ordering by precedence.
#[derive(Debug, Clone, Copy)]
struct ByPrecedence(RankedCandidate);

impl PartialEq for ByPrecedence {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ByPrecedence {}

impl PartialOrd for ByPrecedence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByPrecedence {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.precedence(&other.0)
    }
}

/// Outcome of an insert operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertResult {
    /// Board had room.
    Inserted,
    /// Displaced the weakest entry.
    Replaced,
    /// Not good enough, or a non-finite score.
    Skipped,
}

/// Keeps the best `capacity` candidates seen. The weakest sits at the top of
/// a min-heap so each insert is `O(log n)`.
#[derive(Debug, Clone)]
pub struct TopN {
    heap: BinaryHeap<Reverse<ByPrecedence>>,
    capacity: usize,
}

impl TopN {
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity.min(1024) + 1),
            capacity,
        }
    }

    pub fn insert(&mut self, candidate: RankedCandidate) -> InsertResult {
        if !candidate.score.is_finite() || self.capacity == 0 {
            return InsertResult::Skipped;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(ByPrecedence(candidate)));
            return InsertResult::Inserted;
        }
        match self.heap.peek() {
            Some(Reverse(weakest)) if candidate.precedence(&weakest.0) == Ordering::Greater => {
                self.heap.pop();
                self.heap.push(Reverse(ByPrecedence(candidate)));
                InsertResult::Replaced
            }
            _ => InsertResult::Skipped,
        }
    }

    /// Cheap pre-check for the hot loop: could `score` make the board?
    #[inline]
    pub fn admits(&self, score: f64) -> bool {
        if self.heap.len() < self.capacity {
            return true;
        }
        match self.heap.peek() {
            Some(Reverse(weakest)) => score >= weakest.0.score,
            None => false,
        }
    }

    /// Folds another board into this one.
    pub fn merge(&mut self, other: TopN) {
        for Reverse(ByPrecedence(c)) in other.heap {
            self.insert(c);
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Best first.
    pub fn into_sorted_vec(self) -> Vec<RankedCandidate> {
        let mut entries: Vec<RankedCandidate> = self.heap.into_iter().map(|Reverse(c)| c.0).collect();
        entries.sort_by(|a, b| b.precedence(a));
        entries
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(score: f64, rank: u64) -> RankedCandidate {
        RankedCandidate {
            score,
            rank,
            order: [0, 1, 2, 3, 4, 5, 6, 7, 8],
        }
    }

    #[test]
    fn keeps_best_n_sorted() {
        let mut board = TopN::new(3);
        for (i, s) in [1.0, 5.0, 3.0, 4.0, 2.0].iter().enumerate() {
            board.insert(cand(*s, i as u64));
        }
        let scores: Vec<f64> = board.into_sorted_vec().iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![5.0, 4.0, 3.0]);
    }

    #[test]
    fn insert_reports_outcome() {
        let mut board = TopN::new(1);
        assert_eq!(board.insert(cand(1.0, 0)), InsertResult::Inserted);
        assert_eq!(board.insert(cand(2.0, 1)), InsertResult::Replaced);
        assert_eq!(board.insert(cand(0.5, 2)), InsertResult::Skipped);
    }

    #[test]
    fn rejects_non_finite() {
        let mut board = TopN::new(2);
        assert_eq!(board.insert(cand(f64::NAN, 0)), InsertResult::Skipped);
        assert_eq!(board.insert(cand(f64::INFINITY, 1)), InsertResult::Skipped);
        assert!(board.is_empty());
    }

    #[test]
    fn ties_prefer_earlier_rank() {
        let mut board = TopN::new(1);
        board.insert(cand(3.0, 10));
        assert_eq!(board.insert(cand(3.0, 4)), InsertResult::Replaced);
        assert_eq!(board.insert(cand(3.0, 7)), InsertResult::Skipped);
        assert_eq!(board.into_sorted_vec()[0].rank, 4);
    }

    #[test]
    fn sorted_output_breaks_ties_by_rank() {
        let mut board = TopN::new(4);
        board.insert(cand(2.0, 9));
        board.insert(cand(2.0, 3));
        board.insert(cand(5.0, 20));
        board.insert(cand(2.0, 6));
        let ranks: Vec<u64> = board.into_sorted_vec().iter().map(|c| c.rank).collect();
        assert_eq!(ranks, vec![20, 3, 6, 9]);
    }

    #[test]
    fn merge_matches_single_board() {
        let scores = [0.3, 1.2, 0.9, 1.2, 0.1, 2.2, 0.9, 1.7];
        let mut single = TopN::new(3);
        let mut left = TopN::new(3);
        let mut right = TopN::new(3);
        for (i, &s) in scores.iter().enumerate() {
            single.insert(cand(s, i as u64));
            if i % 2 == 0 {
                left.insert(cand(s, i as u64));
            } else {
                right.insert(cand(s, i as u64));
            }
        }
        right.merge(left);
        assert_eq!(right.into_sorted_vec(), single.into_sorted_vec());
    }

    #[test]
    fn admits_tracks_threshold() {
        let mut board = TopN::new(2);
        assert!(board.admits(-100.0));
        board.insert(cand(1.0, 0));
        board.insert(cand(2.0, 1));
        assert!(board.admits(1.0));
        assert!(!board.admits(0.99));
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut board = TopN::new(0);
        assert_eq!(board.insert(cand(1.0, 0)), InsertResult::Skipped);
        assert!(!board.admits(1.0));
    }
}
