//! Rank-addressable enumeration of the lineups allowed by fixed slots.
//!
//! Free players (those not pinned) fill the open slots in every order. The
//! orders are generated lexicographically over roster index, so rank 0 puts
//! the free players in roster order and rank `len() - 1` reverses them. Any
//! rank can be unranked directly, which lets callers cut the space into
//! independent batches.

use crate::constraints::FixedSlots;
use crate::domain::ROSTER_SIZE;

/// `n!` for `n <= 20`.
pub fn factorial(n: usize) -> u64 {
    (1..=n as u64).product()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSpace {
    template: [Option<usize>; ROSTER_SIZE],
    open_slots: Vec<usize>,
    free: Vec<usize>,
}

impl CandidateSpace {
    pub fn new(fixed: &FixedSlots) -> Self {
        let template = fixed.template();
        let open_slots = (0..ROSTER_SIZE).filter(|&s| template[s].is_none()).collect();
        let free = (0..ROSTER_SIZE).filter(|&p| !fixed.is_fixed(p)).collect();
        Self {
            template,
            open_slots,
            free,
        }
    }

    pub fn unconstrained() -> Self {
        Self::new(&FixedSlots::none())
    }

    /// Number of candidate lineups, `k!` for `k` free players.
    pub fn len(&self) -> u64 {
        factorial(self.free.len())
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn free_players(&self) -> &[usize] {
        &self.free
    }

    /// Lineup at lexicographic `rank`, or `None` past the end.
    pub fn candidate(&self, rank: u64) -> Option<[usize; ROSTER_SIZE]> {
        let perm = self.unrank(rank)?;
        Some(self.fill(&perm))
    }

    /// Iterates ranks `start..end` (clamped to the space).
    pub fn range(&self, start: u64, end: u64) -> CandidateIter<'_> {
        let end = end.min(self.len());
        CandidateIter {
            space: self,
            perm: if start < end { self.unrank(start) } else { None },
            rank: start,
            end,
        }
    }

    pub fn iter(&self) -> CandidateIter<'_> {
        self.range(0, self.len())
    }

    fn unrank(&self, mut rank: u64) -> Option<Vec<usize>> {
        if rank >= self.len() {
            return None;
        }
        let mut pool = self.free.clone();
        let mut perm = Vec::with_capacity(pool.len());
        for remaining in (1..=self.free.len()).rev() {
            let block = factorial(remaining - 1);
            let idx = (rank / block) as usize;
            rank %= block;
            perm.push(pool.remove(idx));
        }
        Some(perm)
    }

    fn fill(&self, perm: &[usize]) -> [usize; ROSTER_SIZE] {
        let mut order = [0usize; ROSTER_SIZE];
        for (slot, fixed) in self.template.iter().enumerate() {
            if let Some(p) = fixed {
                order[slot] = *p;
            }
        }
        for (&slot, &p) in self.open_slots.iter().zip(perm) {
            order[slot] = p;
        }
        order
    }
}

/// Steps `next_permutation` from an unranked start.
#[derive(Debug, Clone)]
pub struct CandidateIter<'a> {
    space: &'a CandidateSpace,
    perm: Option<Vec<usize>>,
    rank: u64,
    end: u64,
}

impl Iterator for CandidateIter<'_> {
    /// `(rank, order)`
    type Item = (u64, [usize; ROSTER_SIZE]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.rank >= self.end {
            return None;
        }
        let perm = self.perm.as_mut()?;
        let item = (self.rank, self.space.fill(perm));
        self.rank += 1;
        if self.rank < self.end && !next_permutation(perm) {
            self.perm = None;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.end.saturating_sub(self.rank) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for CandidateIter<'_> {}

/// Rearranges `items` into the next lexicographic permutation. Returns
/// `false`, leaving `items` untouched, when it is already the last one.
pub fn next_permutation<T: Ord>(items: &mut [T]) -> bool {
    if items.len() < 2 {
        return false;
    }
    let mut i = items.len() - 1;
    while i > 0 && items[i - 1] >= items[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = items.len() - 1;
    while items[j] <= items[i - 1] {
        j -= 1;
    }
    items.swap(i - 1, j);
    items[i..].reverse();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn factorials() {
        assert_eq!(factorial(0), 1);
        assert_eq!(factorial(4), 24);
        assert_eq!(factorial(9), 362_880);
    }

    #[test]
    fn next_permutation_walks_lexicographically() {
        let mut v = [1, 2, 3];
        let mut seen = vec![v];
        while next_permutation(&mut v) {
            seen.push(v);
        }
        assert_eq!(
            seen,
            vec![[1, 2, 3], [1, 3, 2], [2, 1, 3], [2, 3, 1], [3, 1, 2], [3, 2, 1]]
        );
        assert_eq!(v, [3, 2, 1]);
    }

    #[test]
    fn unconstrained_space_is_complete() {
        let space = CandidateSpace::unconstrained();
        assert_eq!(space.len(), 362_880);
        assert_eq!(space.candidate(0), Some([0, 1, 2, 3, 4, 5, 6, 7, 8]));
        assert_eq!(space.candidate(1), Some([0, 1, 2, 3, 4, 5, 6, 8, 7]));
        assert_eq!(space.candidate(362_879), Some([8, 7, 6, 5, 4, 3, 2, 1, 0]));
        assert_eq!(space.candidate(362_880), None);
    }

    #[test]
    fn range_matches_direct_unranking() {
        let space = CandidateSpace::unconstrained();
        for (rank, order) in space.range(40_310, 40_330) {
            assert_eq!(space.candidate(rank), Some(order));
        }
        assert_eq!(space.range(40_310, 40_330).count(), 20);
        assert_eq!(space.range(362_870, 400_000).count(), 10);
        assert_eq!(space.range(5, 5).count(), 0);
    }

    #[test]
    fn fixed_slots_shrink_space_and_stay_put() {
        let fixed = FixedSlots::from_indices(&[(6, 0), (2, 4), (0, 8)]).unwrap();
        let space = CandidateSpace::new(&fixed);
        assert_eq!(space.len(), 720);
        assert_eq!(space.free_players(), &[1, 3, 4, 5, 7, 8]);

        let mut distinct = HashSet::new();
        for (_, order) in space.iter() {
            assert_eq!(order[0], 6);
            assert_eq!(order[4], 2);
            assert_eq!(order[8], 0);
            distinct.insert(order);
        }
        assert_eq!(distinct.len(), 720);
        assert_eq!(space.candidate(0), Some([6, 1, 3, 4, 2, 5, 7, 8, 0]));
    }

    #[test]
    fn fully_fixed_space_has_one_candidate() {
        let pairs: Vec<(usize, usize)> = (0..9).map(|i| (i, 8 - i)).collect();
        let space = CandidateSpace::new(&FixedSlots::from_indices(&pairs).unwrap());
        assert_eq!(space.len(), 1);
        let all: Vec<_> = space.iter().collect();
        assert_eq!(all, vec![(0, [8, 7, 6, 5, 4, 3, 2, 1, 0])]);
    }
}
