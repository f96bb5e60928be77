//! Weighted lineup score over the sequence table.
//!
//! Every slot contributes the value of the four-batter sequence ending with
//! it, weighted by how often that slot bats once more than the last slot in
//! a nine-inning game.

use crate::domain::lineup::tuple_ending_at;
use crate::domain::{Lineup, ROSTER_SIZE, TUPLE_LEN};
use crate::table::SequenceTable;
use serde::{Deserialize, Serialize};

/// `1 + (8 - slot) / 9` for slots 0..=7, `1` for the ninth.
#[inline]
pub fn slot_weight(slot: usize) -> f64 {
    if slot < ROSTER_SIZE - 1 {
        1.0 + (ROSTER_SIZE - 1 - slot) as f64 / ROSTER_SIZE as f64
    } else {
        1.0
    }
}

/// Weights used when comparing rotations of one cycle: `1 + (7 - slot) / 8`.
#[inline]
pub fn rotation_weight(slot: usize) -> f64 {
    if slot < ROSTER_SIZE - 1 {
        1.0 + (ROSTER_SIZE - 2 - slot) as f64 / (ROSTER_SIZE - 1) as f64
    } else {
        1.0
    }
}

/// One slot's share of a lineup score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotContribution {
    pub slot: usize,
    /// Roster indices, oldest first; the last is the batter in `slot`.
    pub tuple: [usize; TUPLE_LEN],
    pub base_value: f64,
    pub weight: f64,
    pub weighted_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupBreakdown {
    pub slots: Vec<SlotContribution>,
    /// Equals the kernel score.
    pub weighted_total: f64,
    /// Unweighted sum of the nine sequence values.
    pub cycle_total: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct LineupKernel<'a> {
    table: &'a SequenceTable,
}

impl<'a> LineupKernel<'a> {
    pub fn new(table: &'a SequenceTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a SequenceTable {
        self.table
    }

    /// Score of a raw order. Slots are summed in order so results are
    /// reproducible to the bit.
    #[inline]
    pub fn score_order(&self, order: &[usize; ROSTER_SIZE]) -> f64 {
        let mut total = 0.0;
        for slot in 0..ROSTER_SIZE {
            total += self.table.get(tuple_ending_at(order, slot)) * slot_weight(slot);
        }
        total
    }

    pub fn score(&self, lineup: &Lineup) -> f64 {
        self.score_order(lineup.order())
    }

    pub fn breakdown(&self, lineup: &Lineup) -> LineupBreakdown {
        let mut slots = Vec::with_capacity(ROSTER_SIZE);
        let mut weighted_total = 0.0;
        let mut cycle_total = 0.0;
        for slot in 0..ROSTER_SIZE {
            let tuple = lineup.tuple_ending_at(slot);
            let base_value = self.table.get(tuple);
            let weight = slot_weight(slot);
            let weighted_value = base_value * weight;
            weighted_total += weighted_value;
            cycle_total += base_value;
            slots.push(SlotContribution {
                slot,
                tuple,
                base_value,
                weight,
                weighted_value,
            });
        }
        LineupBreakdown {
            slots,
            weighted_total,
            cycle_total,
        }
    }

    /// Score of `lineup` as a starting order: rotation weights, with a fifth
    /// of the first two slots' cyclic values traded for the leadoff and
    /// second-batter values, which see no runners carried over.
    pub fn leadoff_adjusted_score(&self, lineup: &Lineup) -> f64 {
        let mut total = 0.0;
        for slot in 0..ROSTER_SIZE {
            total += self.table.get(lineup.tuple_ending_at(slot)) * rotation_weight(slot);
        }
        let first = lineup.player_at(0);
        let second = lineup.player_at(1);
        total -= self.table.get(lineup.tuple_ending_at(0)) / 5.0;
        total += self.table.leadoff(first);
        total -= self.table.get(lineup.tuple_ending_at(1)) / 5.0;
        total += self.table.pair(first, second);
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Table where a sequence is worth only its last batter's value.
    fn last_batter_table(values: [f64; ROSTER_SIZE]) -> SequenceTable {
        let mut table = SequenceTable::zeroed();
        for t in crate::table::distinct_tuples() {
            table.set(t, values[t[3]]);
        }
        table
    }

    #[test]
    fn weights_decrease_from_leadoff() {
        assert!((slot_weight(0) - 17.0 / 9.0).abs() < 1e-12);
        assert!((slot_weight(7) - 10.0 / 9.0).abs() < 1e-12);
        assert_eq!(slot_weight(8), 1.0);
        for s in 0..8 {
            assert!(slot_weight(s) > slot_weight(s + 1));
        }
        assert!((rotation_weight(0) - 1.875).abs() < 1e-12);
        assert_eq!(rotation_weight(7), 1.0);
        assert_eq!(rotation_weight(8), 1.0);
    }

    #[test]
    fn score_is_weighted_sum() {
        let values = [9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        let table = last_batter_table(values);
        let kernel = LineupKernel::new(&table);
        let lineup = Lineup::new([0, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let expected: f64 = (0..9).map(|s| values[s] * slot_weight(s)).sum();
        assert!((kernel.score(&lineup) - expected).abs() < 1e-12);
    }

    #[test]
    fn stronger_batter_earlier_scores_higher() {
        let values = [1.0, 2.0, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5];
        let table = last_batter_table(values);
        let kernel = LineupKernel::new(&table);
        let weak_first = Lineup::new([0, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let strong_first = Lineup::new([1, 0, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert!(kernel.score(&strong_first) > kernel.score(&weak_first));
    }

    #[test]
    fn breakdown_totals_agree_with_score() {
        let mut table = SequenceTable::zeroed();
        for (i, t) in crate::table::distinct_tuples().enumerate() {
            table.set(t, (i % 17) as f64 * 0.01);
        }
        let kernel = LineupKernel::new(&table);
        let lineup = Lineup::new([3, 7, 1, 0, 8, 2, 6, 4, 5]).unwrap();
        let b = kernel.breakdown(&lineup);
        assert_eq!(b.slots.len(), 9);
        assert_eq!(b.weighted_total, kernel.score(&lineup));
        let cycle: f64 = b.slots.iter().map(|s| s.base_value).sum();
        assert!((b.cycle_total - cycle).abs() < 1e-12);
        assert_eq!(b.slots[0].tuple, [6, 4, 5, 3]);
    }

    #[test]
    fn cycle_total_is_rotation_invariant() {
        let mut table = SequenceTable::zeroed();
        for (i, t) in crate::table::distinct_tuples().enumerate() {
            table.set(t, (i % 13) as f64 * 0.1);
        }
        let kernel = LineupKernel::new(&table);
        let lineup = Lineup::new([2, 5, 8, 1, 4, 7, 0, 3, 6]).unwrap();
        let base = kernel.breakdown(&lineup).cycle_total;
        for k in 1..9 {
            let rotated = kernel.breakdown(&lineup.rotated(k)).cycle_total;
            assert!((rotated - base).abs() < 1e-9);
        }
    }

    #[test]
    fn leadoff_adjustment_uses_short_sequences() {
        let table_plain = last_batter_table([1.0; 9]);
        let mut table = table_plain.clone();
        table.set_leadoff(0, 0.7);
        table.set_pair(0, 1, 0.4);
        let lineup = Lineup::new([0, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();

        let unadjusted: f64 = (0..9).map(rotation_weight).sum();
        let got = LineupKernel::new(&table).leadoff_adjusted_score(&lineup);
        let expected = unadjusted - 0.2 + 0.7 - 0.2 + 0.4;
        assert!((got - expected).abs() < 1e-12);
    }
}
