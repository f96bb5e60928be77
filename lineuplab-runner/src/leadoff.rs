//! Picking where a lineup cycle should start.
//!
//! The cycle score is rotation invariant in its unweighted form, but the
//! first trip through the order is special: the leadoff hitter always bats
//! with the bases empty and the second hitter with at most one runner. For
//! each of the top cycles, every rotation is rescored with those short
//! sequence values, and the best starting order overall wins.

use serde::{Deserialize, Serialize};

use lineuplab_core::{Lineup, LineupKernel, ROSTER_SIZE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadoffSelection {
    pub lineup: Lineup,
    pub adjusted_score: f64,
    /// 1-based position of the source cycle in the ranking.
    pub cycle_rank: usize,
    /// Slots the source cycle was rotated left by.
    pub rotation: usize,
    /// How many top cycles were searched for this pick.
    pub cycles_evaluated: usize,
}

/// Best rotation across `cycles`, which are in ranking order. Ties keep the
/// earlier cycle, then the smaller rotation.
pub fn select_leadoff(cycles: &[Lineup], kernel: &LineupKernel<'_>) -> Option<LeadoffSelection> {
    let mut best: Option<LeadoffSelection> = None;
    for (idx, cycle) in cycles.iter().enumerate() {
        for rotation in 0..ROSTER_SIZE {
            let lineup = cycle.rotated(rotation);
            let adjusted_score = kernel.leadoff_adjusted_score(&lineup);
            if best.as_ref().map_or(true, |b| adjusted_score > b.adjusted_score) {
                best = Some(LeadoffSelection {
                    lineup,
                    adjusted_score,
                    cycle_rank: idx + 1,
                    rotation,
                    cycles_evaluated: cycles.len(),
                });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineuplab_core::table::distinct_tuples;
    use lineuplab_core::SequenceTable;

    fn flat_table() -> SequenceTable {
        let mut table = SequenceTable::zeroed();
        for t in distinct_tuples() {
            table.set(t, 0.1);
        }
        table
    }

    #[test]
    fn picks_rotation_with_best_leadoff() {
        let mut table = flat_table();
        table.set_leadoff(5, 1.0);
        let kernel = LineupKernel::new(&table);
        let cycle = Lineup::new([0, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();

        let pick = select_leadoff(&[cycle], &kernel).unwrap();
        assert_eq!(pick.rotation, 5);
        assert_eq!(pick.lineup.player_at(0), 5);
        assert_eq!(pick.cycle_rank, 1);
        assert_eq!(pick.adjusted_score, kernel.leadoff_adjusted_score(&pick.lineup));
    }

    #[test]
    fn pair_value_can_decide() {
        let mut table = flat_table();
        table.set_pair(3, 4, 2.0);
        let kernel = LineupKernel::new(&table);
        let cycle = Lineup::new([8, 7, 6, 5, 4, 3, 2, 1, 0]).unwrap();
        let other = Lineup::new([0, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();

        let pick = select_leadoff(&[cycle, other], &kernel).unwrap();
        assert_eq!(pick.cycle_rank, 2);
        assert_eq!(pick.cycles_evaluated, 2);
        assert_eq!(pick.lineup.order()[..2], [3, 4]);
    }

    #[test]
    fn ties_keep_first_cycle_and_rotation() {
        let table = flat_table();
        let kernel = LineupKernel::new(&table);
        let a = Lineup::new([0, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let b = Lineup::new([8, 7, 6, 5, 4, 3, 2, 1, 0]).unwrap();
        let pick = select_leadoff(&[a, b], &kernel).unwrap();
        assert_eq!(pick.cycle_rank, 1);
        assert_eq!(pick.rotation, 0);
    }

    #[test]
    fn no_cycles_no_pick() {
        let table = flat_table();
        assert!(select_leadoff(&[], &LineupKernel::new(&table)).is_none());
    }
}
