//! Fixed batting slots and handedness-run limits.

use crate::domain::{Handedness, Lineup, Roster, ROSTER_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems with the requested constraints themselves, found before search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error("slot {slot} is claimed by both '{first}' and '{second}'")]
    SlotConflict {
        slot: u8,
        first: String,
        second: String,
    },
    #[error("'{player}' is fixed to slot {slot}; slots run from 1 to 9")]
    SlotOutOfRange { player: String, slot: u8 },
    #[error("'{0}' is fixed to a slot but is not on the roster")]
    UnknownPlayer(String),
    #[error("'{player}' is fixed to both slot {first} and slot {second}")]
    PlayerFixedTwice { player: String, first: u8, second: u8 },
}

/// A lineup that breaks a constraint it was supposed to satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    #[error("slot {slot} should hold roster index {expected}, found {found}")]
    FixedSlotMoved {
        slot: u8,
        expected: usize,
        found: usize,
    },
    #[error("{run} consecutive left-handed batters exceeds the limit of {limit}")]
    LeftRun { run: usize, limit: u32 },
    #[error("{run} consecutive right-handed batters exceeds the limit of {limit}")]
    RightRun { run: usize, limit: u32 },
}

/// A request to bat `player` in 1-indexed `slot`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub player: String,
    pub slot: u8,
}

impl SlotAssignment {
    pub fn new(player: impl Into<String>, slot: u8) -> Self {
        Self {
            player: player.into(),
            slot,
        }
    }
}

/// Roster index pinned to each 0-indexed slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedSlots {
    by_slot: [Option<usize>; ROSTER_SIZE],
}

impl FixedSlots {
    pub fn none() -> Self {
        Self::default()
    }

    /// Resolves names against the roster and checks that no slot or player
    /// is claimed twice.
    pub fn resolve(assignments: &[SlotAssignment], roster: &Roster) -> Result<Self, ConstraintError> {
        let mut by_slot = [None; ROSTER_SIZE];
        let mut slot_of_player: [Option<u8>; ROSTER_SIZE] = [None; ROSTER_SIZE];
        for a in assignments {
            if a.slot < 1 || usize::from(a.slot) > ROSTER_SIZE {
                return Err(ConstraintError::SlotOutOfRange {
                    player: a.player.clone(),
                    slot: a.slot,
                });
            }
            let idx = roster
                .index_of(&a.player)
                .ok_or_else(|| ConstraintError::UnknownPlayer(a.player.clone()))?;
            let zero_based = usize::from(a.slot - 1);
            if let Some(prev) = by_slot[zero_based] {
                if prev != idx {
                    return Err(ConstraintError::SlotConflict {
                        slot: a.slot,
                        first: roster.name(prev).to_string(),
                        second: a.player.clone(),
                    });
                }
            }
            if let Some(prev_slot) = slot_of_player[idx] {
                if prev_slot != a.slot {
                    return Err(ConstraintError::PlayerFixedTwice {
                        player: a.player.clone(),
                        first: prev_slot,
                        second: a.slot,
                    });
                }
            }
            by_slot[zero_based] = Some(idx);
            slot_of_player[idx] = Some(a.slot);
        }
        Ok(Self { by_slot })
    }

    /// Pins by roster index and 0-indexed slot, for callers that already
    /// hold indices.
    pub fn from_indices(pairs: &[(usize, usize)]) -> Result<Self, ConstraintError> {
        let mut by_slot: [Option<usize>; ROSTER_SIZE] = [None; ROSTER_SIZE];
        let mut slot_of_player: [Option<usize>; ROSTER_SIZE] = [None; ROSTER_SIZE];
        for &(player, slot) in pairs {
            if slot >= ROSTER_SIZE {
                return Err(ConstraintError::SlotOutOfRange {
                    player: player.to_string(),
                    slot: u8::try_from(slot + 1).unwrap_or(u8::MAX),
                });
            }
            if player >= ROSTER_SIZE {
                return Err(ConstraintError::UnknownPlayer(player.to_string()));
            }
            if let Some(prev) = by_slot[slot].filter(|&prev| prev != player) {
                return Err(ConstraintError::SlotConflict {
                    slot: (slot + 1) as u8,
                    first: prev.to_string(),
                    second: player.to_string(),
                });
            }
            if let Some(prev_slot) = slot_of_player[player].filter(|&s| s != slot) {
                return Err(ConstraintError::PlayerFixedTwice {
                    player: player.to_string(),
                    first: (prev_slot + 1) as u8,
                    second: (slot + 1) as u8,
                });
            }
            by_slot[slot] = Some(player);
            slot_of_player[player] = Some(slot);
        }
        Ok(Self { by_slot })
    }

    pub fn player_at(&self, slot: usize) -> Option<usize> {
        self.by_slot[slot]
    }

    pub fn slot_of(&self, player: usize) -> Option<usize> {
        self.by_slot.iter().position(|&p| p == Some(player))
    }

    pub fn is_fixed(&self, player: usize) -> bool {
        self.slot_of(player).is_some()
    }

    pub fn count(&self) -> usize {
        self.by_slot.iter().filter(|p| p.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn template(&self) -> [Option<usize>; ROSTER_SIZE] {
        self.by_slot
    }
}

/// Longest circular same-side runs. Zero disables a side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandednessLimits {
    #[serde(default)]
    pub max_consecutive_left: u32,
    #[serde(default)]
    pub max_consecutive_right: u32,
}

impl HandednessLimits {
    pub fn new(max_consecutive_left: u32, max_consecutive_right: u32) -> Self {
        Self {
            max_consecutive_left,
            max_consecutive_right,
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.max_consecutive_left == 0 && self.max_consecutive_right == 0
    }

    pub fn left_exceeded(&self, runs: &HandRuns) -> bool {
        self.max_consecutive_left > 0 && runs.left > self.max_consecutive_left as usize
    }

    pub fn right_exceeded(&self, runs: &HandRuns) -> bool {
        self.max_consecutive_right > 0 && runs.right > self.max_consecutive_right as usize
    }

    pub fn admits(&self, runs: &HandRuns) -> bool {
        !self.left_exceeded(runs) && !self.right_exceeded(runs)
    }
}

/// Longest same-side streaks, counting across the 9-to-1 wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandRuns {
    pub left: usize,
    pub right: usize,
}

/// Scans the order twice around so a streak through the ninth slot back
/// into the leadoff is counted whole. Runs are capped at the lineup length.
pub fn circular_runs(order: &[usize; ROSTER_SIZE], hands: &[Handedness; ROSTER_SIZE]) -> HandRuns {
    let mut runs = HandRuns::default();
    let (mut left, mut right) = (0usize, 0usize);
    for i in 0..2 * ROSTER_SIZE {
        match hands[order[i % ROSTER_SIZE]] {
            Handedness::Left => {
                left += 1;
                right = 0;
            }
            Handedness::Right => {
                right += 1;
                left = 0;
            }
            Handedness::Switch => {
                left = 0;
                right = 0;
            }
        }
        runs.left = runs.left.max(left.min(ROSTER_SIZE));
        runs.right = runs.right.max(right.min(ROSTER_SIZE));
    }
    runs
}

/// Fixed slots plus handedness limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ConstraintSet {
    pub fixed: FixedSlots,
    pub limits: HandednessLimits,
}

impl ConstraintSet {
    pub fn new(fixed: FixedSlots, limits: HandednessLimits) -> Self {
        Self { fixed, limits }
    }

    pub fn resolve(
        assignments: &[SlotAssignment],
        limits: HandednessLimits,
        roster: &Roster,
    ) -> Result<Self, ConstraintError> {
        Ok(Self {
            fixed: FixedSlots::resolve(assignments, roster)?,
            limits,
        })
    }

    /// Checks a finished lineup against every constraint.
    pub fn verify(&self, lineup: &Lineup, hands: &[Handedness; ROSTER_SIZE]) -> Result<(), ConstraintViolation> {
        for slot in 0..ROSTER_SIZE {
            if let Some(expected) = self.fixed.player_at(slot) {
                let found = lineup.player_at(slot);
                if found != expected {
                    return Err(ConstraintViolation::FixedSlotMoved {
                        slot: (slot + 1) as u8,
                        expected,
                        found,
                    });
                }
            }
        }
        let runs = circular_runs(lineup.order(), hands);
        if self.limits.left_exceeded(&runs) {
            return Err(ConstraintViolation::LeftRun {
                run: runs.left,
                limit: self.limits.max_consecutive_left,
            });
        }
        if self.limits.right_exceeded(&runs) {
            return Err(ConstraintViolation::RightRun {
                run: runs.right,
                limit: self.limits.max_consecutive_right,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Player, PlayerStats};
    use crate::domain::Handedness::{Left as L, Right as R, Switch as S};

    const IDENTITY: [usize; 9] = [0, 1, 2, 3, 4, 5, 6, 7, 8];

    fn roster() -> Roster {
        let players = (0..9)
            .map(|i| {
                Player::new(
                    format!("P{i}"),
                    PlayerStats {
                        pa: 100,
                        h: 20,
                        ..Default::default()
                    },
                    R,
                )
            })
            .collect();
        Roster::new(players).unwrap()
    }

    #[test]
    fn wrap_around_run_is_counted() {
        let hands = [R, R, L, L, L, R, R, R, R];
        let runs = circular_runs(&IDENTITY, &hands);
        assert_eq!(runs.right, 6);
        assert_eq!(runs.left, 3);
        assert!(!HandednessLimits::new(0, 3).admits(&runs));
    }

    #[test]
    fn boundary_run_is_admitted() {
        let hands = [L, L, R, R, R, L, L, R, R];
        let runs = circular_runs(&IDENTITY, &hands);
        assert_eq!(runs.right, 3);
        assert_eq!(runs.left, 2);
        assert!(HandednessLimits::new(0, 3).admits(&runs));
        assert!(!HandednessLimits::new(0, 2).admits(&runs));
    }

    #[test]
    fn switch_hitter_breaks_runs() {
        let hands = [L, L, S, L, L, S, L, L, S];
        let runs = circular_runs(&IDENTITY, &hands);
        assert_eq!(runs.left, 2);
        assert!(HandednessLimits::new(2, 0).admits(&runs));
    }

    #[test]
    fn all_same_side_caps_at_nine() {
        let runs = circular_runs(&IDENTITY, &[R; 9]);
        assert_eq!(runs.right, 9);
        assert_eq!(runs.left, 0);
    }

    #[test]
    fn zero_limit_is_unconstrained() {
        let runs = circular_runs(&IDENTITY, &[L; 9]);
        let limits = HandednessLimits::default();
        assert!(limits.is_unconstrained());
        assert!(limits.admits(&runs));
    }

    #[test]
    fn runs_follow_order_not_roster() {
        let hands = [L, L, L, R, R, R, R, R, R];
        let interleaved = [0, 3, 1, 4, 2, 5, 6, 7, 8];
        let runs = circular_runs(&interleaved, &hands);
        assert_eq!(runs.left, 1);
        assert_eq!(runs.right, 4);
    }

    #[test]
    fn resolve_maps_names_to_slots() {
        let fixed = FixedSlots::resolve(
            &[SlotAssignment::new("P4", 1), SlotAssignment::new("P0", 9)],
            &roster(),
        )
        .unwrap();
        assert_eq!(fixed.count(), 2);
        assert_eq!(fixed.player_at(0), Some(4));
        assert_eq!(fixed.player_at(8), Some(0));
        assert_eq!(fixed.slot_of(4), Some(0));
        assert!(!fixed.is_fixed(1));
    }

    #[test]
    fn resolve_rejects_double_booked_slot() {
        let err = FixedSlots::resolve(
            &[SlotAssignment::new("P1", 3), SlotAssignment::new("P2", 3)],
            &roster(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConstraintError::SlotConflict {
                slot: 3,
                first: "P1".into(),
                second: "P2".into()
            }
        );
    }

    #[test]
    fn resolve_rejects_bad_slot_and_unknown_player() {
        let r = roster();
        assert!(matches!(
            FixedSlots::resolve(&[SlotAssignment::new("P1", 0)], &r),
            Err(ConstraintError::SlotOutOfRange { slot: 0, .. })
        ));
        assert!(matches!(
            FixedSlots::resolve(&[SlotAssignment::new("P1", 10)], &r),
            Err(ConstraintError::SlotOutOfRange { slot: 10, .. })
        ));
        assert_eq!(
            FixedSlots::resolve(&[SlotAssignment::new("Nobody", 2)], &r),
            Err(ConstraintError::UnknownPlayer("Nobody".into()))
        );
        assert!(matches!(
            FixedSlots::resolve(
                &[SlotAssignment::new("P1", 2), SlotAssignment::new("P1", 5)],
                &r
            ),
            Err(ConstraintError::PlayerFixedTwice { first: 2, second: 5, .. })
        ));
    }

    #[test]
    fn verify_catches_moved_player() {
        let fixed = FixedSlots::from_indices(&[(4, 0)]).unwrap();
        let set = ConstraintSet::new(fixed, HandednessLimits::default());
        let hands = [R; 9];
        let ok = Lineup::new([4, 0, 1, 2, 3, 5, 6, 7, 8]).unwrap();
        assert!(set.verify(&ok, &hands).is_ok());
        let moved = Lineup::new(IDENTITY).unwrap();
        assert_eq!(
            set.verify(&moved, &hands),
            Err(ConstraintViolation::FixedSlotMoved {
                slot: 1,
                expected: 4,
                found: 0
            })
        );
    }

    #[test]
    fn verify_reports_handedness_run() {
        let set = ConstraintSet::new(FixedSlots::none(), HandednessLimits::new(2, 0));
        let hands = [L, L, L, R, R, R, R, R, R];
        let lineup = Lineup::new(IDENTITY).unwrap();
        assert_eq!(
            set.verify(&lineup, &hands),
            Err(ConstraintViolation::LeftRun { run: 3, limit: 2 })
        );
    }

    #[test]
    fn from_indices_rejects_conflicts() {
        assert!(matches!(
            FixedSlots::from_indices(&[(1, 0), (2, 0)]),
            Err(ConstraintError::SlotConflict { slot: 1, .. })
        ));
        assert!(matches!(
            FixedSlots::from_indices(&[(1, 0), (1, 4)]),
            Err(ConstraintError::PlayerFixedTwice { first: 1, second: 5, .. })
        ));
    }

    #[test]
    fn from_indices_places_players_and_names_conflicts() {
        let fixed = FixedSlots::from_indices(&[(3, 0), (7, 8), (3, 0)]).unwrap();
        assert_eq!(fixed.player_at(0), Some(3));
        assert_eq!(fixed.player_at(8), Some(7));
        assert_eq!(fixed.slot_of(7), Some(8));
        assert_eq!(fixed.count(), 2);

        let err = FixedSlots::from_indices(&[(3, 2), (6, 2)]).unwrap_err();
        assert_eq!(
            err,
            ConstraintError::SlotConflict {
                slot: 3,
                first: "3".into(),
                second: "6".into(),
            }
        );
    }
}
