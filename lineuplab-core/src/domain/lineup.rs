use super::roster::{Roster, ROSTER_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Players whose plate appearances make up one sequence value.
pub const TUPLE_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineupError {
    #[error("roster index {0} is out of range")]
    IndexOutOfRange(usize),
    #[error("roster index {0} appears more than once")]
    Repeated(usize),
    #[error("unknown player '{0}'")]
    UnknownPlayer(String),
    #[error("a lineup needs exactly {ROSTER_SIZE} players, got {0}")]
    WrongLength(usize),
}

/// A batting order: slot `i` bats `order[i]` (roster index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "[usize; ROSTER_SIZE]")]
pub struct Lineup([usize; ROSTER_SIZE]);

impl TryFrom<[usize; ROSTER_SIZE]> for Lineup {
    type Error = LineupError;

    fn try_from(order: [usize; ROSTER_SIZE]) -> Result<Self, Self::Error> {
        Self::new(order)
    }
}

impl Lineup {
    /// Validates that `order` is a permutation of `0..9`.
    pub fn new(order: [usize; ROSTER_SIZE]) -> Result<Self, LineupError> {
        let mut seen = [false; ROSTER_SIZE];
        for &idx in &order {
            if idx >= ROSTER_SIZE {
                return Err(LineupError::IndexOutOfRange(idx));
            }
            if seen[idx] {
                return Err(LineupError::Repeated(idx));
            }
            seen[idx] = true;
        }
        Ok(Self(order))
    }

    /// Wraps an order produced by candidate generation, which is a
    /// permutation by construction.
    pub fn from_permutation(order: [usize; ROSTER_SIZE]) -> Self {
        debug_assert!(Self::new(order).is_ok(), "not a permutation: {order:?}");
        Self(order)
    }

    pub fn from_names<S: AsRef<str>>(roster: &Roster, names: &[S]) -> Result<Self, LineupError> {
        if names.len() != ROSTER_SIZE {
            return Err(LineupError::WrongLength(names.len()));
        }
        let mut order = [0usize; ROSTER_SIZE];
        for (slot, name) in order.iter_mut().zip(names) {
            let name = name.as_ref();
            *slot = roster
                .index_of(name)
                .ok_or_else(|| LineupError::UnknownPlayer(name.to_string()))?;
        }
        Self::new(order)
    }

    pub fn order(&self) -> &[usize; ROSTER_SIZE] {
        &self.0
    }

    pub fn player_at(&self, slot: usize) -> usize {
        self.0[slot]
    }

    pub fn slot_of(&self, player: usize) -> Option<usize> {
        self.0.iter().position(|&p| p == player)
    }

    /// The four batters ending at `slot`, wrapping around the order.
    pub fn tuple_ending_at(&self, slot: usize) -> [usize; TUPLE_LEN] {
        tuple_ending_at(&self.0, slot)
    }

    /// The same cycle started `by` slots later.
    pub fn rotated(&self, by: usize) -> Self {
        let mut order = self.0;
        order.rotate_left(by % ROSTER_SIZE);
        Self(order)
    }

    pub fn names(&self, roster: &Roster) -> Vec<String> {
        self.0.iter().map(|&i| roster.name(i).to_string()).collect()
    }
}

/// Wrapping tuple lookup over a raw order; shared with the scoring hot path.
#[inline]
pub fn tuple_ending_at(order: &[usize; ROSTER_SIZE], slot: usize) -> [usize; TUPLE_LEN] {
    [
        order[(slot + ROSTER_SIZE - 3) % ROSTER_SIZE],
        order[(slot + ROSTER_SIZE - 2) % ROSTER_SIZE],
        order[(slot + ROSTER_SIZE - 1) % ROSTER_SIZE],
        order[slot],
    ]
}
