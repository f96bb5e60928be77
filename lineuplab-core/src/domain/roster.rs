use super::player::{Handedness, Player};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Batters in a lineup.
pub const ROSTER_SIZE: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("roster must contain exactly {ROSTER_SIZE} players, got {0}")]
    WrongSize(usize),
    #[error("player '{0}' appears more than once")]
    DuplicatePlayer(String),
    #[error("player at roster index {0} has an empty name")]
    EmptyName(usize),
}

/// Nine distinct players. Roster index order is the input order and drives
/// candidate generation order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Player>", into = "Vec<Player>")]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new(players: Vec<Player>) -> Result<Self, RosterError> {
        if players.len() != ROSTER_SIZE {
            return Err(RosterError::WrongSize(players.len()));
        }
        let mut seen = HashSet::with_capacity(ROSTER_SIZE);
        for (idx, p) in players.iter().enumerate() {
            if p.name.trim().is_empty() {
                return Err(RosterError::EmptyName(idx));
            }
            if !seen.insert(p.name.as_str()) {
                return Err(RosterError::DuplicatePlayer(p.name.clone()));
            }
        }
        Ok(Self { players })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, idx: usize) -> &Player {
        &self.players[idx]
    }

    pub fn name(&self, idx: usize) -> &str {
        &self.players[idx].name
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name == name)
    }

    /// Batting side per roster index, for the handedness filter.
    pub fn hands(&self) -> [Handedness; ROSTER_SIZE] {
        let mut hands = [Handedness::Right; ROSTER_SIZE];
        for (slot, p) in hands.iter_mut().zip(&self.players) {
            *slot = p.hand;
        }
        hands
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl TryFrom<Vec<Player>> for Roster {
    type Error = RosterError;

    fn try_from(players: Vec<Player>) -> Result<Self, Self::Error> {
        Self::new(players)
    }
}

impl From<Roster> for Vec<Player> {
    fn from(roster: Roster) -> Self {
        roster.players
    }
}
