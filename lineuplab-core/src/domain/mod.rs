//! Domain types: players, rosters, and batting orders.

pub mod lineup;
pub mod player;
pub mod roster;

pub use lineup::{Lineup, LineupError, TUPLE_LEN};
pub use player::{Handedness, Player, PlayerStats, SlashLine};
pub use roster::{Roster, RosterError, ROSTER_SIZE};
