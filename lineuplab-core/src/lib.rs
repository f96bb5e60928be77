//! LineupLab Core: run-production model and candidate space for batting
//! order optimization.
//!
//! This crate contains the pure, single-threaded parts of the optimizer:
//! - Domain types (players, stats, rosters, lineups)
//! - Per-player outcome rates derived from season totals
//! - A half-inning Markov model that values short batting sequences
//! - The dense sequence table and the weighted lineup kernel over it
//! - Fixed-slot and handedness constraints
//! - Rank-addressable candidate enumeration
//! - Cache keys and the cache abstraction

pub mod cache;
pub mod constraints;
pub mod domain;
pub mod fingerprint;
pub mod kernel;
pub mod model;
pub mod permute;
pub mod rates;
pub mod table;

pub use cache::{KeyValueCache, MemoryCache};
pub use constraints::{
    circular_runs, ConstraintError, ConstraintSet, ConstraintViolation, FixedSlots, HandRuns,
    HandednessLimits, SlotAssignment,
};
pub use domain::{
    Handedness, Lineup, LineupError, Player, PlayerStats, Roster, RosterError, SlashLine,
    ROSTER_SIZE,
};
pub use fingerprint::CacheKey;
pub use kernel::{LineupBreakdown, LineupKernel, SlotContribution};
pub use model::{ModelConstants, ModelError, RunExpectancy, SequenceScorer, SplitFactors};
pub use permute::CandidateSpace;
pub use rates::{RateModel, StatsError, StatsIssue};
pub use table::{SequenceTable, TableError};
