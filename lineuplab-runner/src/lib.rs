//! LineupLab Runner: optimization orchestration on top of `lineuplab-core`.
//!
//! This crate provides:
//! - TOML configuration for the search and the run-value model
//! - Parallel sequence-table construction
//! - Batched exhaustive search with deterministic top-N leaderboards
//! - Leadoff rotation selection
//! - The end-to-end optimizer with table and ranking caches
//! - A directory-backed cache, JSON request/response handling and CSV export

pub mod cache;
pub mod config;
pub mod export;
pub mod leaderboard;
pub mod leadoff;
pub mod optimizer;
pub mod request;
pub mod search;
pub mod table_builder;

pub use cache::DirCache;
pub use config::{ConfigError, OptimizerConfig, SearchConfig};
pub use export::{export_breakdown_csv, export_json, export_rankings_csv, export_table_csv, import_json};
pub use leaderboard::{InsertResult, RankedCandidate, TopN};
pub use leadoff::{select_leadoff, LeadoffSelection};
pub use optimizer::{
    optimize, OptimizationInput, OptimizeError, Optimizer, RankedLineup, RankedLineups,
    ScoredLineup,
};
pub use request::{error_json, response_json, LineupRequest, RequestError};
pub use search::{search, SearchOptions, SearchOutcome, SearchSpace};
pub use table_builder::build_table;

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn optimizer_is_send_sync() {
        assert_send::<Optimizer>();
        assert_sync::<Optimizer>();
    }

    #[test]
    fn results_are_send_sync() {
        assert_send::<RankedLineups>();
        assert_sync::<RankedLineups>();
        assert_send::<SearchOutcome>();
        assert_sync::<SearchOutcome>();
        assert_send::<TopN>();
        assert_sync::<TopN>();
    }

    #[test]
    fn caches_are_send_sync() {
        assert_send::<DirCache>();
        assert_sync::<DirCache>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<OptimizeError>();
        assert_sync::<OptimizeError>();
        assert_send::<RequestError>();
        assert_sync::<RequestError>();
    }
}
