//! End-to-end optimization: validate inputs, build (or fetch) the sequence
//! table, search the constrained space, verify, and rank.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, OptimizerConfig};
use crate::leadoff::{select_leadoff, LeadoffSelection};
use crate::search::{search, SearchOptions, SearchOutcome, SearchSpace};
use crate::table_builder::build_table;
use lineuplab_core::{
    CacheKey, CandidateSpace, ConstraintError, ConstraintSet, ConstraintViolation,
    HandednessLimits, KeyValueCache, Lineup, LineupBreakdown, LineupError, LineupKernel, Player,
    RateModel, Roster, RosterError, SequenceScorer, SequenceTable, SlotAssignment, StatsError,
    TableError,
};

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("roster error: {0}")]
    Roster(#[from] RosterError),
    #[error("constraint conflict: {0}")]
    Constraint(#[from] ConstraintError),
    #[error("{0}")]
    Stats(#[from] StatsError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("table error: {0}")]
    Table(#[from] TableError),
    #[error("lineup error: {0}")]
    Lineup(#[from] LineupError),
    #[error("no valid lineup: {reason}")]
    NoValidLineup { reason: String },
    #[error("optimized lineup failed verification: {0}")]
    ConstraintViolated(#[from] ConstraintViolation),
}

/// Players plus the constraints to honor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationInput {
    pub players: Vec<Player>,
    #[serde(default)]
    pub fixed_slots: Vec<SlotAssignment>,
    #[serde(default)]
    pub limits: HandednessLimits,
}

impl OptimizationInput {
    pub fn new(players: Vec<Player>) -> Self {
        Self {
            players,
            ..Default::default()
        }
    }

    /// Pins `player` to 1-indexed `slot`.
    pub fn with_fixed_slot(mut self, player: impl Into<String>, slot: u8) -> Self {
        self.fixed_slots.push(SlotAssignment::new(player, slot));
        self
    }

    pub fn with_limits(mut self, limits: HandednessLimits) -> Self {
        self.limits = limits;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedLineup {
    pub lineup: Lineup,
    pub players: Vec<String>,
    pub score: f64,
    /// Generation rank within the candidate space.
    pub rank: u64,
}

/// Search result, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedLineups {
    pub entries: Vec<RankedLineup>,
    /// Best starting rotation among the top cycles, when requested.
    pub leadoff: Option<LeadoffSelection>,
    pub generated: u64,
    pub scored: u64,
    /// False when a deadline cut the search short.
    pub completed: bool,
}

impl RankedLineups {
    pub fn best(&self) -> Option<&RankedLineup> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An explicitly given order and its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredLineup {
    pub lineup: Lineup,
    pub players: Vec<String>,
    pub score: f64,
}

/// Search settings that change a ranking, part of its cache key.
#[derive(Serialize)]
struct RankingSettings {
    top_n: usize,
    leadoff_cycles: usize,
}

pub struct Optimizer {
    config: OptimizerConfig,
    scorer: SequenceScorer,
    table_cache: Option<Arc<dyn KeyValueCache<SequenceTable>>>,
    ranking_cache: Option<Arc<dyn KeyValueCache<RankedLineups>>>,
    deadline: Option<Instant>,
}

impl std::fmt::Debug for Optimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Optimizer")
            .field("config", &self.config)
            .field("table_cache", &self.table_cache.is_some())
            .field("ranking_cache", &self.ranking_cache.is_some())
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl Optimizer {
    pub fn new(config: OptimizerConfig) -> Result<Self, OptimizeError> {
        config.validate()?;
        Ok(Self {
            scorer: SequenceScorer::new(config.model.clone()),
            config,
            table_cache: None,
            ranking_cache: None,
            deadline: None,
        })
    }

    pub fn with_table_cache(mut self, cache: Arc<dyn KeyValueCache<SequenceTable>>) -> Self {
        self.table_cache = Some(cache);
        self
    }

    pub fn with_ranking_cache(mut self, cache: Arc<dyn KeyValueCache<RankedLineups>>) -> Self {
        self.ranking_cache = Some(cache);
        self
    }

    /// Batches not started by `deadline` are skipped and the result is
    /// marked incomplete.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn optimize(&self, input: &OptimizationInput) -> Result<RankedLineups, OptimizeError> {
        let roster = Roster::new(input.players.clone())?;
        let constraints = ConstraintSet::resolve(&input.fixed_slots, input.limits, &roster)?;

        let key = CacheKey::for_ranking(
            &roster,
            &self.config.model,
            &constraints,
            &RankingSettings {
                top_n: self.config.search.top_n,
                leadoff_cycles: self.config.search.leadoff_cycles,
            },
        );
        if let Some(hit) = self.ranking_cache.as_ref().and_then(|c| c.get(&key)) {
            info!(%key, "ranking served from cache");
            return Ok(hit);
        }

        let table = self.sequence_table(&roster)?;
        let ranked = self.rank_with_table(&roster, &constraints, &table)?;

        if ranked.completed {
            if let Some(cache) = &self.ranking_cache {
                cache.put(&key, &ranked);
            }
        }
        Ok(ranked)
    }

    /// Per-player rates; fails on the first degenerate stat line.
    pub fn rates(&self, roster: &Roster) -> Result<Vec<RateModel>, OptimizeError> {
        let splits = &self.config.model.splits;
        Ok(roster
            .players()
            .iter()
            .map(|p| RateModel::for_player(p, splits))
            .collect::<Result<Vec<_>, _>>()?)
    }

    pub fn sequence_table(&self, roster: &Roster) -> Result<SequenceTable, OptimizeError> {
        let rates = self.rates(roster)?;
        let key = CacheKey::for_table(roster, &self.config.model);
        if let Some(hit) = self.table_cache.as_ref().and_then(|c| c.get(&key)) {
            info!(%key, "sequence table served from cache");
            return Ok(hit);
        }

        let started = Instant::now();
        let table = build_table(&rates, &self.scorer, self.config.search.parallel)?;
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "sequence table built"
        );
        if let Some(cache) = &self.table_cache {
            cache.put(&key, &table);
        }
        Ok(table)
    }

    /// Searches with a ready table. Exposed so callers can supply their own.
    pub fn rank_with_table(
        &self,
        roster: &Roster,
        constraints: &ConstraintSet,
        table: &SequenceTable,
    ) -> Result<RankedLineups, OptimizeError> {
        let search_cfg = &self.config.search;
        let candidates = CandidateSpace::new(&constraints.fixed);
        let hands = roster.hands();
        let kernel = LineupKernel::new(table);
        info!(
            candidates = candidates.len(),
            fixed = constraints.fixed.count(),
            max_left = constraints.limits.max_consecutive_left,
            max_right = constraints.limits.max_consecutive_right,
            "searching lineups"
        );

        let started = Instant::now();
        let outcome = search(
            &SearchSpace {
                candidates: &candidates,
                kernel,
                hands: &hands,
                limits: constraints.limits,
            },
            &SearchOptions {
                top_n: search_cfg.retained(),
                batch_size: search_cfg.batch_size,
                parallel: search_cfg.parallel,
                deadline: self.deadline,
            },
        );
        info!(
            generated = outcome.generated,
            scored = outcome.scored,
            completed = outcome.completed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search finished"
        );

        if outcome.top.is_empty() {
            return Err(OptimizeError::NoValidLineup {
                reason: explain_empty(&outcome, &constraints.limits),
            });
        }

        let mut entries = Vec::with_capacity(outcome.top.len());
        for c in &outcome.top {
            let lineup = Lineup::from_permutation(c.order);
            constraints.verify(&lineup, &hands)?;
            entries.push(RankedLineup {
                lineup,
                players: lineup.names(roster),
                score: c.score,
                rank: c.rank,
            });
        }

        let leadoff = if search_cfg.leadoff_cycles > 0 && constraints.fixed.is_empty() {
            let cycles: Vec<Lineup> = entries
                .iter()
                .take(search_cfg.leadoff_cycles)
                .map(|e| e.lineup)
                .collect();
            let pick = select_leadoff(&cycles, &kernel);
            if let Some(p) = &pick {
                constraints.verify(&p.lineup, &hands)?;
                debug!(
                    cycle_rank = p.cycle_rank,
                    rotation = p.rotation,
                    adjusted_score = p.adjusted_score,
                    "leadoff rotation selected"
                );
            }
            pick
        } else {
            None
        };

        entries.truncate(search_cfg.top_n);
        Ok(RankedLineups {
            entries,
            leadoff,
            generated: outcome.generated,
            scored: outcome.scored,
            completed: outcome.completed,
        })
    }

    /// Scores explicit orders, best first. Ties keep input order.
    pub fn evaluate(&self, roster: &Roster, lineups: &[Lineup]) -> Result<Vec<ScoredLineup>, OptimizeError> {
        let table = self.sequence_table(roster)?;
        let kernel = LineupKernel::new(&table);
        let mut scored: Vec<ScoredLineup> = lineups
            .iter()
            .map(|l| ScoredLineup {
                lineup: *l,
                players: l.names(roster),
                score: kernel.score(l),
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(scored)
    }

    /// Per-slot contributions of one order.
    pub fn breakdown(&self, roster: &Roster, lineup: &Lineup) -> Result<LineupBreakdown, OptimizeError> {
        let table = self.sequence_table(roster)?;
        Ok(LineupKernel::new(&table).breakdown(lineup))
    }
}

/// Names the limit(s) that emptied the candidate space.
fn explain_empty(outcome: &SearchOutcome, limits: &HandednessLimits) -> String {
    if outcome.generated == 0 {
        return "deadline passed before any lineup was evaluated".into();
    }
    let left_all = limits.max_consecutive_left > 0 && outcome.left_violations == outcome.generated;
    let right_all = limits.max_consecutive_right > 0 && outcome.right_violations == outcome.generated;
    let left = format!(
        "max {} consecutive left-handed batters",
        limits.max_consecutive_left
    );
    let right = format!(
        "max {} consecutive right-handed batters",
        limits.max_consecutive_right
    );
    let scope = if outcome.skipped_batches > 0 {
        "every lineup checked"
    } else {
        "every lineup"
    };
    let cause = match (left_all, right_all) {
        (true, true) => format!("{left} and {right} each rule out {scope}"),
        (true, false) => format!("{left} rules out {scope}"),
        (false, true) => format!("{right} rules out {scope}"),
        (false, false) => format!("{left} combined with {right} rule out {scope}"),
    };
    let mut msg = format!(
        "{cause} ({} of {} candidates rejected: {} by the left limit, {} by the right)",
        outcome.rejected(),
        outcome.generated,
        outcome.left_violations,
        outcome.right_violations
    );
    if outcome.skipped_batches > 0 {
        msg.push_str(&format!(
            "; deadline reached with {} batches unchecked",
            outcome.skipped_batches
        ));
    }
    msg
}

/// One-shot optimization with `config`.
pub fn optimize(input: &OptimizationInput, config: &OptimizerConfig) -> Result<RankedLineups, OptimizeError> {
    Optimizer::new(config.clone())?.optimize(input)
}
