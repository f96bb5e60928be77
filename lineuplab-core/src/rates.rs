//! Per-plate-appearance outcome probabilities derived from season totals.

use crate::domain::{Player, PlayerStats};
use crate::model::constants::SplitFactors;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a stat line cannot be turned into rates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsIssue {
    #[error("plate appearances must be positive")]
    NoPlateAppearances,
    #[error("{hits} hits is fewer than {extra_base_hits} doubles, triples and home runs")]
    HitsBelowExtraBaseHits { hits: u32, extra_base_hits: u64 },
    #[error("{on_base} hits and walks exceed {pa} plate appearances")]
    OnBaseExceedsPlateAppearances { on_base: u64, pa: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid stats for '{player}': {issue}")]
pub struct StatsError {
    pub player: String,
    #[source]
    pub issue: StatsIssue,
}

/// A probability split into its extra-base ("plus") and
/// station-to-station ("minus") parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split {
    pub plus: f64,
    pub minus: f64,
}

/// Outcome probabilities for one batter. The six primary rates sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateModel {
    pub out: f64,
    pub single: f64,
    pub double: f64,
    pub triple: f64,
    pub home_run: f64,
    pub walk: f64,
    pub double_play: f64,
    pub fielders_choice: f64,
    pub advance_runner: f64,
    pub pop_up: f64,
}

impl RateModel {
    pub fn from_stats(stats: &PlayerStats, splits: &SplitFactors) -> Result<Self, StatsIssue> {
        if stats.pa == 0 {
            return Err(StatsIssue::NoPlateAppearances);
        }
        let extra_base_hits = stats.extra_base_hits();
        if u64::from(stats.h) < extra_base_hits {
            return Err(StatsIssue::HitsBelowExtraBaseHits {
                hits: stats.h,
                extra_base_hits,
            });
        }
        let on_base = u64::from(stats.h) + stats.walk_equivalents();
        if on_base > u64::from(stats.pa) {
            return Err(StatsIssue::OnBaseExceedsPlateAppearances {
                on_base,
                pa: stats.pa,
            });
        }

        let pa = f64::from(stats.pa);
        let out = (u64::from(stats.pa) - on_base) as f64 / pa;
        let [dp, fc, adv, pop] = splits.out_weights();
        Ok(Self {
            out,
            single: (u64::from(stats.h) - extra_base_hits) as f64 / pa,
            double: f64::from(stats.doubles) / pa,
            triple: f64::from(stats.triples) / pa,
            home_run: f64::from(stats.hr) / pa,
            walk: stats.walk_equivalents() as f64 / pa,
            double_play: out * dp,
            fielders_choice: out * fc,
            advance_runner: out * adv,
            pop_up: out * pop,
        })
    }

    pub fn for_player(player: &Player, splits: &SplitFactors) -> Result<Self, StatsError> {
        Self::from_stats(&player.stats, splits).map_err(|issue| StatsError {
            player: player.name.clone(),
            issue,
        })
    }

    /// Sum of the six primary outcome rates.
    pub fn total(&self) -> f64 {
        self.out + self.single + self.double + self.triple + self.home_run + self.walk
    }

    /// Single split by the extra-base factor of the runner it concerns.
    #[inline]
    pub fn single_split(&self, plus: f64) -> Split {
        Split {
            plus: self.single * plus,
            minus: self.single * (1.0 - plus),
        }
    }

    #[inline]
    pub fn double_split(&self, plus: f64) -> Split {
        Split {
            plus: self.double * plus,
            minus: self.double * (1.0 - plus),
        }
    }
}
