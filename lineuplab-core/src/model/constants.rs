//! Tunable model constants: run expectancy and advancement splits.
//!
//! Everything here can be overridden from the `[model]` table of
//! `lineuplab.toml`; the defaults are the league RE24 matrix and the
//! quarter-split advancement factors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base configurations, indexed by bitmask (bit 0 = first base).
pub const BASE_CONFIGS: usize = 8;

/// Outs at which a batter can still come up.
pub const LIVE_OUTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("run expectancy for bases {bases:03b} with {outs} outs is not finite")]
    NonFiniteRunExpectancy { bases: usize, outs: usize },
    #[error("advancement factor for sequence slot {slot} must be within [0, 1], got {value}")]
    AdvanceOutOfRange { slot: usize, value: f64 },
    #[error("out split '{name}' must be finite and non-negative, got {value}")]
    InvalidOutSplit { name: &'static str, value: f64 },
    #[error("out splits must not all be zero")]
    EmptyOutSplits,
}

/// Expected runs for the rest of the half-inning from each base/out state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunExpectancy {
    /// `values[bases][outs]` for outs 0..=2.
    pub values: [[f64; LIVE_OUTS]; BASE_CONFIGS],
}

impl Default for RunExpectancy {
    fn default() -> Self {
        Self {
            values: [
                [0.48, 0.25, 0.10], // ---
                [0.86, 0.51, 0.22], // 1--
                [1.10, 0.66, 0.32], // -2-
                [1.44, 0.88, 0.43], // 12-
                [1.35, 0.95, 0.35], // --3
                [1.78, 1.13, 0.48], // 1-3
                [1.96, 1.38, 0.58], // -23
                [2.29, 1.54, 0.75], // 123
            ],
        }
    }
}

impl RunExpectancy {
    /// Zero once the inning is over.
    #[inline]
    pub fn get(&self, bases: u8, outs: u8) -> f64 {
        if usize::from(outs) >= LIVE_OUTS {
            return 0.0;
        }
        self.values[usize::from(bases) & (BASE_CONFIGS - 1)][usize::from(outs)]
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        for (bases, row) in self.values.iter().enumerate() {
            for (outs, v) in row.iter().enumerate() {
                if !v.is_finite() {
                    return Err(ModelError::NonFiniteRunExpectancy { bases, outs });
                }
            }
        }
        Ok(())
    }
}

/// How often runners take the extra base, and how outs with a runner on
/// first resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitFactors {
    /// Extra-base probability for a runner, by the sequence slot they
    /// batted in. Slots past the end reuse the last entry.
    pub plus: [f64; 4],
    pub double_play: f64,
    pub fielders_choice: f64,
    pub advance_runner: f64,
    pub pop_up: f64,
}

impl Default for SplitFactors {
    fn default() -> Self {
        Self {
            plus: [0.25, 0.25, 0.20, 0.20],
            double_play: 0.25,
            fielders_choice: 0.25,
            advance_runner: 0.25,
            pop_up: 0.25,
        }
    }
}

impl SplitFactors {
    #[inline]
    pub fn plus_for(&self, slot: u8) -> f64 {
        let idx = usize::from(slot).min(self.plus.len() - 1);
        self.plus[idx]
    }

    /// Double play, fielder's choice, advance runner, pop-up; summing to 1.
    pub fn out_weights(&self) -> [f64; 4] {
        let raw = [
            self.double_play,
            self.fielders_choice,
            self.advance_runner,
            self.pop_up,
        ];
        let total: f64 = raw.iter().sum();
        if total <= 0.0 {
            return [0.0, 0.0, 0.0, 1.0];
        }
        raw.map(|w| w / total)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        for (slot, &value) in self.plus.iter().enumerate() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ModelError::AdvanceOutOfRange { slot, value });
            }
        }
        let named = [
            ("double_play", self.double_play),
            ("fielders_choice", self.fielders_choice),
            ("advance_runner", self.advance_runner),
            ("pop_up", self.pop_up),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(ModelError::InvalidOutSplit { name, value });
            }
        }
        if named.iter().all(|(_, v)| *v == 0.0) {
            return Err(ModelError::EmptyOutSplits);
        }
        Ok(())
    }
}

/// All constants the sequence scorer depends on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConstants {
    pub run_expectancy: RunExpectancy,
    pub splits: SplitFactors,
}

impl ModelConstants {
    pub fn validate(&self) -> Result<(), ModelError> {
        self.run_expectancy.validate()?;
        self.splits.validate()
    }
}
