//! Optimizer configuration, loaded from `lineuplab.toml`.
//!
//! ```toml
//! [search]
//! top_n = 5
//! batch_size = 10000
//! parallel = true
//! leadoff_cycles = 15
//!
//! [model.splits]
//! plus = [0.25, 0.25, 0.20, 0.20]
//! double_play = 0.25
//!
//! [model.run_expectancy]
//! values = [[0.48, 0.25, 0.10], ...]
//! ```
//!
//! Every table and field is optional and falls back to its default.

use lineuplab_core::model::{ModelConstants, ModelError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid search setting: {0}")]
    Search(String),
    #[error("invalid model constants: {0}")]
    Model(#[from] ModelError),
}

/// How the candidate space is walked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Lineups kept in the final ranking.
    pub top_n: usize,
    /// Candidates per work unit.
    pub batch_size: usize,
    /// Evaluate batches on the rayon pool.
    pub parallel: bool,
    /// When non-zero and no slot is fixed, re-rank this many top cycles by
    /// their best starting rotation.
    pub leadoff_cycles: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_n: 1,
            batch_size: 10_000,
            parallel: true,
            leadoff_cycles: 0,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::Search("top_n must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::Search("batch_size must be at least 1".into()));
        }
        Ok(())
    }

    /// Leaderboard size the search itself needs.
    pub fn retained(&self) -> usize {
        self.top_n.max(self.leadoff_cycles)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub search: SearchConfig,
    pub model: ModelConstants,
}

impl OptimizerConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses and validates.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search.validate()?;
        self.model.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = OptimizerConfig::from_toml("").unwrap();
        assert_eq!(config, OptimizerConfig::default());
        assert_eq!(config.search.top_n, 1);
        assert_eq!(config.search.batch_size, 10_000);
        assert!(config.search.parallel);
    }

    #[test]
    fn partial_tables_keep_defaults() {
        let toml = r#"
            [search]
            top_n = 5
            leadoff_cycles = 15

            [model.splits]
            double_play = 0.4
        "#;
        let config = OptimizerConfig::from_toml(toml).unwrap();
        assert_eq!(config.search.top_n, 5);
        assert_eq!(config.search.retained(), 15);
        assert_eq!(config.search.batch_size, 10_000);
        assert_eq!(config.model.splits.double_play, 0.4);
        assert_eq!(config.model.splits.plus, [0.25, 0.25, 0.20, 0.20]);
    }

    #[test]
    fn run_expectancy_override() {
        let toml = r#"
            [model.run_expectancy]
            values = [
                [0.5, 0.3, 0.1],
                [0.9, 0.5, 0.2],
                [1.1, 0.7, 0.3],
                [1.5, 0.9, 0.4],
                [1.4, 1.0, 0.4],
                [1.8, 1.1, 0.5],
                [2.0, 1.4, 0.6],
                [2.3, 1.5, 0.8],
            ]
        "#;
        let config = OptimizerConfig::from_toml(toml).unwrap();
        assert_eq!(config.model.run_expectancy.get(0, 0), 0.5);
        assert_eq!(config.model.run_expectancy.get(7, 2), 0.8);
    }

    #[test]
    fn rejects_zero_top_n() {
        let err = OptimizerConfig::from_toml("[search]\ntop_n = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Search(_)));
    }

    #[test]
    fn rejects_bad_split() {
        let err = OptimizerConfig::from_toml("[model.splits]\nplus = [0.25, 1.5, 0.2, 0.2]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Model(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = OptimizerConfig::from_toml("[search\ntop_n = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = OptimizerConfig::from_file(Path::new("/nonexistent/lineuplab.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/lineuplab.toml"));
    }
}
