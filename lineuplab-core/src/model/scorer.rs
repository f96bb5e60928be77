//! Run value of a short batting sequence.

use super::constants::ModelConstants;
use super::state::{InningState, StateDistribution};
use super::transition::transitions;
use crate::domain::PlayerStats;
use crate::rates::{RateModel, StatsIssue};

/// Longest sequence the lineup kernel looks up.
pub const SEQUENCE_LEN: usize = 4;

/// Result of playing a sequence forward from the start of an inning.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceEvaluation {
    /// Expected `runs + RE[after] - RE[before]` of the final batter, weighted
    /// by the states the earlier batters leave behind.
    pub run_value: f64,
    /// Expected runs scored by the whole sequence.
    pub expected_runs: f64,
    /// State distribution after the last batter, three-out mass included.
    pub distribution: StateDistribution,
}

/// Scores sequences of one to four batters against fixed model constants.
#[derive(Debug, Clone, Default)]
pub struct SequenceScorer {
    constants: ModelConstants,
}

impl SequenceScorer {
    pub fn new(constants: ModelConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &ModelConstants {
        &self.constants
    }

    /// Play `batters` in order from bases empty, nobody out.
    ///
    /// An empty sequence has no value and leaves the start state untouched.
    pub fn evaluate(&self, batters: &[&RateModel]) -> SequenceEvaluation {
        let re = &self.constants.run_expectancy;
        let splits = &self.constants.splits;
        let last = batters.len().saturating_sub(1);

        let mut dist = StateDistribution::start();
        let mut run_value = 0.0;
        let mut expected_runs = 0.0;

        for (slot, batter) in batters.iter().enumerate() {
            let mut next = StateDistribution::empty();
            for (state, &mass) in dist.iter() {
                if state.is_over() {
                    next.add(InningState::OVER, mass);
                    continue;
                }
                let before = re.get(state.bases_mask(), state.outs());
                for t in transitions(state, batter, slot as u8, splits) {
                    let p = mass * t.probability;
                    let runs = f64::from(t.runs);
                    expected_runs += p * runs;
                    if slot == last {
                        let after = re.get(t.next.bases_mask(), t.next.outs());
                        run_value += p * (runs + after - before);
                    }
                    next.add(t.next, p);
                }
            }
            dist = next;
        }

        SequenceEvaluation {
            run_value,
            expected_runs,
            distribution: dist,
        }
    }

    pub fn run_value(&self, batters: &[&RateModel]) -> f64 {
        self.evaluate(batters).run_value
    }

    /// Convenience for scoring straight from stat lines.
    pub fn score_stats(&self, stats: &[&PlayerStats]) -> Result<f64, StatsIssue> {
        let rates = stats
            .iter()
            .map(|s| RateModel::from_stats(s, &self.constants.splits))
            .collect::<Result<Vec<_>, _>>()?;
        let refs: Vec<&RateModel> = rates.iter().collect();
        Ok(self.run_value(&refs))
    }
}
