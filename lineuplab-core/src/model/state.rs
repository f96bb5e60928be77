//! Half-inning states and probability distributions over them.

use std::collections::BTreeMap;

/// Base runners and outs during a scored sequence.
///
/// Each occupied base records the sequence slot (0..=3) of the batter who
/// is standing there, so that the runner's own advancement factor applies
/// when they try for an extra base. Run-expectancy lookups collapse this to
/// the usual base/out state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InningState {
    runners: [Option<u8>; 3],
    outs: u8,
}

impl InningState {
    /// Bases empty, nobody out.
    pub const START: Self = Self {
        runners: [None; 3],
        outs: 0,
    };

    /// Absorbing three-out state.
    pub const OVER: Self = Self {
        runners: [None; 3],
        outs: 3,
    };

    pub fn new(runners: [Option<u8>; 3], outs: u8) -> Self {
        if outs >= 3 {
            return Self::OVER;
        }
        Self { runners, outs }
    }

    pub fn runners(&self) -> [Option<u8>; 3] {
        self.runners
    }

    /// Runner on `base` (0 = first).
    pub fn runner(&self, base: usize) -> Option<u8> {
        self.runners[base]
    }

    pub fn outs(&self) -> u8 {
        self.outs
    }

    pub fn is_over(&self) -> bool {
        self.outs >= 3
    }

    pub fn bases_empty(&self) -> bool {
        self.runners.iter().all(Option::is_none)
    }

    pub fn runner_count(&self) -> u8 {
        self.runners.iter().filter(|r| r.is_some()).count() as u8
    }

    /// Occupied bases as a bitmask, bit 0 = first.
    pub fn bases_mask(&self) -> u8 {
        self.runners
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_some())
            .fold(0, |mask, (base, _)| mask | (1 << base))
    }

    pub fn base_out(&self) -> BaseOut {
        BaseOut {
            bases: self.bases_mask(),
            outs: self.outs,
        }
    }
}

/// Anonymous base/out state: one of 24 live states or three outs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BaseOut {
    pub bases: u8,
    pub outs: u8,
}

/// Probability mass over inning states. Ordered so that iteration, and
/// therefore floating-point accumulation, is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateDistribution {
    mass: BTreeMap<InningState, f64>,
}

impl StateDistribution {
    pub fn empty() -> Self {
        Self::default()
    }

    /// All mass on the start state.
    pub fn start() -> Self {
        let mut dist = Self::empty();
        dist.add(InningState::START, 1.0);
        dist
    }

    pub fn add(&mut self, state: InningState, p: f64) {
        if p == 0.0 {
            return;
        }
        *self.mass.entry(state).or_insert(0.0) += p;
    }

    pub fn get(&self, state: &InningState) -> f64 {
        self.mass.get(state).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&InningState, &f64)> {
        self.mass.iter()
    }

    pub fn total_mass(&self) -> f64 {
        self.mass.values().sum()
    }

    /// Probability the inning has already ended.
    pub fn over(&self) -> f64 {
        self.get(&InningState::OVER)
    }

    pub fn len(&self) -> usize {
        self.mass.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mass.is_empty()
    }

    /// Mass per anonymous base/out state.
    pub fn collapsed(&self) -> BTreeMap<BaseOut, f64> {
        let mut out = BTreeMap::new();
        for (state, p) in &self.mass {
            *out.entry(state.base_out()).or_insert(0.0) += p;
        }
        out
    }
}
