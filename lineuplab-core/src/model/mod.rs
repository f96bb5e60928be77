//! Half-inning Markov model: constants, states, transitions, and the
//! sequence scorer built on them.

pub mod constants;
pub mod scorer;
pub mod state;
pub mod transition;

pub use constants::{ModelConstants, ModelError, RunExpectancy, SplitFactors};
pub use scorer::{SequenceEvaluation, SequenceScorer, SEQUENCE_LEN};
pub use state::{BaseOut, InningState, StateDistribution};
pub use transition::{transitions, Transition};
