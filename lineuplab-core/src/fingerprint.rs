//! Content-addressed keys for cached tables and rankings.
//!
//! A key is the BLAKE3 hash of a canonical JSON document: `json!` objects
//! serialize with sorted keys, and every input is a plain value, so equal
//! inputs hash equally across runs and platforms.

use crate::constraints::ConstraintSet;
use crate::domain::Roster;
use crate::model::ModelConstants;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

/// Hex-encoded BLAKE3 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey(pub String);

impl CacheKey {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes).to_hex().to_string())
    }

    fn from_json(doc: &serde_json::Value) -> Self {
        let canonical = serde_json::to_string(doc).expect("JSON value must serialize");
        Self::from_bytes(canonical.as_bytes())
    }

    /// Identifies a sequence table: who is on the roster, their stats, and
    /// the model constants. Handedness does not affect run values.
    pub fn for_table(roster: &Roster, constants: &ModelConstants) -> Self {
        let players: Vec<_> = roster
            .players()
            .iter()
            .map(|p| json!({ "name": &p.name, "stats": &p.stats }))
            .collect();
        Self::from_json(&json!({
            "kind": "sequence_table",
            "players": players,
            "model": constants,
        }))
    }

    /// Identifies a finished ranking. `search` carries whichever search
    /// settings change the result.
    pub fn for_ranking<S: Serialize>(
        roster: &Roster,
        constants: &ModelConstants,
        constraints: &ConstraintSet,
        search: &S,
    ) -> Self {
        Self::from_json(&json!({
            "kind": "ranking",
            "roster": roster,
            "model": constants,
            "fixed": constraints.fixed,
            "limits": constraints.limits,
            "search": search,
        }))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
