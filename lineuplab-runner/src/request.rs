//! JSON wire format for optimization requests and responses.
//!
//! A request is a flat object. Keys `"1"` to `"9"` hold players pinned to
//! that batting slot; keys `"10"` to `"18"` hold players the optimizer may
//! place anywhere. Null entries, blank names and missing stat blocks are
//! skipped, so a form with empty rows can be posted as is.
//!
//! ```json
//! {
//!   "1":  {"name": "Trea Turner", "data": {"pa": 539, "h": 149, ...}, "batting_hand": "R"},
//!   "10": {"name": "Bryce Harper", "data": {...}, "batting_hand": "LEFT"},
//!   "max_consecutive_left": 2,
//!   "method": "exhaustive"
//! }
//! ```

use serde::Deserialize;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::config::OptimizerConfig;
use crate::optimizer::{OptimizationInput, RankedLineups};
use lineuplab_core::{
    Handedness, HandednessLimits, Player, PlayerStats, Roster, SlotAssignment, ROSTER_SIZE,
};

/// Highest slot key accepted; pinned keys stop at 9.
pub const MAX_SLOT_KEY: u8 = 18;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("malformed request JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("request must be a JSON object")]
    NotAnObject,
    #[error("entry \"{key}\": {source}")]
    Entry {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("slot key \"{0}\" is outside 1-18")]
    SlotKeyOutOfRange(String),
    #[error("field \"{field}\" must be {expected}")]
    BadOption {
        field: &'static str,
        expected: &'static str,
    },
    #[error("unsupported method \"{0}\"; only \"exhaustive\" is available")]
    UnsupportedMethod(String),
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    data: Option<PlayerStats>,
    #[serde(default)]
    batting_hand: Option<Handedness>,
}

/// A parsed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineupRequest {
    pub input: OptimizationInput,
    pub top_n: Option<usize>,
}

impl LineupRequest {
    pub fn from_json(text: &str) -> Result<Self, RequestError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, RequestError> {
        let Value::Object(map) = value else {
            return Err(RequestError::NotAnObject);
        };

        let mut slotted: Vec<(u8, Player)> = Vec::new();
        let mut limits = HandednessLimits::default();
        let mut top_n = None;

        for (key, value) in map {
            match key.as_str() {
                "max_consecutive_left" => {
                    limits.max_consecutive_left = limit_option(&value, "max_consecutive_left")?
                }
                "max_consecutive_right" => {
                    limits.max_consecutive_right = limit_option(&value, "max_consecutive_right")?
                }
                "top_n" => top_n = top_n_option(&value)?,
                "method" => check_method(&value)?,
                _ => match key.parse::<u8>() {
                    Ok(slot) if (1..=MAX_SLOT_KEY).contains(&slot) => {
                        if let Some(player) = parse_entry(&key, value)? {
                            slotted.push((slot, player));
                        }
                    }
                    Ok(_) => return Err(RequestError::SlotKeyOutOfRange(key)),
                    Err(_) => debug!(%key, "ignoring unknown request field"),
                },
            }
        }

        slotted.sort_by_key(|(slot, _)| *slot);
        let fixed_slots = slotted
            .iter()
            .filter(|(slot, _)| usize::from(*slot) <= ROSTER_SIZE)
            .map(|(slot, p)| SlotAssignment::new(p.name.clone(), *slot))
            .collect();
        let players = slotted.into_iter().map(|(_, p)| p).collect();

        Ok(Self {
            input: OptimizationInput {
                players,
                fixed_slots,
                limits,
            },
            top_n,
        })
    }

    /// Request-level settings override the config file.
    pub fn apply_overrides(&self, config: &mut OptimizerConfig) {
        if let Some(n) = self.top_n {
            config.search.top_n = n;
        }
    }
}

fn parse_entry(key: &str, value: Value) -> Result<Option<Player>, RequestError> {
    if value.is_null() {
        return Ok(None);
    }
    let entry: Entry = serde_json::from_value(value).map_err(|source| RequestError::Entry {
        key: key.to_string(),
        source,
    })?;
    let name = entry.name.map(|n| n.trim().to_string()).unwrap_or_default();
    match (name.is_empty(), entry.data) {
        (false, Some(stats)) => Ok(Some(Player::new(name, stats, entry.batting_hand.unwrap_or_default()))),
        _ => {
            debug!(%key, "skipping incomplete player entry");
            Ok(None)
        }
    }
}

fn limit_option(value: &Value, field: &'static str) -> Result<u32, RequestError> {
    match value {
        Value::Null => Ok(0),
        v => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or(RequestError::BadOption {
                field,
                expected: "a non-negative integer",
            }),
    }
}

fn top_n_option(value: &Value) -> Result<Option<usize>, RequestError> {
    match value {
        Value::Null => Ok(None),
        v => match v.as_u64() {
            Some(n) if n >= 1 => Ok(Some(n as usize)),
            _ => Err(RequestError::BadOption {
                field: "top_n",
                expected: "a positive integer",
            }),
        },
    }
}

fn check_method(value: &Value) -> Result<(), RequestError> {
    match value {
        Value::Null => Ok(()),
        Value::String(m) if m.eq_ignore_ascii_case("exhaustive") => Ok(()),
        Value::String(m) => Err(RequestError::UnsupportedMethod(m.clone())),
        _ => Err(RequestError::BadOption {
            field: "method",
            expected: "a string",
        }),
    }
}

/// Rounds to four decimals for display.
pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

fn slot_object(names: &[String], score: f64) -> Map<String, Value> {
    let mut obj = Map::new();
    for (i, name) in names.iter().enumerate() {
        obj.insert((i + 1).to_string(), Value::String(name.clone()));
    }
    obj.insert("expectedRuns".into(), json!(round4(score)));
    obj
}

/// `{"1": name, ..., "9": name, "expectedRuns": score}` for the chosen
/// lineup: the leadoff pick when one was made, else the top-ranked order.
/// With more than one ranked lineup, the full list rides along under
/// `"rankings"`. A leadoff pick adds `"optimal_leadoff_info"`.
pub fn response_json(ranked: &RankedLineups, roster: &Roster) -> Value {
    let mut obj = match (&ranked.leadoff, ranked.best()) {
        (Some(pick), _) => {
            let names = pick.lineup.names(roster);
            let mut obj = slot_object(&names, pick.adjusted_score);
            obj.insert(
                "optimal_leadoff_info".into(),
                json!({
                    "leadoff_player": names.first(),
                    "leadoff_adjusted_score": round4(pick.adjusted_score),
                    "original_cycle_rank": pick.cycle_rank,
                    "total_cycles_evaluated": pick.cycles_evaluated,
                }),
            );
            obj
        }
        (None, Some(best)) => slot_object(&best.players, best.score),
        (None, None) => Map::new(),
    };
    if ranked.len() > 1 {
        let rankings: Vec<Value> = ranked
            .entries
            .iter()
            .map(|e| Value::Object(slot_object(&e.players, e.score)))
            .collect();
        obj.insert("rankings".into(), Value::Array(rankings));
    }
    if !ranked.completed {
        obj.insert("complete".into(), Value::Bool(false));
    }
    Value::Object(obj)
}

/// `{"error": message, "status": "failed"}`
pub fn error_json(message: &str) -> Value {
    json!({ "error": message, "status": "failed" })
}
