use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Batting side. Switch hitters never extend a same-handed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum Handedness {
    Left,
    #[default]
    Right,
    Switch,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Switch => "SWITCH",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Handedness {
    type Err = String;

    /// Accepts `LEFT`/`RIGHT`/`SWITCH` and the one-letter forms, any casing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" | "LEFT" => Ok(Self::Left),
            "R" | "RIGHT" => Ok(Self::Right),
            "S" | "SWITCH" | "B" | "BOTH" => Ok(Self::Switch),
            other => Err(format!("unknown batting hand '{other}'")),
        }
    }
}

impl TryFrom<String> for Handedness {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Raw season batting totals.
///
/// Field names on the wire match the scouting feed (`2b`, `3b`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerStats {
    pub pa: u32,
    pub h: u32,
    #[serde(rename = "2b")]
    pub doubles: u32,
    #[serde(rename = "3b")]
    pub triples: u32,
    pub hr: u32,
    pub sb: u32,
    pub bb: u32,
    pub hbp: u32,
    pub ibb: u32,
}

impl PlayerStats {
    /// Summed in `u64` so feed values near `u32::MAX` cannot overflow.
    pub fn extra_base_hits(&self) -> u64 {
        u64::from(self.doubles) + u64::from(self.triples) + u64::from(self.hr)
    }

    /// Times on base by walk, hit-by-pitch or intentional walk.
    pub fn walk_equivalents(&self) -> u64 {
        u64::from(self.bb) + u64::from(self.hbp) + u64::from(self.ibb)
    }

    pub fn total_bases(&self) -> u64 {
        let singles = u64::from(self.h).saturating_sub(self.extra_base_hits());
        singles + 2 * u64::from(self.doubles) + 3 * u64::from(self.triples) + 4 * u64::from(self.hr)
    }

    /// AVG/OBP/SLG/OPS, all per plate appearance. Zero when PA is zero.
    pub fn slash_line(&self) -> SlashLine {
        if self.pa == 0 {
            return SlashLine::default();
        }
        let pa = f64::from(self.pa);
        let avg = f64::from(self.h) / pa;
        let obp = (u64::from(self.h) + self.walk_equivalents()) as f64 / pa;
        let slg = self.total_bases() as f64 / pa;
        SlashLine {
            avg,
            obp,
            slg,
            ops: obp + slg,
        }
    }
}

/// Summary rate line for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SlashLine {
    pub avg: f64,
    pub obp: f64,
    pub slg: f64,
    pub ops: f64,
}

/// A rostered batter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub stats: PlayerStats,
    #[serde(default)]
    pub hand: Handedness,
}

impl Player {
    pub fn new(name: impl Into<String>, stats: PlayerStats, hand: Handedness) -> Self {
        Self {
            name: name.into(),
            stats,
            hand,
        }
    }
}
