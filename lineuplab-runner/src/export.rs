//! Export: JSON rankings plus CSV for the sequence table, rankings and
//! per-slot breakdowns.

use anyhow::{Context, Result};

use lineuplab_core::table::distinct_tuples;
use lineuplab_core::{LineupBreakdown, Roster, SequenceTable};

use crate::optimizer::RankedLineups;

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json(ranked: &RankedLineups) -> Result<String> {
    serde_json::to_string_pretty(ranked).context("failed to serialize rankings to JSON")
}

pub fn import_json(json: &str) -> Result<RankedLineups> {
    serde_json::from_str(json).context("failed to deserialize rankings from JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// One row per ordered tuple of four distinct players.
///
/// Columns: player1, player2, player3, player4, value
pub fn export_table_csv(table: &SequenceTable, roster: &Roster) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["player1", "player2", "player3", "player4", "value"])?;

    for t in distinct_tuples() {
        wtr.write_record([
            roster.name(t[0]),
            roster.name(t[1]),
            roster.name(t[2]),
            roster.name(t[3]),
            format!("{:.6}", table.get(t)).as_str(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Columns: rank, score, slot1 .. slot9
pub fn export_rankings_csv(ranked: &RankedLineups) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    let mut header = vec!["rank".to_string(), "score".to_string()];
    header.extend((1..=9).map(|s| format!("slot{s}")));
    wtr.write_record(&header)?;

    for (i, entry) in ranked.entries.iter().enumerate() {
        let mut row = vec![(i + 1).to_string(), format!("{:.6}", entry.score)];
        row.extend(entry.players.iter().cloned());
        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Columns: slot, batter, sequence, base_value, weight, weighted_value.
/// Slots are 1-based and the sequence is `a > b > c > d`, oldest first.
pub fn export_breakdown_csv(breakdown: &LineupBreakdown, roster: &Roster) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "slot",
        "batter",
        "sequence",
        "base_value",
        "weight",
        "weighted_value",
    ])?;

    for c in &breakdown.slots {
        let sequence: Vec<&str> = c.tuple.iter().map(|&p| roster.name(p)).collect();
        wtr.write_record([
            (c.slot + 1).to_string(),
            roster.name(c.tuple[3]).to_string(),
            sequence.join(" > "),
            format!("{:.6}", c.base_value),
            format!("{:.4}", c.weight),
            format!("{:.6}", c.weighted_value),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}
