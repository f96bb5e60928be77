//! LineupLab CLI: optimize, evaluate, and export-table commands.
//!
//! Commands:
//! - `optimize`: find the best batting order for a JSON request
//! - `evaluate`: score explicit batting orders, best first
//! - `export-table`: dump the four-batter sequence table as CSV
//!
//! Requests use the JSON wire format: slots `"1"`-`"9"` pin a player,
//! `"10"`-`"18"` are free. Log output goes to stderr (`RUST_LOG` overrides
//! the default `lineuplab=info`); results go to stdout.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use lineuplab_core::{Lineup, Roster};
use lineuplab_runner::{
    error_json, export_breakdown_csv, export_table_csv, response_json, DirCache, LineupRequest,
    Optimizer, OptimizerConfig,
};

#[derive(Parser)]
#[command(name = "lineuplab", about = "LineupLab CLI: batting order optimizer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args)]
struct Common {
    /// Request JSON file. Reads stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// TOML config file (`[search]`, `[model]`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for cached tables and rankings.
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the best batting order for a request.
    Optimize {
        #[command(flatten)]
        common: Common,

        /// Number of lineups to return.
        #[arg(long)]
        top_n: Option<usize>,

        /// Search on a single thread.
        #[arg(long, default_value_t = false)]
        serial: bool,

        /// Stop starting new batches after this many milliseconds.
        #[arg(long)]
        deadline_ms: Option<u64>,

        /// Pick the best starting rotation among this many top cycles.
        #[arg(long)]
        leadoff_cycles: Option<usize>,

        /// Write the chosen lineup's per-slot breakdown as CSV to this file.
        #[arg(long)]
        breakdown: Option<PathBuf>,
    },
    /// Score explicit batting orders.
    Evaluate {
        #[command(flatten)]
        common: Common,

        /// Comma-separated player names, leadoff first. Repeat for more orders.
        #[arg(long = "order", required = true)]
        orders: Vec<String>,
    },
    /// Export the sequence table as CSV.
    ExportTable {
        #[command(flatten)]
        common: Common,

        /// Output file. Writes to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Optimize {
            common,
            top_n,
            serial,
            deadline_ms,
            leadoff_cycles,
            breakdown,
        } => {
            let flags = OptimizeFlags {
                top_n,
                serial,
                deadline_ms,
                leadoff_cycles,
                breakdown,
            };
            match run_optimize(&common, &flags) {
                Ok(response) => {
                    println!("{}", serde_json::to_string_pretty(&response)?);
                    Ok(())
                }
                Err(err) => {
                    println!("{}", error_json(&format!("{err:#}")));
                    std::process::exit(1);
                }
            }
        }
        Commands::Evaluate { common, orders } => run_evaluate(&common, &orders),
        Commands::ExportTable { common, output } => run_export_table(&common, output.as_deref()),
    }
}

/// Logs to stderr so stdout stays machine-readable.
fn init_tracing() -> Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lineuplab=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

struct OptimizeFlags {
    top_n: Option<usize>,
    serial: bool,
    deadline_ms: Option<u64>,
    leadoff_cycles: Option<usize>,
    breakdown: Option<PathBuf>,
}

fn run_optimize(common: &Common, flags: &OptimizeFlags) -> Result<serde_json::Value> {
    let request = load_request(common.input.as_deref())?;
    let mut config = load_config(common.config.as_deref())?;

    // Command-line flags win over the request, which wins over the file.
    request.apply_overrides(&mut config);
    if let Some(n) = flags.top_n {
        config.search.top_n = n;
    }
    if let Some(n) = flags.leadoff_cycles {
        config.search.leadoff_cycles = n;
    }
    if flags.serial {
        config.search.parallel = false;
    }

    let mut optimizer = with_caches(Optimizer::new(config)?, common.cache_dir.as_deref())?;
    if let Some(ms) = flags.deadline_ms {
        optimizer = optimizer.with_deadline(Instant::now() + Duration::from_millis(ms));
    }

    let started = Instant::now();
    let ranked = optimizer.optimize(&request.input)?;
    info!(
        generated = ranked.generated,
        completed = ranked.completed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "optimization finished"
    );

    let roster = Roster::new(request.input.players.clone())?;
    if let Some(path) = &flags.breakdown {
        let chosen = match (&ranked.leadoff, ranked.best()) {
            (Some(pick), _) => pick.lineup,
            (None, Some(best)) => best.lineup,
            (None, None) => bail!("no lineup to break down"),
        };
        let breakdown = optimizer.breakdown(&roster, &chosen)?;
        let csv = export_breakdown_csv(&breakdown, &roster)?;
        std::fs::write(path, csv)
            .with_context(|| format!("failed to write breakdown to {}", path.display()))?;
    }

    Ok(response_json(&ranked, &roster))
}

fn run_evaluate(common: &Common, orders: &[String]) -> Result<()> {
    let request = load_request(common.input.as_deref())?;
    let config = load_config(common.config.as_deref())?;
    let optimizer = with_caches(Optimizer::new(config)?, common.cache_dir.as_deref())?;
    let roster = Roster::new(request.input.players)?;

    let lineups = orders
        .iter()
        .map(|order| {
            let names: Vec<&str> = order.split(',').map(str::trim).collect();
            Lineup::from_names(&roster, &names).with_context(|| format!("invalid order '{order}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    let scored = optimizer.evaluate(&roster, &lineups)?;
    println!("{}", serde_json::to_string_pretty(&scored)?);
    Ok(())
}

fn run_export_table(common: &Common, output: Option<&Path>) -> Result<()> {
    let request = load_request(common.input.as_deref())?;
    let config = load_config(common.config.as_deref())?;
    let optimizer = with_caches(Optimizer::new(config)?, common.cache_dir.as_deref())?;
    let roster = Roster::new(request.input.players)?;

    let table = optimizer.sequence_table(&roster)?;
    let csv = export_table_csv(&table, &roster)?;
    match output {
        Some(path) => {
            std::fs::write(path, csv)
                .with_context(|| format!("failed to write table to {}", path.display()))?;
            info!(path = %path.display(), "sequence table exported");
        }
        None => print!("{csv}"),
    }
    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────

fn load_request(path: Option<&Path>) -> Result<LineupRequest> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read request from stdin")?;
            buf
        }
    };
    Ok(LineupRequest::from_json(&text)?)
}

fn load_config(path: Option<&Path>) -> Result<OptimizerConfig> {
    match path {
        Some(path) => Ok(OptimizerConfig::from_file(path)?),
        None => Ok(OptimizerConfig::default()),
    }
}

/// Tables and rankings share one cache directory.
fn with_caches(optimizer: Optimizer, cache_dir: Option<&Path>) -> Result<Optimizer> {
    let Some(dir) = cache_dir else {
        return Ok(optimizer);
    };
    let cache = Arc::new(DirCache::new(dir)?);
    Ok(optimizer
        .with_table_cache(cache.clone())
        .with_ranking_cache(cache))
}
