//! Monetary CLI
//!
//! Drives a small economy of firms and households through the bank's
//! period schedule and prints one JSON line per period.
//!
//! Usage:
//!   monetary-cli --config economy.json --periods 120
//!
//! Environment:
//!   RUST_LOG - Log filter (default: monetary_core_rs=info,monetary_cli=info)
//!   MONETARY_SEED - Overrides the configured seed

mod config;
mod economy;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::EconomyConfig;
use crate::economy::{Economy, PeriodReport};

#[derive(Parser, Debug)]
#[command(name = "monetary-cli")]
#[command(about = "Run a toy economy against the monetary accounting engine")]
struct Args {
    /// Economy configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of periods to run (overrides the config)
    #[arg(long)]
    periods: Option<usize>,

    /// Random seed (overrides the config)
    #[arg(long, env = "MONETARY_SEED")]
    seed: Option<u64>,

    /// Print only the final summary
    #[arg(long)]
    summary_only: bool,

    /// Dump the bank's event log as JSON after the run
    #[arg(long)]
    dump_events: bool,
}

#[derive(Debug, Serialize)]
struct Summary<'a> {
    periods: usize,
    final_state_hash: &'a str,
    bank_dividends: i64,
    firm_dividends: i64,
    written_off: i64,
    events: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("monetary_core_rs=info,monetary_cli=info")),
        )
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EconomyConfig::load(path)?,
        None => EconomyConfig::default(),
    };
    if let Some(periods) = args.periods {
        config.periods = periods;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let periods = config.periods;
    info!("running {} periods with seed {}", periods, config.seed);

    let mut economy = Economy::new(config).context("Failed to build economy")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut reports: Vec<PeriodReport> = Vec::with_capacity(periods);
    for _ in 0..periods {
        let report = economy.step()?;
        if !args.summary_only {
            writeln!(out, "{}", serde_json::to_string(&report)?)?;
        }
        reports.push(report);
    }

    let summary = Summary {
        periods,
        final_state_hash: reports.last().map(|r| r.state_hash.as_str()).unwrap_or(""),
        bank_dividends: reports.iter().map(|r| r.bank_dividend).sum(),
        firm_dividends: reports.iter().map(|r| r.firm_dividends).sum(),
        written_off: reports.iter().map(|r| r.written_off).sum(),
        events: economy.bank().event_log().len(),
    };
    writeln!(out, "{}", serde_json::to_string(&summary)?)?;

    if args.dump_events {
        let events = serde_json::to_string_pretty(economy.bank().event_log().events())
            .context("Failed to serialize event log")?;
        writeln!(out, "{}", events)?;
    }

    Ok(())
}
