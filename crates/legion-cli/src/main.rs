//! Headless Legion battle runner.
//!
//! Runs battles without a renderer for balance checks and bug reports.
//!
//! # Usage
//!
//! ```bash
//! # One battle, report as JSON
//! cargo run -p legion-cli -- run --level 3 --roster COMMANDER_ELF,INFANTRY,ARCHER,ARCHER
//!
//! # 500 seeds in parallel
//! cargo run -p legion-cli -- batch --level 3 --roster COMMANDER_ELF,SPEAR,SPEAR --count 500
//!
//! # Dump the built-in data as a starting point for --data
//! cargo run -p legion-cli -- data > data.json
//!
//! # Snapshot after 12 seconds of simulated time
//! cargo run -p legion-cli -- inspect --level 2 --at-seconds 12
//! ```
//!
//! Reports go to stdout as JSON. Logs go to stderr.

mod batch;
mod runner;

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use legion_core::{EntityId, GameData, SpeedMultiplier, UnitKind};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::batch::{run_batch, BatchConfig, BatchSummary};
use crate::runner::{run_battle, run_until, BattleConfig};

#[derive(Parser)]
#[command(name = "legion")]
#[command(about = "Headless Legion battle runner")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single battle and print its report
    Run {
        #[command(flatten)]
        battle: BattleArgs,
    },

    /// Run many seeds in parallel and print a summary
    Batch {
        #[command(flatten)]
        battle: BattleArgs,

        /// Number of battles to run
        #[arg(short, long, default_value = "100")]
        count: u32,

        /// Maximum parallel battles (0 = auto)
        #[arg(short, long, default_value = "0")]
        parallel: usize,

        /// Print every battle report instead of only the summary
        #[arg(long)]
        reports: bool,
    },

    /// Print the built-in game data
    Data,

    /// Run to a point in time and print the battle snapshot
    Inspect {
        #[command(flatten)]
        battle: BattleArgs,

        /// Simulated seconds to run before capturing
        #[arg(long, default_value = "10")]
        at_seconds: f64,

        /// Print the stat breakdown of one unit instead of the snapshot
        #[arg(long)]
        unit: Option<u64>,
    },
}

#[derive(Args)]
struct BattleArgs {
    /// Level to fight (1-based)
    #[arg(short, long, default_value = "1")]
    level: u32,

    /// Summon queue, comma separated, commander first
    #[arg(
        short,
        long,
        value_delimiter = ',',
        value_parser = parse_kind,
        default_value = "COMMANDER_CENTURION,INFANTRY,INFANTRY,ARCHER,SHIELD"
    )]
    roster: Vec<UnitKind>,

    /// Unit kind with its upgrade unlocked (repeatable)
    #[arg(short, long, value_parser = parse_kind)]
    upgrade: Vec<UnitKind>,

    /// Game data JSON file (built-in data if omitted)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Random seed
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Speed multiplier
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=3))]
    speed: u8,

    /// Surrender if the battle runs longer than this (simulated seconds)
    #[arg(long, default_value = "300")]
    max_seconds: f64,
}

impl BattleArgs {
    fn load_data(&self) -> Result<GameData> {
        match &self.data {
            Some(path) => GameData::load(path).with_context(|| format!("loading {}", path.display())),
            None => Ok(GameData::default()),
        }
    }

    fn config(&self) -> Result<BattleConfig> {
        if self.roster.is_empty() {
            bail!("roster is empty");
        }
        if !self.max_seconds.is_finite() || self.max_seconds <= 0.0 {
            bail!("--max-seconds must be positive, got {}", self.max_seconds);
        }
        let speed = SpeedMultiplier::new(self.speed).with_context(|| format!("invalid speed {}", self.speed))?;

        Ok(BattleConfig {
            level: self.level,
            roster: self.roster.clone(),
            upgrades: self.upgrade.iter().copied().collect::<BTreeSet<_>>(),
            seed: self.seed,
            speed,
            max_ms: self.max_seconds * 1000.0,
        })
    }
}

fn parse_kind(s: &str) -> Result<UnitKind, String> {
    UnitKind::from_key(s).ok_or_else(|| {
        let known: Vec<&str> = UnitKind::ALL.iter().map(|k| k.key()).collect();
        format!("unknown unit kind '{s}' (expected one of {})", known.join(", "))
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{json}");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for reports)
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::filter::LevelFilter::from_level(log_level))
        .init();

    match cli.command {
        Commands::Run { battle } => cmd_run(&battle),
        Commands::Batch {
            battle,
            count,
            parallel,
            reports,
        } => cmd_batch(&battle, count, parallel, reports),
        Commands::Data => print_json(&GameData::default()),
        Commands::Inspect {
            battle,
            at_seconds,
            unit,
        } => cmd_inspect(&battle, at_seconds, unit),
    }
}

fn cmd_run(args: &BattleArgs) -> Result<()> {
    let data = args.load_data()?;
    let config = args.config()?;
    let report = run_battle(&data, &config);
    tracing::info!(
        verdict = %report.outcome.verdict,
        ticks = report.ticks,
        duration_ms = report.duration_ms,
        "Battle complete"
    );
    print_json(&report)
}

fn cmd_batch(args: &BattleArgs, count: u32, parallel: usize, reports: bool) -> Result<()> {
    let data = args.load_data()?;
    let config = BatchConfig {
        battle: args.config()?,
        count,
        parallel,
    };

    let results = run_batch(&data, &config);
    let summary = BatchSummary::from_reports(&results);
    tracing::info!(
        games = summary.games,
        wins = summary.wins,
        win_rate = summary.win_rate,
        "Batch complete"
    );

    if reports {
        print_json(&results)
    } else {
        print_json(&summary)
    }
}

fn cmd_inspect(args: &BattleArgs, at_seconds: f64, unit: Option<u64>) -> Result<()> {
    if !at_seconds.is_finite() || at_seconds < 0.0 {
        bail!("--at-seconds must be non-negative, got {at_seconds}");
    }
    let data = args.load_data()?;
    let config = args.config()?;
    let sim = run_until(&data, &config, at_seconds * 1000.0);

    match unit {
        Some(id) => {
            let inspection = sim
                .inspect(EntityId::new(id))
                .with_context(|| format!("no unit with id {id} at {at_seconds}s"))?;
            print_json(&inspection)
        }
        None => print_json(&sim.snapshot()),
    }
}
