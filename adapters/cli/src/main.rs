#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Monochrome TD levels headlessly.

mod level_file;
mod placement;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use monochrome_td_core::{rules, Event, LevelId};
use monochrome_td_session::{Campaign, Session, SessionConfig, SessionSummary};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use placement::Placement;

/// Command-line arguments for the headless runner.
#[derive(Debug, Parser)]
#[command(author, version, about = "Plays a Monochrome TD level without a window", long_about = None)]
struct CliArgs {
    /// Stock level to play.
    #[arg(short, long, default_value_t = 1, conflicts_with = "level_file")]
    level: u32,

    /// TOML level manifest to play instead of a stock level.
    #[arg(long, value_name = "PATH")]
    level_file: Option<PathBuf>,

    /// Seed of the critical strike and root rolls.
    #[arg(long, default_value_t = SessionConfig::default().rng_seed)]
    seed: u64,

    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = 10 * 60 * u64::from(rules::TICKS_PER_SECOND))]
    ticks: u64,

    /// Tower to build before the first wave, e.g. `2:archer`.
    #[arg(short, long = "build", value_name = "SPOT:KIND")]
    builds: Vec<Placement>,

    /// Start every wave as soon as the previous one is cleared.
    #[arg(long)]
    auto_waves: bool,

    /// Print the run report as JSON.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Counters accumulated from the per-tick event log.
#[derive(Debug, Default, Serialize)]
struct RunStats {
    shots_fired: u32,
    enemies_defeated: u32,
    enemies_escaped: u32,
    towers_disabled: u32,
    waves_cleared: u32,
}

impl RunStats {
    fn record(&mut self, event: &Event) {
        let counter = match event {
            Event::ProjectileFired { .. } => &mut self.shots_fired,
            Event::EnemyDefeated { .. } => &mut self.enemies_defeated,
            Event::EnemyEscaped { .. } => &mut self.enemies_escaped,
            Event::TowerDisabled { .. } => &mut self.towers_disabled,
            Event::WaveCleared { .. } => &mut self.waves_cleared,
            _ => return,
        };
        *counter += 1;
    }
}

#[derive(Debug, Serialize)]
struct Report {
    level: String,
    summary: SessionSummary,
    stats: RunStats,
}

/// Entry point for the Monochrome TD command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let mut session = start_session(&args)?;
    let level = session.level().name().to_owned();
    for placement in &args.builds {
        let tower = session
            .build_tower(placement.spot, placement.kind)
            .with_context(|| format!("failed to build tower {placement}"))?;
        info!(tower = tower.get(), %placement, "tower placed");
    }

    let stats = play(&mut session, &args)?;
    let report = Report {
        level,
        summary: session.end(),
        stats,
    };

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("failed to encode run report")?;
        println!("{json}");
    } else {
        print_report(&report);
    }
    Ok(())
}

fn init_tracing(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn start_session(args: &CliArgs) -> Result<Session> {
    let config = SessionConfig {
        rng_seed: args.seed,
        ..SessionConfig::default()
    };

    match &args.level_file {
        Some(path) => {
            let level = level_file::load(path)?;
            Session::new(level, config).context("failed to start session")
        }
        None => {
            let campaign = Campaign::stock().context("stock levels are invalid")?;
            campaign
                .start(LevelId::new(args.level), config)
                .with_context(|| format!("failed to start stock level {}", args.level))
        }
    }
}

fn play(session: &mut Session, args: &CliArgs) -> Result<RunStats> {
    let mut stats = RunStats::default();
    let first = session.start_wave().context("failed to start the first wave")?;
    info!(wave = first.get() + 1, "first wave launched");

    for _ in 0..args.ticks {
        if args.auto_waves && !session.snapshot().wave_active {
            let _ = session.start_wave();
        }
        for event in session.tick() {
            stats.record(&event);
        }
        if !session.state().is_playing() {
            break;
        }
    }
    Ok(stats)
}

fn print_report(report: &Report) {
    let summary = &report.summary;
    println!("{} (level {})", report.level, summary.level.get());
    println!("outcome:        {:?}", summary.outcome);
    println!("waves cleared:  {}", summary.waves_cleared);
    println!("lives left:     {}", summary.lives);
    println!("gold:           {}", summary.gold);
    println!("ticks:          {}", summary.ticks);
    println!("shots fired:    {}", report.stats.shots_fired);
    println!("defeated:       {}", report.stats.enemies_defeated);
    println!("escaped:        {}", report.stats.enemies_escaped);
    println!("towers jammed:  {}", report.stats.towers_disabled);
}
