//! Tumble Lab batch simulator
//!
//! Usage:
//!   tl-sim --spins 10000 --seed 7          - Text summary of a seeded session
//!   tl-sim --config game.yaml --json       - Session report as JSON
//!   tl-sim --spins 5 --trace               - Timed phase events as JSON lines
//!
//! `RUST_LOG=debug` shows every tumble.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use tl_slot::{
    PhaseScheduler, RngGenerator, SessionStats, SlotConfig, SpinError, TimingProfile, TumbleEngine,
};

#[derive(Parser, Debug)]
#[command(name = "tl-sim", about = "Tumble Lab batch simulator")]
struct Cli {
    /// Number of spins to play
    #[arg(short = 'n', long, default_value_t = 1000)]
    spins: u64,

    /// RNG seed (entropy when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Game config (.json, .yaml or .yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Presentation pacing used for --trace and the timeline total
    #[arg(short, long, default_value = "normal", value_parser = parse_profile)]
    profile: TimingProfile,

    /// Print every timed phase event as a JSON line
    #[arg(long)]
    trace: bool,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,

    /// Reset the balance instead of stopping when it runs out
    #[arg(long)]
    rebuy: bool,
}

fn parse_profile(name: &str) -> Result<TimingProfile, String> {
    TimingProfile::parse(name).ok_or_else(|| format!("unknown profile '{name}' (normal, turbo, instant)"))
}

/// End-of-run summary
#[derive(Debug, Serialize)]
struct Report {
    game: String,
    seed: Option<u64>,
    spins_requested: u64,
    spins_played: u64,
    rebuys: u64,
    /// Stopped early on an empty balance
    busted: bool,
    balance: u64,
    free_spins_remaining: u32,
    session_win_total: u64,
    /// Presentation time at the chosen profile
    timeline_ms: u64,
    stats: SessionStats,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = run(&cli, &mut out)?;

    if cli.json {
        serde_json::to_writer_pretty(&mut out, &report).context("Failed to write report")?;
        writeln!(out)?;
    } else if !cli.trace {
        print_summary(&mut out, &report)?;
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<SlotConfig> {
    match &cli.config {
        Some(path) => SlotConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(SlotConfig::default()),
    }
}

fn run(cli: &Cli, out: &mut impl Write) -> Result<Report> {
    let config = load_config(cli)?;
    let generator = match cli.seed {
        Some(seed) => RngGenerator::seeded(seed),
        None => RngGenerator::from_entropy(),
    };
    let mut engine =
        TumbleEngine::with_generator(config, generator).context("Config rejected by engine")?;
    let scheduler = PhaseScheduler::from_profile(cli.profile);

    log::info!(
        "Simulating {} spins of '{}' (seed {:?}, {:?} pacing)",
        cli.spins,
        engine.config().name,
        cli.seed,
        cli.profile
    );

    let mut played = 0;
    let mut rebuys = 0;
    let mut busted = false;
    let mut timeline_ms = 0;

    while played < cli.spins {
        let events = match engine.spin() {
            Ok(events) => events,
            Err(SpinError::InsufficientFunds { balance, bet }) if cli.rebuy => {
                log::info!("Rebuy after spin {played}: balance {balance} below bet {bet}");
                engine.reset_balance();
                rebuys += 1;
                continue;
            }
            Err(SpinError::InsufficientFunds { balance, .. }) => {
                log::warn!("Stopping after {played} spins: balance {balance}");
                busted = true;
                break;
            }
            Err(err) => return Err(err).context("Spin rejected"),
        };

        let timed = scheduler.schedule(&events);
        if cli.trace {
            for phase in &timed {
                let line = serde_json::to_string(phase).context("Failed to encode phase")?;
                writeln!(out, "{line}")?;
            }
        }
        timeline_ms += scheduler.total_duration_ms(&events);
        played += 1;
    }

    Ok(Report {
        game: engine.config().name.clone(),
        seed: cli.seed,
        spins_requested: cli.spins,
        spins_played: played,
        rebuys,
        busted,
        balance: engine.balance(),
        free_spins_remaining: engine.free_spins_remaining(),
        session_win_total: engine.session_win_total(),
        timeline_ms,
        stats: engine.stats().clone(),
    })
}

fn print_summary(out: &mut impl Write, report: &Report) -> Result<()> {
    let stats = &report.stats;
    writeln!(out, "🍭 {}", report.game)?;
    writeln!(
        out,
        "   Spins:       {} / {} ({} paid, {} free)",
        report.spins_played, report.spins_requested, stats.paid_spins, stats.free_spins_played
    )?;
    if report.rebuys > 0 {
        writeln!(out, "   Rebuys:      {}", report.rebuys)?;
    }
    if report.busted {
        writeln!(out, "   Stopped:     balance below bet")?;
    }
    writeln!(out, "   Balance:     {}", report.balance)?;
    writeln!(out, "   Session win: {}", report.session_win_total)?;
    writeln!(out, "   RTP:         {:.2}%", stats.rtp())?;
    writeln!(out, "   Hit rate:    {:.2}%", stats.hit_rate())?;
    writeln!(
        out,
        "   Tumbles:     {} (deepest {})",
        stats.cascades, stats.max_cascade_depth
    )?;
    writeln!(
        out,
        "   Free spins:  {} awarded ({} triggers, {} retriggers)",
        stats.free_spins_awarded, stats.triggers, stats.retriggers
    )?;
    writeln!(
        out,
        "   Best:        {} (max multiplier {}x, {} big wins)",
        stats.max_win, stats.max_multiplier, stats.big_wins
    )?;
    writeln!(out, "   Timeline:    {:.1}s", report.timeline_ms as f64 / 1000.0)?;
    Ok(())
}
