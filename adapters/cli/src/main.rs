#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Yasashi Tower run without a display.

mod autoplay;
mod config;

use std::{path::PathBuf, time::Duration};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use glam::Vec2;
use log::{info, warn};
use serde::Serialize;
use yasashi_tower_core::{Event, SimulationSnapshot};
use yasashi_tower_world::{self as world, query, World};

/// Headless runner for a single Yasashi Tower simulation.
#[derive(Debug, Parser)]
#[command(name = "yasashi-tower", version)]
struct Args {
    /// TOML file overriding the stock board, waves, enemies and towers.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Simulated milliseconds advanced per tick.
    #[arg(long, value_name = "MS", default_value_t = 16)]
    dt_ms: u64,
    /// Upper bound on ticks before the run is abandoned.
    #[arg(long, value_name = "COUNT", default_value_t = 100_000)]
    max_ticks: u64,
    /// Tower placed before the first tick; may be repeated.
    #[arg(long = "tower", value_name = "X,Y", value_parser = parse_point)]
    towers: Vec<Vec2>,
    /// Number of towers to place at random legal spots.
    #[arg(long, value_name = "COUNT", default_value_t = 0)]
    auto_towers: u32,
    /// Seed for random tower placement.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Prints the final report as JSON instead of a summary line.
    #[arg(long)]
    json: bool,
    /// Logs spawns, attacks and placements.
    #[arg(short, long)]
    verbose: bool,
}

/// Event counts gathered over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
struct EventTally {
    spawned: u32,
    defeated: u32,
    escaped: u32,
    attacks: u32,
    waves_cleared: u32,
}

impl EventTally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            let counter = match event {
                Event::EnemySpawned { .. } => &mut self.spawned,
                Event::EnemyDefeated { .. } => &mut self.defeated,
                Event::EnemyReachedGoal { .. } => &mut self.escaped,
                Event::TowerAttacked { .. } => &mut self.attacks,
                Event::WaveCleared { .. } => &mut self.waves_cleared,
                _ => continue,
            };
            *counter = counter.saturating_add(1);
        }
    }
}

/// Final state printed when the runner exits.
#[derive(Debug, Serialize)]
struct RunReport {
    ticks: u64,
    finished: bool,
    tally: EventTally,
    snapshot: SimulationSnapshot,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    ensure!(args.dt_ms > 0, "--dt-ms must be greater than zero");

    let config = config::load(args.config.as_deref())?;
    let mut world = World::new(config).context("failed to create simulation")?;
    let mut events = Vec::new();

    for at in &args.towers {
        if let Err(error) = world::place_tower(&mut world, *at, &mut events) {
            warn!("skipping requested tower at ({}, {}): {error}", at.x, at.y);
        }
    }
    if args.auto_towers > 0 {
        let _ = autoplay::place_random_towers(&mut world, args.auto_towers, args.seed, &mut events);
    }

    let report = run(&mut world, Duration::from_millis(args.dt_ms), args.max_ticks)?;
    if args.json {
        let json = serde_json::to_string_pretty(&report).context("failed to encode run report")?;
        println!("{json}");
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run(world: &mut World, dt: Duration, max_ticks: u64) -> Result<RunReport> {
    let mut tally = EventTally::default();
    let mut events = Vec::new();
    let mut ticks = 0;

    while ticks < max_ticks && query::outcome(world).is_none() {
        world::tick(world, dt, &mut events)
            .with_context(|| format!("tick {ticks} failed"))?;
        tally.record(&events);
        events.clear();
        ticks += 1;
    }

    let finished = query::outcome(world).is_some();
    if !finished {
        warn!("run abandoned after {ticks} ticks without an outcome");
    }
    info!("simulated {:.1}s in {ticks} ticks", query::elapsed(world).as_secs_f32());

    Ok(RunReport {
        ticks,
        finished,
        tally,
        snapshot: query::snapshot(world),
    })
}

fn print_summary(report: &RunReport) {
    let snapshot = &report.snapshot;
    let result = match snapshot.outcome {
        Some(outcome) if outcome.is_win() => "won",
        Some(_) => "lost",
        None => "unfinished",
    };

    println!(
        "{result} after {:.1}s: wave {}/{}, score {}, lives {}, towers {}/{}",
        snapshot.elapsed.as_secs_f32(),
        snapshot.wave.current,
        snapshot.wave.total,
        snapshot.score,
        snapshot.lives,
        snapshot.max_tower_budget - snapshot.remaining_tower_budget,
        snapshot.max_tower_budget,
    );
    println!(
        "enemies spawned {}, defeated {}, escaped {}; {} attacks, {} waves cleared",
        report.tally.spawned,
        report.tally.defeated,
        report.tally.escaped,
        report.tally.attacks,
        report.tally.waves_cleared,
    );
}

fn parse_point(value: &str) -> Result<Vec2, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but found `{value}`"))?;
    let parse = |component: &str| {
        component
            .trim()
            .parse::<f32>()
            .map_err(|error| format!("invalid coordinate `{component}`: {error}"))
    };
    Ok(Vec2::new(parse(x)?, parse(y)?))
}
