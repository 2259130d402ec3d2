//! Amoeba Foraging Simulation
//!
//! Headless driver: runs the simulation and writes world snapshots to stdout
//! as JSON lines for an external renderer. Logs go to stderr.

use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use tracing_subscriber::EnvFilter;

use amoeba_core::config::DEFAULT_TUNING_PATH;
use amoeba_core::events::EventLogger;
use amoeba_core::output::StatsCollector;
use amoeba_core::{Environment, SimConfig};
use amoeba_events::{EventType, WorldSnapshot};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "amoeba_sim")]
#[command(about = "A headless amoeba foraging simulation")]
struct Args {
    /// TOML configuration file (defaults to ./amoeba.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Interval between world snapshots (in ticks, 0 for start and end only)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Pace ticks at the configured tick rate
    #[arg(long)]
    realtime: bool,

    /// Write simulation events to this JSONL file
    #[arg(long)]
    events: Option<PathBuf>,

    /// Only log these event types (comma separated: consumption, inert, birth)
    #[arg(long, value_delimiter = ',', requires = "events")]
    event_types: Vec<EventType>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<SimConfig, amoeba_core::ConfigError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None if Path::new(DEFAULT_TUNING_PATH).exists() => SimConfig::load_or_default(),
        None => SimConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(interval) = args.snapshot_interval {
        config.simulation.snapshot_interval = interval;
    }
    Ok(config)
}

fn emit_snapshot(out: &mut impl Write, snapshot: &WorldSnapshot) {
    match snapshot.to_json() {
        Ok(json) => {
            if let Err(e) = writeln!(out, "{}", json) {
                tracing::warn!(tick = snapshot.tick, "Could not write snapshot: {}", e);
            }
        }
        Err(e) => tracing::warn!(tick = snapshot.tick, "Could not serialize snapshot: {}", e),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    if args.print_default_config {
        return match SimConfig::default().to_toml() {
            Ok(toml) => {
                print!("{}", toml);
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("Could not render default configuration: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut logger = match &args.events {
        Some(path) => match EventLogger::create(path) {
            Ok(logger) => logger.only(&args.event_types),
            Err(e) => {
                tracing::error!("Could not open event log {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => EventLogger::null(),
    };

    let ticks = args.ticks.unwrap_or(config.simulation.default_ticks);
    let tick_interval = Duration::from_secs_f64(1.0 / f64::from(config.simulation.tick_rate.max(1)));

    tracing::info!(
        seed = config.simulation.seed,
        ticks,
        snapshot_interval = config.simulation.snapshot_interval,
        realtime = args.realtime,
        "Starting simulation"
    );

    let mut env = Environment::new(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let initial = env.snapshot_as("simulation_start");
    let mut stats = StatsCollector::starting_from(&initial);
    emit_snapshot(&mut out, &initial);

    for _ in 0..ticks {
        let started = Instant::now();
        env.update();

        let events = env.drain_events();
        stats.record_events(&events);
        if let Err(e) = logger.log_batch(&events) {
            tracing::warn!(tick = env.current_tick(), "Could not log events: {}", e);
        }

        if env.current_tick() < ticks && env.snapshot_due() {
            let snapshot = env.snapshot_as("periodic");
            emit_snapshot(&mut out, &snapshot);
        }

        if args.realtime {
            if let Some(remaining) = tick_interval.checked_sub(started.elapsed()) {
                thread::sleep(remaining);
            }
        }
    }

    let last = env.snapshot_as("simulation_end");
    emit_snapshot(&mut out, &last);
    if let Err(e) = out.flush() {
        tracing::warn!("Could not flush snapshots: {}", e);
    }
    if let Err(e) = logger.flush() {
        tracing::warn!("Could not flush event log: {}", e);
    }

    let summary = stats.generate_stats(env.current_tick(), &last);
    tracing::info!(
        ticks = summary.total_ticks,
        events = summary.total_events,
        food_consumed = summary.food_consumed,
        births = summary.births,
        inert = summary.agents_gone_inert,
        peak_active = summary.peak_active,
        final_active = summary.final_active,
        food_remaining = summary.food_remaining,
        snapshots = env.snapshot_count(),
        events_logged = logger.written_count(),
        "Simulation complete"
    );
    match serde_json::to_string(&summary) {
        Ok(json) => tracing::debug!(stats = %json, "Run statistics"),
        Err(e) => tracing::warn!("Could not serialize statistics: {}", e),
    }

    ExitCode::SUCCESS
}
