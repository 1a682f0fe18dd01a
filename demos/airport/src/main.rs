//! airport — command-line runner for the airport shuttle simulation.
//!
//! One shuttle serves a line of stops (stop 0 is the airport terminal)
//! while three Poisson streams of passenger groups arrive: from the
//! airport, from the parking lots back to the airport, and between lots.
//!
//! ```text
//! airport                                   # reference day, seed 42
//! airport --config configs/reference.json --status
//! airport --seed 7 --horizon 3600 --output output/airport
//! airport --replications 16                 # seed sweep, one line per run
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`, `--verbose` for `debug`).

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use shuttle_core::ShuttleConfig;
use shuttle_output::{CsvWriter, SimOutputObserver};
use shuttle_sim::{
    RunSummary, SimBuilder, SimObserver, Snapshot, TripRecord, replication_seeds,
    run_replications,
};

/// Airport shuttle discrete-event simulation
#[derive(Parser, Debug)]
#[command(name = "airport")]
#[command(about = "Simulate an airport shuttle serving a line of parking lots", long_about = None)]
struct Args {
    /// JSON run configuration (fields left out keep their defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured RNG seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the configured horizon (virtual time units)
    #[arg(long)]
    horizon: Option<f64>,

    /// Override the configured number of stops
    #[arg(long)]
    stops: Option<u16>,

    /// Run this many independent replications instead of a single run
    #[arg(short, long, default_value = "1")]
    replications: usize,

    /// Write snapshots.csv, stops.csv and trips.csv into this directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print every monitor snapshot to stdout
    #[arg(long)]
    status: bool,

    /// Debug-level logging when RUST_LOG is unset
    #[arg(short, long)]
    verbose: bool,
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Prints status reports and forwards everything to the CSV observer.
struct RunObserver {
    output: Option<SimOutputObserver<CsvWriter>>,
    status: bool,
}

impl SimObserver for RunObserver {
    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        if self.status {
            println!("{snapshot}");
        }
        if let Some(out) = &mut self.output {
            out.on_snapshot(snapshot);
        }
    }

    fn on_trip(&mut self, trip: &TripRecord) {
        if let Some(out) = &mut self.output {
            out.on_trip(trip);
        }
    }

    fn on_sim_end(&mut self, summary: &RunSummary) {
        if let Some(out) = &mut self.output {
            out.on_sim_end(summary);
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = load_config(&args)?;
    config.validate().context("invalid run configuration")?;
    info!(
        stops = config.stop_count,
        horizon = config.horizon,
        seed = config.seed,
        "configuration loaded"
    );

    if args.replications > 1 {
        if args.output.is_some() || args.status {
            warn!("--output and --status apply to single runs only; ignoring them");
        }
        return sweep(&config, args.replications);
    }
    single_run(config, args.output.as_deref(), args.status)
}

fn load_config(args: &Args) -> Result<ShuttleConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => ShuttleConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(horizon) = args.horizon {
        config.horizon = horizon;
    }
    if let Some(stops) = args.stops {
        config.stop_count = stops;
    }
    Ok(config)
}

fn single_run(config: ShuttleConfig, output: Option<&Path>, status: bool) -> Result<()> {
    let output = match output {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
            Some(SimOutputObserver::new(CsvWriter::new(dir)?))
        }
        None => None,
    };
    let mut observer = RunObserver { output, status };

    let mut sim = SimBuilder::new(config).build()?;
    let t0 = Instant::now();
    let summary = sim.run(&mut observer)?;
    let elapsed = t0.elapsed();

    if let Some(out) = &mut observer.output {
        if let Some(e) = out.take_error() {
            bail!("output error: {e}");
        }
        let (snapshots, trips) = out.written();
        println!("Wrote {snapshots} snapshots and {trips} trips");
    }

    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!();
    println!("{summary}");
    Ok(())
}

fn sweep(config: &ShuttleConfig, count: usize) -> Result<()> {
    let seeds = replication_seeds(config.seed, count);
    let t0 = Instant::now();
    let summaries = run_replications(config, &seeds)?;
    let elapsed = t0.elapsed();

    println!(
        "{:<22} {:>9} {:>9} {:>10} {:>10} {:>8}",
        "Seed", "Spawned", "Trips", "Mean wait", "Mean ride", "Peak"
    );
    println!("{}", "-".repeat(73));
    for s in &summaries {
        println!(
            "{:<22} {:>9} {:>9} {:>10.2} {:>10.2} {:>8}",
            s.seed,
            s.spawned,
            s.completed(),
            s.trips.mean_wait(),
            s.trips.mean_ride(),
            s.peak_riders,
        );
    }

    let n = summaries.len() as f64;
    let mean_wait = summaries.iter().map(|s| s.trips.mean_wait()).sum::<f64>() / n;
    let mean_ride = summaries.iter().map(|s| s.trips.mean_ride()).sum::<f64>() / n;
    println!("{}", "-".repeat(73));
    println!("{:<22} {:>9} {:>9} {:>10.2} {:>10.2}", "mean", "", "", mean_wait, mean_ride);
    println!();
    println!("{count} replications in {:.3} s", elapsed.as_secs_f64());
    Ok(())
}
