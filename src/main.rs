//! Command-line entry point for the ticket reservation simulator.
//!
//! ```text
//! ticket-lot <workers> <tickets_per_show> <shows> [--limit K] [--json]
//! ```

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::{error, warn};

use ticket_lot::builders::build_simulation;
use ticket_lot::config::{
    ExecutionMode, SimulationConfig, DEFAULT_ARRIVAL_DELAY_MS, DEFAULT_CONCURRENCY_LIMIT,
    DEFAULT_PROCESSING_DELAY_MS, LARGE_WORKER_COUNT,
};
use ticket_lot::console::{render_json, ConfigHeader, FinalReport};
use ticket_lot::core::AppResult;
use ticket_lot::util::init_tracing;

/// Simulate concurrent ticket bookings across shows.
#[derive(Debug, Parser)]
#[command(name = "ticket-lot", version, about)]
struct Cli {
    /// Number of simulated customers.
    workers: usize,
    /// Seats each show starts with.
    tickets_per_show: u32,
    /// Number of shows.
    shows: usize,
    /// Maximum bookings in flight at once.
    #[arg(long, env = "TICKET_LOT_LIMIT", default_value_t = DEFAULT_CONCURRENCY_LIMIT)]
    limit: usize,
    /// Milliseconds a booking holds its show lock.
    #[arg(long, env = "TICKET_LOT_PROCESSING_MS", default_value_t = DEFAULT_PROCESSING_DELAY_MS)]
    processing_ms: u64,
    /// Milliseconds between customer arrivals.
    #[arg(long, env = "TICKET_LOT_ARRIVAL_MS", default_value_t = DEFAULT_ARRIVAL_DELAY_MS)]
    arrival_ms: u64,
    /// Seed for deterministic show selection.
    #[arg(long, env = "TICKET_LOT_SEED")]
    seed: Option<u64>,
    /// Run customers on a thread pool sized to the CPU count.
    #[arg(long)]
    pool: bool,
    /// Run customers on a thread pool of this size.
    #[arg(long, env = "TICKET_LOT_POOL_THREADS")]
    pool_threads: Option<usize>,
    /// Print the final report as JSON.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn to_config(&self) -> SimulationConfig {
        let execution = match (self.pool, self.pool_threads) {
            (_, Some(threads)) => ExecutionMode::Pool { threads },
            (true, None) => ExecutionMode::pool_per_cpu(),
            (false, None) => ExecutionMode::ThreadPerWorker,
        };
        SimulationConfig {
            workers: self.workers,
            tickets_per_show: self.tickets_per_show,
            shows: self.shows,
            concurrency_limit: self.limit,
            processing_delay_ms: self.processing_ms,
            arrival_delay_ms: self.arrival_ms,
            seed: self.seed,
            execution,
        }
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "simulation aborted");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> AppResult<()> {
    let config = cli.to_config();
    if config.workers > LARGE_WORKER_COUNT {
        warn!(
            workers = config.workers,
            "large number of users may cause performance issues"
        );
    }

    let simulation = build_simulation(&config)?;
    if !cli.json {
        println!("{}", ConfigHeader(&config));
    }

    let report = simulation.run()?;
    if cli.json {
        println!("{}", render_json(&report)?);
    } else {
        print!("{}", FinalReport(&report));
    }
    Ok(())
}
