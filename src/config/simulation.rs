//! Simulation configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Admission limit of the reference configuration.
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 3;
/// Processing time per booking of the reference configuration.
pub const DEFAULT_PROCESSING_DELAY_MS: u64 = 100;
/// Gap between customer arrivals of the reference configuration.
pub const DEFAULT_ARRIVAL_DELAY_MS: u64 = 50;
/// Worker counts above this are accepted but logged as a performance warning.
pub const LARGE_WORKER_COUNT: usize = 1000;

/// How workers are mapped onto OS threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One dedicated thread per simulated customer.
    #[default]
    ThreadPerWorker,
    /// A fixed set of threads draining a queue of customers.
    Pool {
        /// Number of pool threads.
        threads: usize,
    },
}

impl ExecutionMode {
    /// Pool mode sized to the number of logical CPUs.
    #[must_use]
    pub fn pool_per_cpu() -> Self {
        Self::Pool {
            threads: num_cpus::get(),
        }
    }
}

/// Full configuration of one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of simulated customers.
    pub workers: usize,
    /// Seats each show starts with.
    pub tickets_per_show: u32,
    /// Number of shows.
    pub shows: usize,
    /// Maximum reservation attempts in flight at once.
    pub concurrency_limit: usize,
    /// Time spent in the critical section per successful booking, in milliseconds.
    pub processing_delay_ms: u64,
    /// Gap between consecutive worker starts, in milliseconds.
    pub arrival_delay_ms: u64,
    /// Seed for show selection. `None` draws fresh randomness each run.
    pub seed: Option<u64>,
    /// Thread model.
    pub execution: ExecutionMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            tickets_per_show: 5,
            shows: 3,
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            processing_delay_ms: DEFAULT_PROCESSING_DELAY_MS,
            arrival_delay_ms: DEFAULT_ARRIVAL_DELAY_MS,
            seed: None,
            execution: ExecutionMode::default(),
        }
    }
}

impl SimulationConfig {
    /// Reference configuration for the given workload.
    #[must_use]
    pub fn new(workers: usize, tickets_per_show: u32, shows: usize) -> Self {
        Self {
            workers,
            tickets_per_show,
            shows,
            ..Self::default()
        }
    }

    /// Set the admission limit.
    #[must_use]
    pub const fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    /// Set the per-booking processing delay.
    #[must_use]
    pub fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.processing_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the gap between worker arrivals.
    #[must_use]
    pub fn with_arrival_delay(mut self, delay: Duration) -> Self {
        self.arrival_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Make show selection deterministic.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Choose the thread model.
    #[must_use]
    pub const fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    /// Per-booking processing delay.
    #[must_use]
    pub const fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    /// Gap between worker arrivals.
    #[must_use]
    pub const fn arrival_delay(&self) -> Duration {
        Duration::from_millis(self.arrival_delay_ms)
    }

    /// Seats across all shows.
    #[must_use]
    pub fn total_tickets(&self) -> u64 {
        u64::from(self.tickets_per_show).saturating_mul(self.shows as u64)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("workers must be greater than 0".into());
        }
        if self.tickets_per_show == 0 {
            return Err("tickets_per_show must be greater than 0".into());
        }
        if self.shows == 0 {
            return Err("shows must be greater than 0".into());
        }
        if self.concurrency_limit == 0 {
            return Err("concurrency_limit must be greater than 0".into());
        }
        if let ExecutionMode::Pool { threads: 0 } = self.execution {
            return Err("pool threads must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// Missing fields fall back to the reference configuration.
    ///
    /// # Errors
    ///
    /// Returns a description of the parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
