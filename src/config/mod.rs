//! Configuration models for simulation runs.

pub mod simulation;

pub use simulation::{
    ExecutionMode, SimulationConfig, DEFAULT_ARRIVAL_DELAY_MS, DEFAULT_CONCURRENCY_LIMIT,
    DEFAULT_PROCESSING_DELAY_MS, LARGE_WORKER_COUNT,
};
