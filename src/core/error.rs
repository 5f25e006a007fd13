//! Error types for reservation components.

use thiserror::Error;

use crate::core::show::ShowId;
use crate::core::worker::WorkerId;

/// Errors produced by the registry, the admission limiter, workers and the coordinator.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Input rejected before any resource was allocated.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Storage or synchronization setup failed.
    #[error("resource initialization failed: {0}")]
    ResourceInit(String),
    /// The admission limiter was torn down; no further permits are handed out.
    #[error("admission limiter is closed")]
    LimiterClosed,
    /// A worker selected a show index the registry does not hold.
    #[error("show index {index} out of range (registry holds {len} shows)")]
    ShowNotFound {
        /// Index that was requested.
        index: usize,
        /// Number of shows in the registry.
        len: usize,
    },
    /// The OS refused to start a worker thread.
    #[error("failed to spawn worker {worker_id}: {reason}")]
    Spawn {
        /// Worker that never started.
        worker_id: WorkerId,
        /// Reason reported by the runtime.
        reason: String,
    },
    /// A worker terminated without reporting an outcome.
    #[error("worker {worker_id} terminated without reporting an outcome")]
    WorkerLost {
        /// Worker whose outcome is missing.
        worker_id: WorkerId,
    },
    /// A seat accounting invariant does not hold.
    #[error("invariant violated for show {show_id}: {detail}")]
    InvariantViolation {
        /// Show whose counters disagree (0 for run-wide checks).
        show_id: ShowId,
        /// Description of the violation.
        detail: String,
    },
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
