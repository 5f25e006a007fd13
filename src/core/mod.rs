//! Core reservation protocol: shows, admission control, workers and coordination.

pub mod error;
pub mod show;
pub mod limiter;
pub mod selector;
pub mod worker;
pub mod report;
pub mod coordinator;
pub mod simulation;

pub use error::{AppResult, BookingError};
pub use show::{SeatGuard, Show, ShowId, ShowRegistry, ShowSnapshot};
pub use limiter::{AdmissionLimiter, AdmissionPermit, LimiterStats};
pub use selector::{RandomSelector, RoundRobinSelector, ShowSelector};
pub use worker::{ReservationOutcome, ReservationWorker, WorkerId, WorkerReport};
pub use report::{BookingTotals, SimulationReport};
pub use coordinator::Coordinator;
pub use simulation::Simulation;
