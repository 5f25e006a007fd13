//! Reservation worker: one simulated customer running the booking protocol.
//!
//! The protocol order is fixed:
//!
//! 1. pick a show (no lock needed, the registry never changes shape)
//! 2. take an admission permit
//! 3. lock the chosen show
//! 4. check and decrement the seat counter under the lock
//! 5. unlock the show
//! 6. return the admission permit
//! 7. report the outcome
//!
//! Steps 5 and 6 are guard drops, so they run on every exit path.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::show::ShowId;
use crate::core::{AdmissionLimiter, BookingError, ShowRegistry, ShowSelector};

/// Worker identifier. Identifiers start at 1.
pub type WorkerId = usize;

/// Result of one reservation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReservationOutcome {
    /// A seat was taken.
    Booked {
        /// Show that was booked.
        show_id: ShowId,
        /// Seats left on that show right after this booking.
        remaining: u32,
    },
    /// The chosen show had no seats left; nothing was changed.
    SoldOut {
        /// Show that was sold out.
        show_id: ShowId,
    },
    /// The attempt was abandoned before reaching the critical section.
    Failed {
        /// Human-readable cause.
        reason: String,
    },
}

impl ReservationOutcome {
    /// Whether a seat was booked.
    #[must_use]
    pub const fn is_booked(&self) -> bool {
        matches!(self, Self::Booked { .. })
    }

    /// Whether the attempt found the show sold out.
    #[must_use]
    pub const fn is_sold_out(&self) -> bool {
        matches!(self, Self::SoldOut { .. })
    }

    /// Whether the attempt failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Show the attempt targeted, if it got that far.
    #[must_use]
    pub const fn show_id(&self) -> Option<ShowId> {
        match self {
            Self::Booked { show_id, .. } | Self::SoldOut { show_id } => Some(*show_id),
            Self::Failed { .. } => None,
        }
    }
}

impl From<BookingError> for ReservationOutcome {
    fn from(err: BookingError) -> Self {
        Self::Failed {
            reason: err.to_string(),
        }
    }
}

/// Outcome reported by one worker to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerReport {
    /// Worker that produced the outcome.
    pub worker_id: WorkerId,
    /// What happened.
    #[serde(flatten)]
    pub outcome: ReservationOutcome,
}

impl WorkerReport {
    /// Report for a worker that never ran the protocol.
    #[must_use]
    pub fn failed(worker_id: WorkerId, err: &BookingError) -> Self {
        Self {
            worker_id,
            outcome: ReservationOutcome::Failed {
                reason: err.to_string(),
            },
        }
    }
}

/// One simulated customer.
pub struct ReservationWorker {
    id: WorkerId,
    registry: Arc<ShowRegistry>,
    limiter: Arc<AdmissionLimiter>,
    selector: Arc<dyn ShowSelector>,
    processing_delay: Duration,
}

impl ReservationWorker {
    /// Create a worker sharing the given registry, limiter and selector.
    #[must_use]
    pub fn new(
        id: WorkerId,
        registry: Arc<ShowRegistry>,
        limiter: Arc<AdmissionLimiter>,
        selector: Arc<dyn ShowSelector>,
    ) -> Self {
        Self {
            id,
            registry,
            limiter,
            selector,
            processing_delay: Duration::ZERO,
        }
    }

    /// Time spent "processing" a booking while the show lock is held.
    #[must_use]
    pub fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.processing_delay = delay;
        self
    }

    /// Worker identifier.
    #[must_use]
    pub const fn id(&self) -> WorkerId {
        self.id
    }

    /// Run the protocol once and return the outcome.
    ///
    /// # Errors
    ///
    /// - `BookingError::ShowNotFound` if the selector returned a bad index
    /// - `BookingError::LimiterClosed` if no permit can be obtained
    pub fn attempt(&self) -> Result<ReservationOutcome, BookingError> {
        let worker_id = self.id;
        let index = self.selector.select(worker_id, self.registry.len());
        let show = self.registry.get(index)?;
        let show_id = show.id();
        debug!(worker_id, show_id, "selected show");

        let permit = self.limiter.acquire()?;
        debug!(worker_id, show_id, "admitted");

        let outcome = {
            let mut seats = show.lock();
            debug!(worker_id, show_id, available = seats.available(), "show locked");

            if seats.available() == 0 {
                ReservationOutcome::SoldOut { show_id }
            } else {
                if !self.processing_delay.is_zero() {
                    thread::sleep(self.processing_delay);
                }
                seats
                    .take_one()
                    .map_or(ReservationOutcome::SoldOut { show_id }, |remaining| {
                        ReservationOutcome::Booked { show_id, remaining }
                    })
            }
        };
        debug!(worker_id, show_id, "show unlocked");

        drop(permit);
        debug!(worker_id, show_id, "admission released");

        match &outcome {
            ReservationOutcome::Booked { remaining, .. } => {
                debug!(worker_id, show_id, remaining, "booking successful");
            }
            _ => debug!(worker_id, show_id, "sold out"),
        }
        Ok(outcome)
    }

    /// Run the protocol and send the outcome to `results`.
    pub fn run(self, results: &Sender<WorkerReport>) {
        let outcome = self.attempt().unwrap_or_else(|err| {
            warn!(worker_id = self.id, error = %err, "reservation attempt abandoned");
            err.into()
        });
        let report = WorkerReport {
            worker_id: self.id,
            outcome,
        };
        if results.send(report).is_err() {
            warn!(worker_id = self.id, "coordinator stopped listening for outcomes");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RoundRobinSelector;

    fn worker(
        id: WorkerId,
        registry: &Arc<ShowRegistry>,
        limiter: &Arc<AdmissionLimiter>,
        selector: Arc<dyn ShowSelector>,
    ) -> ReservationWorker {
        ReservationWorker::new(id, Arc::clone(registry), Arc::clone(limiter), selector)
    }

    #[test]
    fn test_attempt_books_then_sells_out() {
        let registry = Arc::new(ShowRegistry::create(1, 1).unwrap());
        let limiter = Arc::new(AdmissionLimiter::new(3).unwrap());
        let selector: Arc<dyn ShowSelector> = Arc::new(RoundRobinSelector);

        let first = worker(1, &registry, &limiter, Arc::clone(&selector)).attempt().unwrap();
        assert_eq!(first, ReservationOutcome::Booked { show_id: 1, remaining: 0 });

        let second = worker(2, &registry, &limiter, selector).attempt().unwrap();
        assert_eq!(second, ReservationOutcome::SoldOut { show_id: 1 });
        assert_eq!(limiter.stats().in_flight, 0);
    }

    #[test]
    fn test_bad_index_reports_error_without_admission() {
        let registry = Arc::new(ShowRegistry::create(2, 1).unwrap());
        let limiter = Arc::new(AdmissionLimiter::new(1).unwrap());
        let selector: Arc<dyn ShowSelector> = Arc::new(|_: WorkerId, _: usize| -> usize { 7 });

        let err = worker(1, &registry, &limiter, selector).attempt().unwrap_err();
        assert!(matches!(err, BookingError::ShowNotFound { index: 7, len: 2 }));
        assert_eq!(limiter.stats().total_admitted, 0);
    }

    #[test]
    fn test_closed_limiter_fails_attempt() {
        let registry = Arc::new(ShowRegistry::create(1, 1).unwrap());
        let limiter = Arc::new(AdmissionLimiter::new(1).unwrap());
        limiter.close();

        let (tx, rx) = crossbeam_channel::unbounded();
        worker(4, &registry, &limiter, Arc::new(RoundRobinSelector)).run(&tx);
        let report = rx.recv().unwrap();
        assert_eq!(report.worker_id, 4);
        assert!(report.outcome.is_failed());
        assert_eq!(registry.get(0).unwrap().available(), 1);
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let report = WorkerReport {
            worker_id: 3,
            outcome: ReservationOutcome::Booked { show_id: 2, remaining: 4 },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["worker_id"], 3);
        assert_eq!(json["outcome"], "booked");
        assert_eq!(json["remaining"], 4);
    }
}
