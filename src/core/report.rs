//! Final snapshot of a simulation run, consumed by the reporting layer.

use serde::{Deserialize, Serialize};

use crate::core::show::ShowSnapshot;
use crate::core::worker::WorkerReport;
use crate::core::BookingError;

/// Aggregate outcome counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookingTotals {
    /// Workers the coordinator was asked to run.
    pub workers: usize,
    /// Attempts that booked a seat.
    pub booked: usize,
    /// Attempts that found their show sold out.
    pub sold_out: usize,
    /// Attempts that failed, including workers that never started.
    pub errors: usize,
}

impl BookingTotals {
    /// Count outcomes in `reports`.
    #[must_use]
    pub fn from_reports(workers: usize, reports: &[WorkerReport]) -> Self {
        reports.iter().fold(
            Self {
                workers,
                ..Self::default()
            },
            |mut totals, report| {
                if report.outcome.is_booked() {
                    totals.booked += 1;
                } else if report.outcome.is_sold_out() {
                    totals.sold_out += 1;
                } else {
                    totals.errors += 1;
                }
                totals
            },
        )
    }
}

/// Everything the reporting layer needs once all workers have terminated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Identifier of this run.
    pub run_id: String,
    /// Admission limit the run used.
    pub concurrency_limit: usize,
    /// Highest number of simultaneously admitted workers observed.
    pub peak_in_flight: usize,
    /// Final per-show state, in id order.
    pub shows: Vec<ShowSnapshot>,
    /// Per-worker outcomes, in worker id order.
    pub workers: Vec<WorkerReport>,
    /// Aggregate counts.
    pub totals: BookingTotals,
    /// Wall-clock duration of the run in milliseconds.
    pub elapsed_ms: u128,
}

impl SimulationReport {
    /// Sum of show capacities.
    #[must_use]
    pub fn total_capacity(&self) -> u64 {
        self.shows.iter().map(|s| u64::from(s.capacity)).sum()
    }

    /// Sum of seats still available.
    #[must_use]
    pub fn total_available(&self) -> u64 {
        self.shows.iter().map(|s| u64::from(s.available)).sum()
    }

    /// Sum of seats booked, derived from the show counters.
    #[must_use]
    pub fn total_booked_seats(&self) -> u64 {
        self.shows.iter().map(|s| u64::from(s.booked())).sum()
    }

    /// Whether every show has zero seats left.
    #[must_use]
    pub fn all_sold_out(&self) -> bool {
        self.shows.iter().all(|s| s.available == 0)
    }

    /// Booked attempts as a percentage of workers.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.totals.workers == 0 {
            return 0.0;
        }
        self.totals.booked as f64 * 100.0 / self.totals.workers as f64
    }

    /// Verify the seat accounting invariants.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::InvariantViolation` if any show counter is out of
    /// bounds, if a show was booked more often than its capacity, if booked
    /// seats and booked outcomes disagree, if the admission limit was exceeded,
    /// or if some worker has no outcome.
    pub fn check_invariants(&self) -> Result<(), BookingError> {
        for show in &self.shows {
            if !show.is_consistent() {
                return Err(BookingError::InvariantViolation {
                    show_id: show.id,
                    detail: format!(
                        "available {} exceeds capacity {}",
                        show.available, show.capacity
                    ),
                });
            }
            let booked_outcomes = self
                .workers
                .iter()
                .filter(|w| w.outcome.is_booked() && w.outcome.show_id() == Some(show.id))
                .count();
            if booked_outcomes != show.booked() as usize {
                return Err(BookingError::InvariantViolation {
                    show_id: show.id,
                    detail: format!(
                        "{booked_outcomes} booked outcomes but {} seats taken",
                        show.booked()
                    ),
                });
            }
        }

        if self.total_booked_seats() != self.totals.booked as u64 {
            return Err(BookingError::InvariantViolation {
                show_id: 0,
                detail: format!(
                    "{} seats taken but {} booked outcomes",
                    self.total_booked_seats(),
                    self.totals.booked
                ),
            });
        }
        if self.peak_in_flight > self.concurrency_limit {
            return Err(BookingError::InvariantViolation {
                show_id: 0,
                detail: format!(
                    "{} workers admitted at once with a limit of {}",
                    self.peak_in_flight, self.concurrency_limit
                ),
            });
        }
        if self.workers.len() != self.totals.workers {
            return Err(BookingError::InvariantViolation {
                show_id: 0,
                detail: format!(
                    "{} outcomes for {} workers",
                    self.workers.len(),
                    self.totals.workers
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ReservationOutcome;

    fn report(shows: Vec<ShowSnapshot>, workers: Vec<WorkerReport>) -> SimulationReport {
        let totals = BookingTotals::from_reports(workers.len(), &workers);
        SimulationReport {
            run_id: "test".into(),
            concurrency_limit: 3,
            peak_in_flight: 2,
            shows,
            workers,
            totals,
            elapsed_ms: 0,
        }
    }

    fn booked(worker_id: usize, show_id: usize) -> WorkerReport {
        WorkerReport {
            worker_id,
            outcome: ReservationOutcome::Booked { show_id, remaining: 0 },
        }
    }

    #[test]
    fn test_totals_from_reports() {
        let workers = vec![
            booked(1, 1),
            WorkerReport {
                worker_id: 2,
                outcome: ReservationOutcome::SoldOut { show_id: 1 },
            },
            WorkerReport::failed(3, &BookingError::LimiterClosed),
        ];
        let totals = BookingTotals::from_reports(3, &workers);
        assert_eq!(
            totals,
            BookingTotals { workers: 3, booked: 1, sold_out: 1, errors: 1 }
        );
    }

    #[test]
    fn test_consistent_report_passes() {
        let shows = vec![ShowSnapshot { id: 1, capacity: 2, available: 0 }];
        let report = report(shows, vec![booked(1, 1), booked(2, 1)]);
        assert!(report.check_invariants().is_ok());
        assert!(report.all_sold_out());
        assert!((report.success_rate() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lost_decrement_detected() {
        // Two booked outcomes but only one seat gone.
        let shows = vec![ShowSnapshot { id: 1, capacity: 2, available: 1 }];
        let report = report(shows, vec![booked(1, 1), booked(2, 1)]);
        assert!(matches!(
            report.check_invariants(),
            Err(BookingError::InvariantViolation { show_id: 1, .. })
        ));
    }

    #[test]
    fn test_counter_above_capacity_detected() {
        let shows = vec![ShowSnapshot { id: 4, capacity: 1, available: 2 }];
        let report = report(shows, vec![]);
        assert!(report.check_invariants().is_err());
    }

    #[test]
    fn test_admission_overrun_detected() {
        let shows = vec![ShowSnapshot { id: 1, capacity: 1, available: 1 }];
        let mut report = report(shows, vec![]);
        report.peak_in_flight = 4;
        assert!(report.check_invariants().is_err());
    }
}
