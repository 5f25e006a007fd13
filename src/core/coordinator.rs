//! Coordinator: spawns reservation workers, waits for all of them, aggregates outcomes.
//!
//! Two thread models are supported:
//!
//! - **Thread per worker**: every customer gets a dedicated OS thread
//! - **Pool**: a fixed number of threads drain a `crossbeam-channel` queue of customers
//!
//! In both cases outcomes flow back over an unbounded channel, so a worker
//! never blocks on reporting. A worker that cannot be started is recorded as
//! an error outcome right away and is not part of the join barrier.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::config::ExecutionMode;
use crate::core::report::{BookingTotals, SimulationReport};
use crate::core::worker::{ReservationWorker, WorkerId, WorkerReport};
use crate::core::{AdmissionLimiter, BookingError, ShowRegistry, ShowSelector};

/// Spawns and joins reservation workers.
pub struct Coordinator {
    selector: Arc<dyn ShowSelector>,
    processing_delay: Duration,
    arrival_delay: Duration,
    execution: ExecutionMode,
    #[cfg(test)]
    refuse_spawn: Option<fn(&str) -> bool>,
}

impl Coordinator {
    /// Create a coordinator using `selector`, no delays and one thread per worker.
    #[must_use]
    pub fn new(selector: Arc<dyn ShowSelector>) -> Self {
        Self {
            selector,
            processing_delay: Duration::ZERO,
            arrival_delay: Duration::ZERO,
            execution: ExecutionMode::ThreadPerWorker,
            #[cfg(test)]
            refuse_spawn: None,
        }
    }

    /// Time each successful booking spends holding its show lock.
    #[must_use]
    pub fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.processing_delay = delay;
        self
    }

    /// Gap between consecutive worker starts.
    #[must_use]
    pub fn with_arrival_delay(mut self, delay: Duration) -> Self {
        self.arrival_delay = delay;
        self
    }

    /// Thread model.
    #[must_use]
    pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    /// Replace the show selector.
    #[must_use]
    pub fn with_selector(mut self, selector: Arc<dyn ShowSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// Make thread creation fail for every thread name matching `refuse`.
    #[cfg(test)]
    fn refusing_spawn(mut self, refuse: fn(&str) -> bool) -> Self {
        self.refuse_spawn = Some(refuse);
        self
    }

    /// Run `num_workers` workers against `registry` and `limiter`.
    ///
    /// Blocks until every started worker has terminated, then snapshots the
    /// registry. The returned report always holds exactly one outcome per worker.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::ResourceInit` if bookkeeping for `num_workers`
    /// workers cannot be allocated. No worker is started in that case.
    pub fn run(
        &self,
        num_workers: usize,
        registry: &Arc<ShowRegistry>,
        limiter: &Arc<AdmissionLimiter>,
    ) -> Result<SimulationReport, BookingError> {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("simulation", run_id = %run_id);
        let _entered = span.enter();

        info!(
            workers = num_workers,
            shows = registry.len(),
            concurrency_limit = limiter.capacity(),
            execution = ?self.execution,
            "starting reservation workers"
        );
        let slots = outcome_slots(num_workers)?;
        let started = Instant::now();

        let (results_tx, results_rx) = unbounded::<WorkerReport>();
        let spawn_failures = match self.execution {
            ExecutionMode::ThreadPerWorker => {
                self.run_thread_per_worker(num_workers, registry, limiter, &results_tx)?
            }
            ExecutionMode::Pool { threads } => {
                self.run_pool(threads, num_workers, registry, limiter, &results_tx)
            }
        };
        drop(results_tx);

        let workers = collect_reports(slots, spawn_failures, &results_rx);
        let totals = BookingTotals::from_reports(num_workers, &workers);
        let elapsed_ms = started.elapsed().as_millis();

        info!(
            booked = totals.booked,
            sold_out = totals.sold_out,
            errors = totals.errors,
            elapsed_ms,
            "all workers finished"
        );

        Ok(SimulationReport {
            run_id,
            concurrency_limit: limiter.capacity(),
            peak_in_flight: limiter.stats().peak_in_flight,
            shows: registry.snapshot(),
            workers,
            totals,
            elapsed_ms,
        })
    }

    fn worker(
        &self,
        worker_id: WorkerId,
        registry: &Arc<ShowRegistry>,
        limiter: &Arc<AdmissionLimiter>,
    ) -> ReservationWorker {
        ReservationWorker::new(
            worker_id,
            Arc::clone(registry),
            Arc::clone(limiter),
            Arc::clone(&self.selector),
        )
        .with_processing_delay(self.processing_delay)
    }

    #[cfg_attr(not(test), allow(clippy::unused_self))]
    fn spawn_named<F>(&self, name: String, body: F) -> io::Result<JoinHandle<()>>
    where
        F: FnOnce() + Send + 'static,
    {
        #[cfg(test)]
        if self.refuse_spawn.is_some_and(|refuse| refuse(&name)) {
            return Err(io::Error::other(format!("{name} refused")));
        }
        thread::Builder::new().name(name).spawn(body)
    }

    fn pause_between_arrivals(&self, worker_id: WorkerId, num_workers: usize) {
        if !self.arrival_delay.is_zero() && worker_id < num_workers {
            thread::sleep(self.arrival_delay);
        }
    }

    /// Spawn one thread per worker and join them all. Returns spawn failures.
    fn run_thread_per_worker(
        &self,
        num_workers: usize,
        registry: &Arc<ShowRegistry>,
        limiter: &Arc<AdmissionLimiter>,
        results: &Sender<WorkerReport>,
    ) -> Result<Vec<WorkerReport>, BookingError> {
        let mut handles: Vec<(WorkerId, JoinHandle<()>)> = Vec::new();
        handles.try_reserve_exact(num_workers).map_err(|e| {
            BookingError::ResourceInit(format!("cannot track {num_workers} worker threads: {e}"))
        })?;
        let mut failures = Vec::new();

        for worker_id in 1..=num_workers {
            let worker = self.worker(worker_id, registry, limiter);
            let results = results.clone();
            let spawned = self.spawn_named(format!("customer-{worker_id}"), move || {
                worker.run(&results);
            });

            match spawned {
                Ok(handle) => {
                    debug!(worker_id, "worker thread created");
                    handles.push((worker_id, handle));
                }
                Err(e) => {
                    let err = BookingError::Spawn {
                        worker_id,
                        reason: e.to_string(),
                    };
                    warn!(worker_id, error = %err, "worker not started");
                    failures.push(WorkerReport::failed(worker_id, &err));
                }
            }
            self.pause_between_arrivals(worker_id, num_workers);
        }

        for (worker_id, handle) in handles {
            if handle.join().is_err() {
                error!(worker_id, "worker thread panicked");
            }
        }
        Ok(failures)
    }

    /// Feed workers through a bounded set of pool threads. Returns workers that
    /// could not be handed to any pool thread.
    fn run_pool(
        &self,
        threads: usize,
        num_workers: usize,
        registry: &Arc<ShowRegistry>,
        limiter: &Arc<AdmissionLimiter>,
        results: &Sender<WorkerReport>,
    ) -> Vec<WorkerReport> {
        let (task_tx, task_rx) = unbounded::<ReservationWorker>();
        let pool_size = threads.min(num_workers).max(1);
        let mut pool = Vec::with_capacity(pool_size);

        for pool_id in 0..pool_size {
            let task_rx = task_rx.clone();
            let results = results.clone();
            let spawned = self.spawn_named(format!("booking-pool-{pool_id}"), move || {
                // Sender dropped by the coordinator ends the loop.
                for worker in &task_rx {
                    worker.run(&results);
                }
                debug!(pool_id, "pool thread exiting");
            });
            match spawned {
                Ok(handle) => pool.push((pool_id, handle)),
                Err(e) => warn!(pool_id, error = %e, "pool thread not started"),
            }
        }
        drop(task_rx);

        let mut failures = Vec::new();
        if pool.is_empty() {
            error!("no pool thread could be started");
            for worker_id in 1..=num_workers {
                let err = BookingError::Spawn {
                    worker_id,
                    reason: "no pool thread available".into(),
                };
                failures.push(WorkerReport::failed(worker_id, &err));
            }
            return failures;
        }
        info!(pool_threads = pool.len(), "booking pool started");

        for worker_id in 1..=num_workers {
            let worker = self.worker(worker_id, registry, limiter);
            if task_tx.send(worker).is_err() {
                let err = BookingError::Spawn {
                    worker_id,
                    reason: "booking pool stopped accepting customers".into(),
                };
                warn!(worker_id, error = %err, "worker not started");
                failures.push(WorkerReport::failed(worker_id, &err));
            }
            self.pause_between_arrivals(worker_id, num_workers);
        }
        drop(task_tx);

        for (pool_id, handle) in pool {
            if handle.join().is_err() {
                error!(pool_id, "pool thread panicked");
            }
        }
        failures
    }
}

/// One empty outcome slot per worker, allocated before any thread starts.
fn outcome_slots(num_workers: usize) -> Result<Vec<Option<WorkerReport>>, BookingError> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(num_workers).map_err(|e| {
        BookingError::ResourceInit(format!("cannot track outcomes for {num_workers} workers: {e}"))
    })?;
    slots.resize(num_workers, None);
    Ok(slots)
}

/// Merge reported outcomes with spawn failures. Any worker without an outcome
/// (its thread panicked) is recorded as lost. Sorted by worker id.
fn collect_reports(
    mut slots: Vec<Option<WorkerReport>>,
    spawn_failures: Vec<WorkerReport>,
    results: &Receiver<WorkerReport>,
) -> Vec<WorkerReport> {
    for report in spawn_failures.into_iter().chain(results.try_iter()) {
        if let Some(slot) = report
            .worker_id
            .checked_sub(1)
            .and_then(|index| slots.get_mut(index))
        {
            *slot = Some(report);
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.unwrap_or_else(|| {
                let worker_id = index + 1;
                let err = BookingError::WorkerLost { worker_id };
                warn!(worker_id, "no outcome reported");
                WorkerReport::failed(worker_id, &err)
            })
        })
        .collect()
}
