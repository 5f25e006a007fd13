//! Stress tests for the booking protocol
//!
//! Demand far beyond capacity, with concurrent observers sampling the limiter
//! and the show counters while workers run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ticket_lot::config::ExecutionMode;
use ticket_lot::core::{AdmissionLimiter, Coordinator, RandomSelector, ShowRegistry};

/// Sample limiter and registry until `done` is set. Returns the number of samples.
fn observe(
    registry: Arc<ShowRegistry>,
    limiter: Arc<AdmissionLimiter>,
    done: Arc<AtomicBool>,
) -> thread::JoinHandle<usize> {
    thread::spawn(move || {
        let mut samples = 0;
        while !done.load(Ordering::Acquire) {
            let stats = limiter.stats();
            assert!(
                stats.in_flight <= stats.capacity,
                "{} admitted with limit {}",
                stats.in_flight,
                stats.capacity
            );
            for show in registry.snapshot() {
                assert!(show.is_consistent(), "show {} out of bounds", show.id);
            }
            samples += 1;
            thread::yield_now();
        }
        samples
    })
}

#[test]
fn test_demand_far_beyond_capacity() {
    const LIMIT: usize = 3;

    let registry = Arc::new(ShowRegistry::create(4, 5).unwrap());
    let limiter = Arc::new(AdmissionLimiter::new(LIMIT).unwrap());
    let done = Arc::new(AtomicBool::new(false));
    let observer = observe(Arc::clone(&registry), Arc::clone(&limiter), Arc::clone(&done));

    let report = Coordinator::new(Arc::new(RandomSelector::default()))
        .with_processing_delay(Duration::from_micros(200))
        .run(500, &registry, &limiter)
        .unwrap();

    done.store(true, Ordering::Release);
    let samples = observer.join().unwrap();
    assert!(samples > 0);

    assert!(report.check_invariants().is_ok());
    assert!(report.peak_in_flight <= LIMIT);
    assert_eq!(report.totals.errors, 0);
    assert_eq!(report.totals.booked + report.totals.sold_out, 500);
    for show in &report.shows {
        assert!(show.booked() <= show.capacity);
    }
    // 500 random picks over 4 shows leave no show untouched in practice,
    // but only the upper bound is a correctness property.
    assert!(report.totals.booked <= 20);
}

#[test]
fn test_limit_of_one_serializes_admission() {
    let registry = Arc::new(ShowRegistry::create(3, 50).unwrap());
    let limiter = Arc::new(AdmissionLimiter::new(1).unwrap());

    let report = Coordinator::new(Arc::new(RandomSelector::new(Some(7))))
        .run(120, &registry, &limiter)
        .unwrap();

    assert_eq!(report.peak_in_flight, 1);
    assert_eq!(limiter.stats().total_admitted, 120);
    assert_eq!(report.totals.booked, 120);
    assert!(report.check_invariants().is_ok());
}

#[test]
fn test_pool_under_contention() {
    let registry = Arc::new(ShowRegistry::create(2, 10).unwrap());
    let limiter = Arc::new(AdmissionLimiter::new(3).unwrap());

    let report = Coordinator::new(Arc::new(RandomSelector::default()))
        .with_execution(ExecutionMode::Pool { threads: 8 })
        .run(1_000, &registry, &limiter)
        .unwrap();

    assert!(report.check_invariants().is_ok());
    assert_eq!(report.totals.errors, 0);
    assert!(report.totals.booked <= 20);
    assert_eq!(limiter.stats().in_flight, 0);
}

#[test]
fn test_repeated_single_show_races() {
    for _ in 0..25 {
        let registry = Arc::new(ShowRegistry::create(1, 3).unwrap());
        let limiter = Arc::new(AdmissionLimiter::new(3).unwrap());
        let report = Coordinator::new(Arc::new(RandomSelector::default()))
            .run(16, &registry, &limiter)
            .unwrap();

        assert_eq!(report.totals.booked, 3);
        assert_eq!(report.totals.sold_out, 13);
        assert_eq!(registry.get(0).unwrap().available(), 0);
    }
}
