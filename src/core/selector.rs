//! Show selection strategies.
//!
//! Correctness of the booking protocol never depends on which show a worker
//! picks; selectors only decide how load spreads across shows.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::worker::WorkerId;

/// Chooses the show a worker will try to book.
///
/// Implemented for plain closures, so tests can drive selection directly.
pub trait ShowSelector: Send + Sync {
    /// Return a zero-based show index for `worker_id`. `show_count` is
    /// always at least 1. Out-of-range indices surface as a worker error.
    fn select(&self, worker_id: WorkerId, show_count: usize) -> usize;
}

impl<F> ShowSelector for F
where
    F: Fn(WorkerId, usize) -> usize + Send + Sync,
{
    fn select(&self, worker_id: WorkerId, show_count: usize) -> usize {
        self(worker_id, show_count)
    }
}

/// Uniformly random selection.
///
/// Without a seed each call draws from the thread-local generator. With a seed,
/// every worker derives its own generator from the seed and its id, so a
/// worker's choice does not depend on scheduling order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector {
    seed: Option<u64>,
}

impl RandomSelector {
    /// Create a selector, optionally seeded.
    #[must_use]
    pub const fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    /// Seed in use, if any.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl ShowSelector for RandomSelector {
    fn select(&self, worker_id: WorkerId, show_count: usize) -> usize {
        if show_count <= 1 {
            return 0;
        }
        match self.seed {
            Some(seed) => {
                StdRng::seed_from_u64(worker_seed(seed, worker_id)).random_range(0..show_count)
            }
            None => rand::rng().random_range(0..show_count),
        }
    }
}

/// Per-worker generator seed. Multiplying the id by the 64-bit golden ratio
/// spreads neighbouring ids apart, so runs with adjacent seeds do not pick the
/// same shows shifted by one worker.
const fn worker_seed(seed: u64, worker_id: WorkerId) -> u64 {
    seed ^ (worker_id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Deterministic selection cycling through shows by worker id.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinSelector;

impl ShowSelector for RoundRobinSelector {
    fn select(&self, worker_id: WorkerId, show_count: usize) -> usize {
        worker_id.saturating_sub(1) % show_count.max(1)
    }
}
