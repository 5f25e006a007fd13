//! Admission limiter: a counting semaphore bounding in-flight reservation attempts.
//!
//! Permits are handed out as [`AdmissionPermit`] guards. Dropping the guard
//! returns exactly one permit, so a worker gives its slot back on every exit
//! path, including sold-out and error paths.
//!
//! Waiters park on a `parking_lot::Condvar`; releases wake one waiter at a
//! time, which gives roughly FIFO admission without any fairness guarantee.

use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::BookingError;

/// Permit accounting protected by the limiter mutex.
#[derive(Debug)]
struct LimiterState {
    available: usize,
    in_flight: usize,
    peak_in_flight: usize,
    total_admitted: u64,
    closed: bool,
}

/// Diagnostic view of the limiter. Workers never consult it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LimiterStats {
    /// Configured number of permits.
    pub capacity: usize,
    /// Permits currently held.
    pub in_flight: usize,
    /// Highest number of permits held at the same time.
    pub peak_in_flight: usize,
    /// Permits granted since creation.
    pub total_admitted: u64,
    /// Whether the limiter has been torn down.
    pub closed: bool,
}

/// Process-wide counting permit pool.
#[derive(Debug)]
pub struct AdmissionLimiter {
    capacity: usize,
    state: Mutex<LimiterState>,
    permit_released: Condvar,
}

impl AdmissionLimiter {
    /// Create a limiter with `capacity` permits.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::InvalidConfig` if `capacity` is zero, since no
    /// worker could ever be admitted.
    pub fn new(capacity: usize) -> Result<Self, BookingError> {
        if capacity == 0 {
            return Err(BookingError::InvalidConfig(
                "concurrency limit must be greater than 0".into(),
            ));
        }
        debug!(capacity, "admission limiter initialized");
        Ok(Self {
            capacity,
            state: Mutex::new(LimiterState {
                available: capacity,
                in_flight: 0,
                peak_in_flight: 0,
                total_admitted: 0,
                closed: false,
            }),
            permit_released: Condvar::new(),
        })
    }

    /// Configured number of permits.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Block until a permit is free, then take it.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::LimiterClosed` if the limiter is closed before or
    /// while waiting.
    pub fn acquire(&self) -> Result<AdmissionPermit<'_>, BookingError> {
        let mut state = self.state.lock();
        while state.available == 0 && !state.closed {
            self.permit_released.wait(&mut state);
        }
        if state.closed {
            return Err(BookingError::LimiterClosed);
        }
        Ok(self.grant(&mut state))
    }

    /// Take a permit only if one is free right now.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::LimiterClosed` if the limiter is closed.
    pub fn try_acquire(&self) -> Result<Option<AdmissionPermit<'_>>, BookingError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(BookingError::LimiterClosed);
        }
        if state.available == 0 {
            return Ok(None);
        }
        Ok(Some(self.grant(&mut state)))
    }

    fn grant(&self, state: &mut LimiterState) -> AdmissionPermit<'_> {
        state.available -= 1;
        state.in_flight += 1;
        state.peak_in_flight = state.peak_in_flight.max(state.in_flight);
        state.total_admitted += 1;
        AdmissionPermit { limiter: self }
    }

    fn release(&self) {
        {
            let mut state = self.state.lock();
            state.available += 1;
            state.in_flight -= 1;
        }
        self.permit_released.notify_one();
    }

    /// Tear the limiter down. Later `acquire` calls fail and current waiters
    /// are woken to fail. Outstanding permits can still be released.
    pub fn close(&self) {
        let was_closed = {
            let mut state = self.state.lock();
            std::mem::replace(&mut state.closed, true)
        };
        if !was_closed {
            debug!("admission limiter closed");
        }
        self.permit_released.notify_all();
    }

    /// Whether [`AdmissionLimiter::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> LimiterStats {
        let state = self.state.lock();
        LimiterStats {
            capacity: self.capacity,
            in_flight: state.in_flight,
            peak_in_flight: state.peak_in_flight,
            total_admitted: state.total_admitted,
            closed: state.closed,
        }
    }
}

/// One admission permit. Returned to the limiter on drop.
#[must_use = "dropping the permit releases the admission slot immediately"]
#[derive(Debug)]
pub struct AdmissionPermit<'a> {
    limiter: &'a AdmissionLimiter,
}

impl Drop for AdmissionPermit<'_> {
    fn drop(&mut self) {
        self.limiter.release();
    }
}
