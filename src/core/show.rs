//! Shows and the registry that owns them.
//!
//! Every [`Show`] carries its own `parking_lot::Mutex` around the seat counter,
//! so contention on one show never blocks bookings for another. The registry
//! itself is never resized after creation, which makes index lookups free of
//! synchronization.

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::BookingError;

/// Show identifier. Identifiers start at 1 and follow registry order.
pub type ShowId = usize;

/// A bookable show with a fixed capacity and a lock-protected seat counter.
#[derive(Debug)]
pub struct Show {
    id: ShowId,
    capacity: u32,
    available: Mutex<u32>,
}

impl Show {
    fn new(id: ShowId, capacity: u32) -> Self {
        Self {
            id,
            capacity,
            available: Mutex::new(capacity),
        }
    }

    /// Show identifier.
    #[must_use]
    pub const fn id(&self) -> ShowId {
        self.id
    }

    /// Seats the show started with.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Acquire the show's exclusive lock, blocking while another worker holds it.
    pub fn lock(&self) -> SeatGuard<'_> {
        SeatGuard {
            show_id: self.id,
            seats: self.available.lock(),
        }
    }

    /// Read the current seat count under a brief lock.
    #[must_use]
    pub fn available(&self) -> u32 {
        *self.available.lock()
    }

    /// Point-in-time view of this show.
    #[must_use]
    pub fn snapshot(&self) -> ShowSnapshot {
        ShowSnapshot {
            id: self.id,
            capacity: self.capacity,
            available: self.available(),
        }
    }
}

/// Exclusive access to one show's seat counter.
///
/// The lock is released when the guard is dropped. [`SeatGuard::take_one`] is
/// the only way to change the counter.
pub struct SeatGuard<'a> {
    show_id: ShowId,
    seats: MutexGuard<'a, u32>,
}

impl SeatGuard<'_> {
    /// Show this guard locks.
    #[must_use]
    pub const fn show_id(&self) -> ShowId {
        self.show_id
    }

    /// Seats currently available.
    #[must_use]
    pub fn available(&self) -> u32 {
        *self.seats
    }

    /// Take one seat. Returns the seats left afterwards, or `None` when sold out.
    pub fn take_one(&mut self) -> Option<u32> {
        let remaining = self.seats.checked_sub(1)?;
        *self.seats = remaining;
        Some(remaining)
    }
}

/// Per-show state handed to the reporting layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowSnapshot {
    /// Show identifier.
    pub id: ShowId,
    /// Seats the show started with.
    pub capacity: u32,
    /// Seats still available.
    pub available: u32,
}

impl ShowSnapshot {
    /// Seats booked so far.
    #[must_use]
    pub const fn booked(&self) -> u32 {
        self.capacity.saturating_sub(self.available)
    }

    /// Whether the counter lies within `0..=capacity`.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.available <= self.capacity
    }
}

/// Ordered, fixed-size collection of shows.
#[derive(Debug)]
pub struct ShowRegistry {
    shows: Vec<Show>,
}

impl ShowRegistry {
    /// Create `count` shows, each starting with `capacity` seats.
    ///
    /// # Errors
    ///
    /// - `BookingError::InvalidConfig` if `count` is zero
    /// - `BookingError::ResourceInit` if storage for the shows cannot be reserved
    pub fn create(count: usize, capacity: u32) -> Result<Self, BookingError> {
        Self::with_capacities(std::iter::repeat_n(capacity, count))
    }

    /// Create one show per capacity, in order. Allows shows of differing
    /// (including zero) capacity.
    ///
    /// # Errors
    ///
    /// - `BookingError::InvalidConfig` if no capacities are given
    /// - `BookingError::ResourceInit` if storage for the shows cannot be reserved
    pub fn with_capacities<I>(capacities: I) -> Result<Self, BookingError>
    where
        I: IntoIterator<Item = u32>,
        I::IntoIter: ExactSizeIterator,
    {
        let capacities = capacities.into_iter();
        let count = capacities.len();
        if count == 0 {
            return Err(BookingError::InvalidConfig(
                "show count must be greater than 0".into(),
            ));
        }

        // A failed reservation drops the partial vector before the error leaves.
        let mut shows = Vec::new();
        shows.try_reserve_exact(count).map_err(|e| {
            BookingError::ResourceInit(format!("cannot allocate storage for {count} shows: {e}"))
        })?;

        for (index, capacity) in capacities.enumerate() {
            let show = Show::new(index + 1, capacity);
            debug!(show_id = show.id, capacity, "show initialized");
            shows.push(show);
        }

        Ok(Self { shows })
    }

    /// Look up a show by zero-based index.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::ShowNotFound` if `index` is out of range.
    pub fn get(&self, index: usize) -> Result<&Show, BookingError> {
        self.shows.get(index).ok_or(BookingError::ShowNotFound {
            index,
            len: self.shows.len(),
        })
    }

    /// Number of shows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shows.len()
    }

    /// Whether the registry holds no shows. Always false for a registry built
    /// through [`ShowRegistry::create`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
    }

    /// Iterate shows in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Show> {
        self.shows.iter()
    }

    /// Sum of all show capacities.
    #[must_use]
    pub fn total_capacity(&self) -> u64 {
        self.shows.iter().map(|s| u64::from(s.capacity)).sum()
    }

    /// Snapshot every show, locking each one briefly in turn.
    ///
    /// While workers are running this is an intermediate view: each entry is
    /// consistent on its own, but the entries are not taken at the same instant.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ShowSnapshot> {
        self.shows.iter().map(Show::snapshot).collect()
    }

    /// Destroy every show lock and return the final per-show state.
    ///
    /// Taking `self` by value means no worker can still hold or acquire a lock.
    #[must_use]
    pub fn teardown(self) -> Vec<ShowSnapshot> {
        let snapshots = self
            .shows
            .into_iter()
            .map(|show| ShowSnapshot {
                id: show.id,
                capacity: show.capacity,
                available: show.available.into_inner(),
            })
            .collect::<Vec<_>>();
        debug!(shows = snapshots.len(), "show registry torn down");
        snapshots
    }
}
