//! # Ticket Lot
//!
//! A concurrent ticket reservation simulator built on `parking_lot` primitives.
//!
//! Simulated customers race for seats across a fixed set of shows under two
//! layered controls:
//!
//! - **Admission Limiter**: a counting semaphore capping how many reservation
//!   attempts are in flight at once
//! - **Per-show locks**: each show's seat counter sits behind its own mutex, so
//!   bookings for different shows never contend
//!
//! No interleaving can produce a negative seat count, an overbooking or a lost
//! decrement, and at most `K` customers are ever admitted together.
//!
//! ## Running a simulation
//!
//! ```rust
//! use std::time::Duration;
//! use ticket_lot::builders::build_simulation;
//! use ticket_lot::config::SimulationConfig;
//!
//! let cfg = SimulationConfig::new(100, 2, 3)
//!     .with_processing_delay(Duration::ZERO)
//!     .with_arrival_delay(Duration::ZERO);
//!
//! let report = build_simulation(&cfg)?.run()?;
//! assert_eq!(report.totals.booked, 6);
//! assert!(report.all_sold_out());
//! # Ok::<(), ticket_lot::core::BookingError>(())
//! ```
//!
//! ## Driving the pieces directly
//!
//! ```rust
//! use std::sync::Arc;
//! use ticket_lot::core::{AdmissionLimiter, Coordinator, RandomSelector, ShowRegistry};
//!
//! let registry = Arc::new(ShowRegistry::create(1, 1)?);
//! let limiter = Arc::new(AdmissionLimiter::new(3)?);
//!
//! let report = Coordinator::new(Arc::new(RandomSelector::default()))
//!     .run(5, &registry, &limiter)?;
//!
//! assert_eq!(report.totals.booked, 1);
//! assert_eq!(report.totals.sold_out, 4);
//! # Ok::<(), ticket_lot::core::BookingError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core reservation protocol and shared resources.
pub mod core;
/// Configuration models for simulation runs.
pub mod config;
/// Builders to construct simulations from configuration.
pub mod builders;
/// Console rendering of configuration and reports.
pub mod console;
/// Shared utilities.
pub mod util;
