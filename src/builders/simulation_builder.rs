//! Builder turning a validated configuration into a ready-to-run simulation.

use std::sync::Arc;

use tracing::info;

use crate::config::SimulationConfig;
use crate::core::{
    AdmissionLimiter, BookingError, Coordinator, RandomSelector, ShowRegistry, Simulation,
};

/// Build a simulation from configuration.
///
/// The limiter is created before the shows. If show allocation fails, the
/// limiter is dropped on the way out, so nothing stays half-initialized.
///
/// # Errors
///
/// - `BookingError::InvalidConfig` if the configuration does not validate
/// - `BookingError::ResourceInit` if shared resources cannot be created
pub fn build_simulation(cfg: &SimulationConfig) -> Result<Simulation, BookingError> {
    cfg.validate().map_err(BookingError::InvalidConfig)?;

    let limiter = Arc::new(AdmissionLimiter::new(cfg.concurrency_limit)?);
    let registry = Arc::new(ShowRegistry::create(cfg.shows, cfg.tickets_per_show)?);

    let coordinator = Coordinator::new(Arc::new(RandomSelector::new(cfg.seed)))
        .with_processing_delay(cfg.processing_delay())
        .with_arrival_delay(cfg.arrival_delay())
        .with_execution(cfg.execution);

    info!(
        shows = cfg.shows,
        tickets_per_show = cfg.tickets_per_show,
        concurrency_limit = cfg.concurrency_limit,
        "simulation resources initialized"
    );

    Ok(Simulation::new(cfg.clone(), registry, limiter, coordinator))
}
