//! Owned lifecycle of one run: shared resources, coordinator, teardown.

use std::sync::Arc;

use tracing::debug;

use crate::config::SimulationConfig;
use crate::core::{
    AdmissionLimiter, BookingError, Coordinator, ShowRegistry, ShowSelector, SimulationReport,
};

/// A fully initialized simulation, ready to run once.
///
/// Build it with [`crate::builders::build_simulation`].
pub struct Simulation {
    config: SimulationConfig,
    registry: Arc<ShowRegistry>,
    limiter: Arc<AdmissionLimiter>,
    coordinator: Coordinator,
}

impl Simulation {
    pub(crate) fn new(
        config: SimulationConfig,
        registry: Arc<ShowRegistry>,
        limiter: Arc<AdmissionLimiter>,
        coordinator: Coordinator,
    ) -> Self {
        Self {
            config,
            registry,
            limiter,
            coordinator,
        }
    }

    /// Replace the show selector.
    #[must_use]
    pub fn with_selector(mut self, selector: Arc<dyn ShowSelector>) -> Self {
        self.coordinator = self.coordinator.with_selector(selector);
        self
    }

    /// Configuration this simulation was built from.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Shared show registry, for intermediate snapshots while running.
    #[must_use]
    pub const fn registry(&self) -> &Arc<ShowRegistry> {
        &self.registry
    }

    /// Shared admission limiter.
    #[must_use]
    pub const fn limiter(&self) -> &Arc<AdmissionLimiter> {
        &self.limiter
    }

    /// Run every worker, then close the limiter and tear down the registry.
    ///
    /// # Errors
    ///
    /// - `BookingError::ResourceInit` if worker bookkeeping cannot be allocated
    /// - `BookingError::InvariantViolation` if the final state breaks seat accounting
    ///
    /// Per-worker failures are reported inside the report.
    pub fn run(self) -> Result<SimulationReport, BookingError> {
        let outcome = self
            .coordinator
            .run(self.config.workers, &self.registry, &self.limiter);

        self.limiter.close();
        let mut report = outcome?;
        match Arc::try_unwrap(self.registry) {
            Ok(registry) => report.shows = registry.teardown(),
            // Someone still holds a handle; the registry is dropped with its last owner.
            Err(_) => debug!("show registry still shared, teardown deferred"),
        }

        report.check_invariants()?;
        Ok(report)
    }
}
