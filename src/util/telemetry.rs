//! Telemetry helpers for structured logging.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_DIRECTIVE: &str = "ticket_lot=info";

/// Install the default subscriber unless one is already set.
///
/// Logs go to stderr so stdout stays free for the report.
pub fn init_tracing() {
    init_tracing_with(DEFAULT_LOG_DIRECTIVE);
}

/// Like [`init_tracing`], with a custom fallback filter directive.
pub fn init_tracing_with(default_directive: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .try_init();
}
