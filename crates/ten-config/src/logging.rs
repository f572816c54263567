//! Logging initialisation, grounded on the call convention at
//! `bin/strata/src/main.rs::init_logging` (env-filter driven, optional
//! JSON output, one-shot init at process start) - the concrete
//! subscriber wiring here uses `tracing-subscriber` directly since the
//! teacher's own `strata_common::logging` implementation isn't part of
//! the retrieved source, only its call sites.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingSection;

/// Initialises the global `tracing` subscriber once per process. Safe to
/// call only once; a second call panics, matching `tracing`'s own
/// global-default contract.
pub fn init_logging(service_name: &str, config: &LoggingSection) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if config.json_format {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .with_current_span(false)
            .init();
    } else {
        fmt().with_env_filter(filter).with_target(true).init();
    }

    tracing::info!(service = service_name, "logging initialised");
}
