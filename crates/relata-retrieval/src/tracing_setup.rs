//! Structured JSON logging.
//!
//! The filter comes from `RELATA_LOG`, then the configured level. Installing twice
//! is harmless: later calls leave the first subscriber in place.

use tracing_subscriber::EnvFilter;

use relata_core::config::ObservabilityConfig;
use relata_core::constants::LOG_ENV_VAR;

/// Install the subscriber with `RELATA_LOG`, defaulting to `info`.
pub fn init_tracing() -> bool {
    init_tracing_from(&ObservabilityConfig::default())
}

/// Install the subscriber with `RELATA_LOG`, defaulting to `config.log_level`.
pub fn init_tracing_from(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .try_init()
        .is_ok()
}

/// Install the subscriber with an explicit filter (tests, embedding hosts).
pub fn init_tracing_with_filter(filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .json()
        .try_init()
        .is_ok()
}
