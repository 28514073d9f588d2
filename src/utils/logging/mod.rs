//! Logging setup
//!
//! The binary installs a `tracing` subscriber once at startup. `RUST_LOG`
//! takes precedence over the level passed on the command line.

use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor a level is given
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Build the env filter for a requested level
pub fn build_filter(level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.unwrap_or(DEFAULT_LOG_LEVEL)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Initialize the global tracing subscriber
///
/// Returns `false` when a subscriber was already installed.
pub fn init_tracing(level: Option<&str>, json: bool) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_target(false)
        .with_thread_ids(false);

    if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
