//! Utility modules for the sweeper
//!
//! - **error**: Error types shared by every layer
//! - **logging**: Tracing subscriber setup

pub mod error; // Error handling
pub mod logging; // Logging setup

pub use error::{CleanupError, Result};

use std::time::Duration;
use tokio::time::Instant;

/// Roughly thirty years, the stand-in for "never" when a deadline overflows
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `base + delay`, clamped to a far-future instant instead of overflowing
pub fn instant_after(base: Instant, delay: Duration) -> Instant {
    base.checked_add(delay)
        .or_else(|| base.checked_add(FAR_FUTURE))
        .unwrap_or(base)
}

/// Format a duration in milliseconds as a human readable string
pub fn format_duration(duration_ms: u64) -> String {
    if duration_ms < 1000 {
        format!("{}ms", duration_ms)
    } else if duration_ms < 60_000 {
        format!("{:.1}s", duration_ms as f64 / 1000.0)
    } else if duration_ms < 3_600_000 {
        format!("{:.1}m", duration_ms as f64 / 60_000.0)
    } else {
        format!("{:.1}h", duration_ms as f64 / 3_600_000.0)
    }
}

/// Replace characters that would escape a report directory
pub fn sanitize_file_component(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect()
}
