//! Configuration data models
//!
//! This module defines the configuration structures used by the sweeper.

pub mod cleanup;

// Re-export all configuration types
pub use cleanup::*;

/// Default concurrent leave operations
pub fn default_leave_concurrency() -> usize {
    3
}

/// Default concurrent history deletions
pub fn default_delete_history_concurrency() -> usize {
    2
}

/// Default concurrent contact batch deletions
pub fn default_delete_contacts_concurrency() -> usize {
    3
}

/// Default concurrent archive operations
pub fn default_archive_concurrency() -> usize {
    1
}

/// Pacing delay after every remote call, in seconds
pub fn default_action_sleep_seconds() -> f64 {
    0.3
}

/// Upper bound of the random jitter added to the pacing delay
pub fn default_action_jitter_seconds() -> f64 {
    0.1
}

pub fn default_min_peer_interval_seconds() -> f64 {
    1.5
}

/// Upper bound of the random jitter added to throttle suspensions
pub fn default_throttle_jitter_seconds() -> f64 {
    3.0
}

pub fn default_revoke_by_default() -> bool {
    true
}

pub fn default_report_directory() -> String {
    "./reports".to_string()
}

/// Contacts removed per remote call
pub fn default_contact_batch_size() -> usize {
    100
}
