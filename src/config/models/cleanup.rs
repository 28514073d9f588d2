//! Cleanup run configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Tunables for one cleanup run
///
/// Keys are snake_case; the camelCase spellings are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanupConfig {
    /// Max concurrent leave operations
    #[serde(default = "default_leave_concurrency", alias = "leaveConcurrency")]
    pub leave_concurrency: usize,
    /// Max concurrent history deletions
    #[serde(
        default = "default_delete_history_concurrency",
        alias = "deleteHistoryConcurrency"
    )]
    pub delete_history_concurrency: usize,
    /// Max concurrent contact batch deletions
    #[serde(
        default = "default_delete_contacts_concurrency",
        alias = "deleteContactsConcurrency"
    )]
    pub delete_contacts_concurrency: usize,
    /// Max concurrent archive operations
    #[serde(default = "default_archive_concurrency", alias = "archiveConcurrency")]
    pub archive_concurrency: usize,
    /// Fixed pacing delay after every remote call
    #[serde(default = "default_action_sleep_seconds", alias = "actionSleepSeconds")]
    pub action_sleep_seconds: f64,
    /// Random extra pacing in `[0, action_jitter_seconds]`
    #[serde(
        default = "default_action_jitter_seconds",
        alias = "actionJitterSeconds"
    )]
    pub action_jitter_seconds: f64,
    /// Minimum spacing between two operations on the same entity
    #[serde(
        default = "default_min_peer_interval_seconds",
        alias = "minPeerIntervalSeconds"
    )]
    pub min_peer_interval_seconds: f64,
    /// Random extra suspension in `[0, throttle_jitter_seconds]`
    #[serde(
        default = "default_throttle_jitter_seconds",
        alias = "throttleJitterSeconds"
    )]
    pub throttle_jitter_seconds: f64,
    /// Delete history for both sides first
    #[serde(default = "default_revoke_by_default", alias = "revokeByDefault")]
    pub revoke_by_default: bool,
    /// Where report artifacts are written
    #[serde(default = "default_report_directory", alias = "reportDirectory")]
    pub report_directory: String,
    /// Contacts removed per remote call
    #[serde(default = "default_contact_batch_size", alias = "contactBatchSize")]
    pub contact_batch_size: usize,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            leave_concurrency: default_leave_concurrency(),
            delete_history_concurrency: default_delete_history_concurrency(),
            delete_contacts_concurrency: default_delete_contacts_concurrency(),
            archive_concurrency: default_archive_concurrency(),
            action_sleep_seconds: default_action_sleep_seconds(),
            action_jitter_seconds: default_action_jitter_seconds(),
            min_peer_interval_seconds: default_min_peer_interval_seconds(),
            throttle_jitter_seconds: default_throttle_jitter_seconds(),
            revoke_by_default: default_revoke_by_default(),
            report_directory: default_report_directory(),
            contact_batch_size: default_contact_batch_size(),
        }
    }
}

impl CleanupConfig {
    /// A configuration with every delay and jitter set to zero
    ///
    /// Concurrency caps and policy flags keep their defaults.
    pub fn without_delays() -> Self {
        Self {
            action_sleep_seconds: 0.0,
            action_jitter_seconds: 0.0,
            min_peer_interval_seconds: 0.0,
            throttle_jitter_seconds: 0.0,
            ..Self::default()
        }
    }

    pub fn action_sleep(&self) -> Duration {
        seconds(self.action_sleep_seconds)
    }

    pub fn action_jitter(&self) -> Duration {
        seconds(self.action_jitter_seconds)
    }

    pub fn min_peer_interval(&self) -> Duration {
        seconds(self.min_peer_interval_seconds)
    }

    pub fn throttle_jitter(&self) -> Duration {
        seconds(self.throttle_jitter_seconds)
    }

    pub fn report_dir(&self) -> PathBuf {
        PathBuf::from(&self.report_directory)
    }
}

/// Upper bound for every delay setting
pub const MAX_DELAY_SECONDS: f64 = 86_400.0;

/// Negative or non-finite values collapse to zero, oversized ones to the bound
fn seconds(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::try_from_secs_f64(value.min(MAX_DELAY_SECONDS)).unwrap_or(Duration::ZERO)
    } else {
        Duration::ZERO
    }
}
