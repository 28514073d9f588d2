//! Cleanup configuration validators

use super::trait_def::Validate;
use crate::config::models::{CleanupConfig, MAX_DELAY_SECONDS};
use tracing::debug;

impl Validate for CleanupConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating cleanup configuration");

        let caps = [
            ("leave_concurrency", self.leave_concurrency),
            ("delete_history_concurrency", self.delete_history_concurrency),
            ("delete_contacts_concurrency", self.delete_contacts_concurrency),
            ("archive_concurrency", self.archive_concurrency),
            ("contact_batch_size", self.contact_batch_size),
        ];
        for (name, value) in caps {
            if value == 0 {
                return Err(format!("{} must be greater than 0", name));
            }
        }

        let delays = [
            ("action_sleep_seconds", self.action_sleep_seconds),
            ("action_jitter_seconds", self.action_jitter_seconds),
            ("min_peer_interval_seconds", self.min_peer_interval_seconds),
            ("throttle_jitter_seconds", self.throttle_jitter_seconds),
        ];
        for (name, value) in delays {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number", name));
            }
            if value > MAX_DELAY_SECONDS {
                return Err(format!(
                    "{} must not exceed {} seconds",
                    name, MAX_DELAY_SECONDS
                ));
            }
        }

        if self.report_directory.trim().is_empty() {
            return Err("report_directory cannot be empty".to_string());
        }

        Ok(())
    }
}
