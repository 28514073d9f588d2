//! Configuration management for the sweeper
//!
//! This module handles loading, validation, and environment overrides of the
//! cleanup configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{CleanupError, Result};
use std::env;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Prefix of every environment override
pub const ENV_PREFIX: &str = "SWEEPER_";

/// Main configuration struct for the sweeper
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Cleanup run tunables
    pub cleanup: CleanupConfig,
}

impl Config {
    pub fn new(cleanup: CleanupConfig) -> Self {
        Self { cleanup }
    }

    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CleanupError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml_str(&content)?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let cleanup: CleanupConfig = serde_yaml::from_str(content)
            .map_err(|e| CleanupError::Config(format!("Failed to parse config: {}", e)))?;

        let config = Self { cleanup };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from defaults plus environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `SWEEPER_*` environment variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        let c = &mut self.cleanup;
        override_from_env("LEAVE_CONCURRENCY", &mut c.leave_concurrency)?;
        override_from_env(
            "DELETE_HISTORY_CONCURRENCY",
            &mut c.delete_history_concurrency,
        )?;
        override_from_env(
            "DELETE_CONTACTS_CONCURRENCY",
            &mut c.delete_contacts_concurrency,
        )?;
        override_from_env("ARCHIVE_CONCURRENCY", &mut c.archive_concurrency)?;
        override_from_env("ACTION_SLEEP_SECONDS", &mut c.action_sleep_seconds)?;
        override_from_env("ACTION_JITTER_SECONDS", &mut c.action_jitter_seconds)?;
        override_from_env(
            "MIN_PEER_INTERVAL_SECONDS",
            &mut c.min_peer_interval_seconds,
        )?;
        override_from_env("THROTTLE_JITTER_SECONDS", &mut c.throttle_jitter_seconds)?;
        override_from_env("REVOKE_BY_DEFAULT", &mut c.revoke_by_default)?;
        override_from_env("REPORT_DIRECTORY", &mut c.report_directory)?;
        override_from_env("CONTACT_BATCH_SIZE", &mut c.contact_batch_size)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.cleanup.validate().map_err(CleanupError::Config)
    }

    /// Get cleanup configuration
    pub fn cleanup(&self) -> &CleanupConfig {
        &self.cleanup
    }
}

fn override_from_env<T>(name: &str, target: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let key = format!("{}{}", ENV_PREFIX, name);
    if let Ok(raw) = env::var(&key) {
        *target = raw
            .trim()
            .parse()
            .map_err(|e| CleanupError::Config(format!("Invalid {}: {}", key, e)))?;
        debug!("Applied override {}", key);
    }
    Ok(())
}
