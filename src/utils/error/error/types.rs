//! Error types for the sweeper

use thiserror::Error;

/// Result type alias for the sweeper
pub type Result<T> = std::result::Result<T, CleanupError>;

/// Main error type for the sweeper
///
/// Per-entity remote failures never surface here; they are resolved into
/// action records. Only faults that stop a run, or that happen outside of
/// one, are represented.
#[derive(Error, Debug)]
pub enum CleanupError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The remote session can no longer be used
    #[error("Session error: {0}")]
    Session(String),

    /// The run was cancelled
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
