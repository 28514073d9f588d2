//! Helper functions for creating specific error types

use super::types::CleanupError;

impl CleanupError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn session<S: Into<String>>(message: S) -> Self {
        Self::Session(message.into())
    }

    pub fn cancelled<S: Into<String>>(message: S) -> Self {
        Self::Cancelled(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error ends the whole run rather than one operation
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Session(_) | Self::Internal(_))
    }
}
