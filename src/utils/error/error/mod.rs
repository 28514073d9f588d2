//! Error handling for the sweeper
//!
//! This module defines the error type returned by configuration loading,
//! report writing and fatal session faults.

mod helpers;
mod types;

pub use types::{CleanupError, Result};
