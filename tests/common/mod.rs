//! Common test utilities for account-sweeper
//!
//! This module provides shared test infrastructure for all tests:
//! - Worklist fixtures and runner factories
//! - A mock session with no expectations
//! - Custom assertions and helpers
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::fixtures::{Scenario, WorklistFactory};
//!
//! #[tokio::test(start_paused = true)]
//! async fn my_test() {
//!     let worklist = WorklistFactory::mixed(2, 1, 3, 0);
//!     let scenario = Scenario::new(ScriptedSession::new());
//!     let summary = scenario.run(&worklist).await;
//!     // ...
//! }
//! ```

pub mod assertions;
pub mod fixtures;
pub mod sessions;

// Re-export commonly used items
pub use fixtures::{Scenario, WorklistFactory};
pub use sessions::MockSession;
