//! Core functionality of the sweeper
//!
//! This module contains the run orchestration and its data model.

pub mod batch; // Phased fan-out over a worklist
pub mod context;
pub mod executor; // One operation, one record
pub mod lanes; // Per-kind concurrency limits
pub mod models;
pub mod rate_gate; // Per-entity spacing
pub mod report;
pub mod session;
pub mod throttle;

pub use context::RunContext;
