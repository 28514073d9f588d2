//! # account-sweeper
//!
//! Rate-limit aware bulk cleanup of a remote messaging account. Given a
//! pre-classified worklist, the sweeper leaves groups and channels, erases
//! history with direct chats and bots, removes contacts and archives what is
//! left, then writes a CSV and a JSON report of every action.
//!
//! ## Features
//!
//! - **Lanes**: every operation kind has its own concurrency limit
//! - **Rate gate**: operations on the same entity are spaced apart
//! - **Throttle handling**: a throttle signal pauses the whole lane, then the
//!   throttled call is retried once
//! - **Exactly one record per entity and phase**, even on panics and
//!   cancellation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use account_sweeper::{CleanupConfig, RelationshipEntity, ScriptedSession, Worklist, run_cleanup};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let worklist = Worklist::new(vec![
//!         RelationshipEntity::group(-1001, "Old project"),
//!         RelationshipEntity::direct(42, "alice"),
//!     ]);
//!     let session = Arc::new(ScriptedSession::new().with_dialogs(worklist.entities.clone()));
//!
//!     let summary = run_cleanup(session, "demo", CleanupConfig::default(), &worklist, false).await;
//!     println!("{:?}", summary.statistics);
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::{CleanupConfig, Config};
pub use utils::error::{CleanupError, Result};

pub use core::RunContext;
pub use core::batch::{BatchRunner, CleanupSummary, DryRunPlan, Phase, run_cleanup};
pub use core::executor::{ExecuteOptions, OperationExecutor};
pub use core::lanes::{ConcurrencyLane, LanePermit, LaneSet};
pub use core::models::{
    ActionRecord, ActionStatus, EntityCategory, OperationKind, RelationshipEntity, RunStatistics,
    SubAction, Worklist,
};
pub use core::rate_gate::RateGate;
pub use core::report::{ReportAggregator, ReportWriter, RunReport};
pub use core::session::{
    FailureKind, RemoteSession, ScriptedSession, SessionCall, TransportError, TransportResult,
};
pub use core::throttle::ThrottleBackoff;

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
