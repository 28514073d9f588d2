//! Phased batch execution of a cleanup run
//!
//! Phases run in order: leave groups and channels, erase history with
//! direct chats and bots, remove contacts, archive whatever remains. Each
//! phase fans out one task per item; the lanes bound how many are in flight.

mod runner;
mod types;


pub use runner::{BatchRunner, run_cleanup};
pub use types::{CleanupSummary, DryRunPlan, Phase};
