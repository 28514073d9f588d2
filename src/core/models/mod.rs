//! Data model of a cleanup run
//!
//! Entities and worklists come from the enumeration collaborator; records,
//! statistics and reports are produced by the run.

mod entity;
mod operation;
mod record;
mod statistics;

pub use entity::{EntityCategory, RelationshipEntity, Worklist};
pub use operation::{OperationKind, SubAction};
pub use record::{ActionRecord, ActionStatus};
pub use statistics::{Counter, RunStatistics};
