//! Remote session collaborator
//!
//! The session handle is owned by the caller and already authorized. The
//! orchestrator only calls the named operations below; everything about how
//! they reach the remote API is the implementor's concern.

mod error;
mod scripted;

pub use error::{FailureKind, TransportError, TransportResult};
pub use scripted::{CallRecord, ScriptedSession, SessionCall};

use crate::core::models::RelationshipEntity;
use async_trait::async_trait;

/// Operations the orchestrator needs from a remote account session
///
/// Implementations must be shareable across tasks; every method may be
/// called concurrently for different entities.
#[async_trait]
pub trait RemoteSession: Send + Sync {
    /// Leave a group or channel
    async fn leave_entity(&self, entity: &RelationshipEntity) -> TransportResult<()>;

    /// Delete the conversation history, for both sides when `revoke` is set
    async fn delete_history(&self, entity: &RelationshipEntity, revoke: bool)
    -> TransportResult<()>;

    /// Ids of every contact of the account
    async fn list_contacts(&self) -> TransportResult<Vec<i64>>;

    /// Remove a batch of contacts
    async fn delete_contacts(&self, ids: &[i64]) -> TransportResult<()>;

    /// Dialogs that still exist on the account
    async fn list_dialogs(&self) -> TransportResult<Vec<RelationshipEntity>>;

    /// Move a dialog to the archive folder
    async fn archive_entity(&self, entity: &RelationshipEntity) -> TransportResult<()>;
}
