//! Mock session
//!
//! A `MockSession` without expectations panics on any call, which makes it
//! the simplest way to prove a code path never reaches the remote side.

use account_sweeper::{RelationshipEntity, RemoteSession, TransportResult};
use async_trait::async_trait;
use mockall::mock;

mock! {
    pub Session {}

    #[async_trait]
    impl RemoteSession for Session {
        async fn leave_entity(&self, entity: &RelationshipEntity) -> TransportResult<()>;
        async fn delete_history(&self, entity: &RelationshipEntity, revoke: bool) -> TransportResult<()>;
        async fn list_contacts(&self) -> TransportResult<Vec<i64>>;
        async fn delete_contacts(&self, ids: &[i64]) -> TransportResult<()>;
        async fn list_dialogs(&self) -> TransportResult<Vec<RelationshipEntity>>;
        async fn archive_entity(&self, entity: &RelationshipEntity) -> TransportResult<()>;
    }
}
