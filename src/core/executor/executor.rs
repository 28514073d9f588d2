//! Operation executor

use super::guard::RecordGuard;
use crate::core::context::RunContext;
use crate::core::models::{ActionRecord, OperationKind, RelationshipEntity, SubAction};
use crate::core::session::{FailureKind, RemoteSession, TransportError, TransportResult};
use crate::core::throttle::{Attempt, BackoffOutcome};
use crate::utils::error::{CleanupError, Result};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// History was removed for this account only after a refused revoke
pub const PARTIAL_SELF_ONLY_MESSAGE: &str = "Partial: only self messages deleted";
/// The entity no longer exists on the remote side
pub const INVALID_PEER_MESSAGE: &str = "Invalid peer";
/// The run was cancelled before the operation was dispatched
pub const CANCELLED_MESSAGE: &str = "Cancelled before dispatch";
/// The work was dropped before it reached a terminal state
pub const ABORTED_MESSAGE: &str = "Operation aborted before completion";

/// Per-call options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Erase history for both sides
    pub revoke: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self { revoke: true }
    }
}

/// Runs single operations against the session
///
/// Every remote call on an entity passes the rate gate first and is followed
/// by the configured pacing delay. Throttle signals go through the lane's
/// backoff. The caller holds the lane permit.
pub struct OperationExecutor {
    ctx: Arc<RunContext>,
    session: Arc<dyn RemoteSession>,
}

impl OperationExecutor {
    pub fn new(ctx: Arc<RunContext>, session: Arc<dyn RemoteSession>) -> Self {
        Self { ctx, session }
    }

    pub fn context(&self) -> &Arc<RunContext> {
        &self.ctx
    }

    /// Perform `kind` on `entity` and append exactly one record
    ///
    /// Returns the appended record. An infrastructure fault is recorded
    /// first and then returned as [`CleanupError::Session`].
    pub async fn execute(
        &self,
        entity: &RelationshipEntity,
        kind: OperationKind,
        options: ExecuteOptions,
    ) -> Result<ActionRecord> {
        let mut guard = RecordGuard::new(
            ActionRecord::new(entity, kind),
            self.ctx.report().clone(),
        );
        debug!("Executing {} on {} ({})", kind, entity.id, entity.title);

        let fatal = match kind {
            OperationKind::Leave => self.leave(entity, guard.record_mut()).await,
            OperationKind::EraseHistory => {
                self.erase_history(entity, options.revoke, guard.record_mut())
                    .await
            }
            OperationKind::RemoveContact => {
                self.remove_contact(entity, guard.record_mut()).await
            }
            OperationKind::Archive => self.archive_one(entity, guard.record_mut()).await,
        };

        let record = guard.commit();
        match fatal {
            Some(err) => Err(err),
            None => Ok(record),
        }
    }

    /// Append a skipped record without touching the session
    pub fn skip(&self, entity: &RelationshipEntity, kind: OperationKind, reason: &str) -> ActionRecord {
        let mut record = ActionRecord::new(entity, kind);
        record.skip(reason);
        self.ctx.report().record(record.clone());
        record
    }

    /// Append a skipped record for work the cancelled run never dispatched
    pub fn skip_cancelled(&self, entity: &RelationshipEntity, kind: OperationKind) -> ActionRecord {
        let mut record = ActionRecord::new(entity, kind);
        record.skip(CANCELLED_MESSAGE);
        self.ctx.report().record_undispatched(record.clone());
        record
    }

    /// Append a failed record without touching the session
    pub fn abandon(
        &self,
        entity: &RelationshipEntity,
        kind: OperationKind,
        reason: &str,
    ) -> ActionRecord {
        let mut record = ActionRecord::new(entity, kind);
        record.fail(reason);
        self.ctx.report().record(record.clone());
        record
    }

    /// Remove one batch of contacts
    ///
    /// A failed batch counts one error and removes nothing. Returns how many
    /// contacts were removed.
    pub async fn remove_contacts(&self, ids: &[i64]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let outcome = self
            .guarded(OperationKind::RemoveContact, None, || {
                self.session.delete_contacts(ids)
            })
            .await;

        match outcome.result {
            Ok(()) => {
                self.ctx.report().add_contacts_deleted(ids.len() as u64);
                debug!("Removed {} contacts", ids.len());
                Ok(ids.len())
            }
            Err(err) => {
                self.ctx.report().note_error();
                error!("Error deleting {} contacts: {}", ids.len(), err);
                Self::escalate(&err).map_or(Ok(0), Err)
            }
        }
    }

    /// Contacts currently on the account
    ///
    /// `None` when listing failed; the failure counts one error.
    pub async fn list_contacts(&self) -> Result<Option<Vec<i64>>> {
        let outcome = self
            .guarded(OperationKind::RemoveContact, None, || {
                self.session.list_contacts()
            })
            .await;

        match outcome.result {
            Ok(ids) => Ok(Some(ids)),
            Err(err) => {
                self.ctx.report().note_error();
                error!("Error listing contacts: {}", err);
                Self::escalate(&err).map_or(Ok(None), Err)
            }
        }
    }

    /// Dialogs still present on the account; empty when listing failed
    pub async fn list_dialogs(&self) -> Result<Vec<RelationshipEntity>> {
        let outcome = self
            .guarded(OperationKind::Archive, None, || self.session.list_dialogs())
            .await;

        match outcome.result {
            Ok(dialogs) => Ok(dialogs),
            Err(err) => {
                warn!("Cannot list dialogs for archiving: {}", err);
                Self::escalate(&err).map_or(Ok(Vec::new()), Err)
            }
        }
    }

    /// Archive one dialog, best effort
    ///
    /// Returns whether the dialog was archived. Non-fatal failures are
    /// logged and swallowed.
    pub async fn archive(&self, entity: &RelationshipEntity) -> Result<bool> {
        let outcome = self
            .guarded(OperationKind::Archive, Some(entity.id), || {
                self.session.archive_entity(entity)
            })
            .await;

        match outcome.result {
            Ok(()) => {
                self.ctx.report().add_dialogs_closed(1);
                Ok(true)
            }
            Err(err) => {
                debug!("Cannot archive {} ({}): {}", entity.id, entity.title, err);
                Self::escalate(&err).map_or(Ok(false), Err)
            }
        }
    }

    async fn leave(
        &self,
        entity: &RelationshipEntity,
        record: &mut ActionRecord,
    ) -> Option<CleanupError> {
        let outcome = self
            .guarded(OperationKind::Leave, Some(entity.id), || {
                self.session.leave_entity(entity)
            })
            .await;

        match outcome.result {
            Ok(()) => {
                record.push(SubAction::Left);
                record.succeed();
                info!("Left {} {} ({})", entity.category, entity.id, entity.title);
                None
            }
            Err(err) => self.resolve_failure(entity, record, &err, outcome.attempt),
        }
    }

    async fn erase_history(
        &self,
        entity: &RelationshipEntity,
        revoke: bool,
        record: &mut ActionRecord,
    ) -> Option<CleanupError> {
        let outcome = self
            .guarded(OperationKind::EraseHistory, Some(entity.id), || {
                self.session.delete_history(entity, revoke)
            })
            .await;

        let err = match outcome.result {
            Ok(()) => {
                record.push(SubAction::HistoryDeleted);
                if revoke {
                    record.push(SubAction::Revoked);
                }
                record.succeed();
                info!("Deleted history with {} ({})", entity.id, entity.title);
                return None;
            }
            Err(err) => err,
        };

        if !revoke || err.classify() != FailureKind::PermissionDenied {
            return self.resolve_failure(entity, record, &err, outcome.attempt);
        }

        // Single fallback: this account's side only. Its failures are final.
        warn!(
            "Revoke refused for {} ({}), deleting own history only",
            entity.id,
            err.code()
        );
        let fallback = self
            .guarded(OperationKind::EraseHistory, Some(entity.id), || {
                self.session.delete_history(entity, false)
            })
            .await;

        match fallback.result {
            Ok(()) => {
                record.push(SubAction::HistoryDeleted);
                record.partial(PARTIAL_SELF_ONLY_MESSAGE);
                None
            }
            Err(err) => self.resolve_failure(entity, record, &err, fallback.attempt),
        }
    }

    async fn remove_contact(
        &self,
        entity: &RelationshipEntity,
        record: &mut ActionRecord,
    ) -> Option<CleanupError> {
        let ids = [entity.id];
        let outcome = self
            .guarded(OperationKind::RemoveContact, Some(entity.id), || {
                self.session.delete_contacts(&ids)
            })
            .await;

        match outcome.result {
            Ok(()) => {
                record.push(SubAction::ContactRemoved);
                record.succeed();
                None
            }
            Err(err) => self.resolve_failure(entity, record, &err, outcome.attempt),
        }
    }

    async fn archive_one(
        &self,
        entity: &RelationshipEntity,
        record: &mut ActionRecord,
    ) -> Option<CleanupError> {
        let outcome = self
            .guarded(OperationKind::Archive, Some(entity.id), || {
                self.session.archive_entity(entity)
            })
            .await;

        match outcome.result {
            Ok(()) => {
                record.push(SubAction::Archived);
                record.succeed();
                None
            }
            Err(err) => self.resolve_failure(entity, record, &err, outcome.attempt),
        }
    }

    /// Finalize `record` for a failed call
    ///
    /// Returns the error that must abort the run, if any.
    fn resolve_failure(
        &self,
        entity: &RelationshipEntity,
        record: &mut ActionRecord,
        err: &TransportError,
        attempt: Attempt,
    ) -> Option<CleanupError> {
        match err.classify() {
            FailureKind::PermissionDenied => {
                warn!(
                    "{} on {} ({}) refused: {}",
                    record.kind,
                    entity.id,
                    entity.title,
                    err.code()
                );
                record.fail(format!("Permission error: {}", err.code()));
            }
            FailureKind::EntityGone => {
                warn!("Invalid peer {} ({})", entity.id, entity.title);
                record.skip(INVALID_PEER_MESSAGE);
            }
            FailureKind::Infrastructure => {
                error!(
                    "Session fault during {} on {}: {}",
                    record.kind, entity.id, err
                );
                record.fail(err.to_string());
                return Some(CleanupError::session(err.to_string()));
            }
            FailureKind::Throttled { .. } | FailureKind::Unknown => {
                error!("{} on {} failed: {}", record.kind, entity.id, err);
                if attempt == Attempt::Retried {
                    record.fail(format!("Retry failed: {}", err));
                } else {
                    record.fail(err.to_string());
                }
            }
        }
        None
    }

    /// Error that aborts the run for a failure outside a record
    fn escalate(err: &TransportError) -> Option<CleanupError> {
        match err.classify() {
            FailureKind::Infrastructure => Some(CleanupError::session(err.to_string())),
            _ => None,
        }
    }

    /// Run one remote call under the lane's backoff
    ///
    /// Each attempt waits on the rate gate for `entity_id` (if any), calls
    /// the session, then sleeps the pacing delay.
    async fn guarded<T, F, Fut>(
        &self,
        kind: OperationKind,
        entity_id: Option<i64>,
        call: F,
    ) -> BackoffOutcome<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = TransportResult<T>>,
    {
        let lane = self.ctx.lanes().lane(kind);
        self.ctx
            .backoff()
            .run(lane, |_| {
                let pending = call();
                async move {
                    if let Some(id) = entity_id {
                        self.ctx.gate().wait(id).await;
                    }
                    let result = pending.await;
                    self.pace().await;
                    result
                }
            })
            .await
    }

    async fn pace(&self) {
        let delay = self.ctx.pacing_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
