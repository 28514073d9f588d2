//! End-to-end cleanup scenarios
//!
//! Each test runs all four phases over a worklist and checks the resulting
//! statistics and ledger.

#[cfg(test)]
mod tests {
    use crate::common::assertions::SummaryAssertions;
    use crate::common::{MockSession, Scenario, WorklistFactory};
    use account_sweeper::{
        ActionStatus, BatchRunner, CleanupConfig, OperationKind, RelationshipEntity, RunContext,
        ScriptedSession, SessionCall, SubAction, TransportError, Worklist,
    };
    use std::sync::Arc;

    // ==================== Happy Path ====================

    /// Every entity and contact is processed exactly once
    #[tokio::test(start_paused = true)]
    async fn test_full_success_run() {
        let worklist =
            WorklistFactory::mixed(5, 2, 3, 0).with_contacts(WorklistFactory::contacts(10));
        let scenario = Scenario::new(ScriptedSession::new());

        let summary = scenario.run(&worklist).await;

        assert!(summary.success);
        assert!(!summary.failed);
        summary.assert_counts([5, 2, 3, 10, 0, 0, 0]);
        assert_eq!(summary.recorded(), 10);
        summary.assert_status_count(ActionStatus::Success, 10);
        assert_eq!(summary.degraded, 0);
        assert_eq!(scenario.session.removed_contacts().len(), 10);
        // Contacts came with the worklist
        assert_eq!(scenario.session.count(SessionCall::ListContacts), 0);
        assert_eq!(scenario.report_files().len(), 2);
    }

    /// Leave records precede erase records in the ledger
    #[tokio::test(start_paused = true)]
    async fn test_ledger_follows_phase_order() {
        let worklist = WorklistFactory::mixed(2, 1, 2, 1);
        let scenario = Scenario::new(ScriptedSession::new());

        let summary = scenario.run(&worklist).await;
        let kinds: Vec<OperationKind> = summary
            .report
            .unwrap()
            .actions
            .iter()
            .map(|r| r.kind)
            .collect();

        assert_eq!(kinds.len(), 6);
        assert!(kinds[..3].iter().all(|k| *k == OperationKind::Leave));
        assert!(kinds[3..].iter().all(|k| *k == OperationKind::EraseHistory));
    }

    // ==================== Per-item Failures ====================

    /// A channel refusing the leave is failed without a retry
    #[tokio::test(start_paused = true)]
    async fn test_permission_denied_on_channel() {
        let worklist = WorklistFactory::mixed(1, 2, 0, 0);
        let session = ScriptedSession::new().fail(
            SessionCall::Leave,
            Some(-1001),
            TransportError::AdminRequired,
        );
        let scenario = Scenario::new(session);

        let summary = scenario.run(&worklist).await;

        assert!(summary.success);
        summary.assert_counts([1, 1, 0, 0, 0, 1, 0]);
        let report = summary.report.unwrap();
        let refused = report.actions.iter().find(|r| r.chat_id == -1001).unwrap();
        assert_eq!(refused.status, ActionStatus::Failed);
        assert_eq!(
            refused.error.as_deref(),
            Some("Permission error: CHAT_ADMIN_REQUIRED")
        );
        assert_eq!(scenario.session.calls_for(-1001).len(), 1);
    }

    /// A refused revoke falls back to deleting this side only
    #[tokio::test(start_paused = true)]
    async fn test_partial_history_deletion() {
        let worklist = WorklistFactory::mixed(0, 0, 2, 0);
        let session = ScriptedSession::new().fail(
            SessionCall::DeleteHistory { revoke: true },
            Some(2),
            TransportError::DeleteForbidden,
        );
        let scenario = Scenario::new(session);

        let summary = scenario.run(&worklist).await;

        assert!(summary.success);
        summary.assert_counts([0, 0, 2, 0, 0, 0, 0]);
        assert_eq!(summary.degraded, 1);
        summary.assert_status_count(ActionStatus::Partial, 1);

        let report = summary.report.unwrap();
        let partial = report.actions.iter().find(|r| r.chat_id == 2).unwrap();
        assert_eq!(partial.actions_done, vec![SubAction::HistoryDeleted]);
        assert_eq!(
            partial.error.as_deref(),
            Some("Partial: only self messages deleted")
        );
    }

    /// Revoke disabled in config erases this side only, as a full success
    #[tokio::test(start_paused = true)]
    async fn test_revoke_disabled() {
        let worklist = WorklistFactory::mixed(0, 0, 1, 1);
        let config = CleanupConfig {
            revoke_by_default: false,
            ..CleanupConfig::without_delays()
        };
        let scenario = Scenario::with_config(ScriptedSession::new(), config);

        let summary = scenario.run(&worklist).await;

        summary.assert_status_count(ActionStatus::Success, 2);
        assert_eq!(
            scenario.session.count(SessionCall::DeleteHistory { revoke: false }),
            2
        );
        assert_eq!(
            scenario.session.count(SessionCall::DeleteHistory { revoke: true }),
            0
        );
    }

    /// Entities that disappeared are skipped, not failed
    #[tokio::test(start_paused = true)]
    async fn test_invalid_peer_is_skipped() {
        let worklist = WorklistFactory::mixed(0, 0, 2, 0);
        let session = ScriptedSession::new().fail(
            SessionCall::DeleteHistory { revoke: true },
            Some(1),
            TransportError::UserDeactivated,
        );
        let scenario = Scenario::new(session);

        let summary = scenario.run(&worklist).await;

        summary.assert_counts([0, 0, 1, 0, 0, 0, 1]);
        summary.assert_status_count(ActionStatus::Skipped, 1);
    }

    /// A failed contact batch counts one error; the other batches proceed
    #[tokio::test(start_paused = true)]
    async fn test_failed_contact_batch() {
        let worklist = Worklist::default().with_contacts(WorklistFactory::contacts(4));
        let config = CleanupConfig {
            contact_batch_size: 2,
            delete_contacts_concurrency: 1,
            ..CleanupConfig::without_delays()
        };
        let session = ScriptedSession::new().fail(
            SessionCall::DeleteContacts,
            None,
            TransportError::rpc(400, "CONTACT_ID_INVALID"),
        );
        let scenario = Scenario::with_config(session, config);

        let summary = scenario.run(&worklist).await;

        assert!(summary.success);
        assert_eq!(summary.statistics.errors, 1);
        assert_eq!(summary.statistics.contacts_deleted, 2);
        assert_eq!(scenario.session.count(SessionCall::DeleteContacts), 2);
        assert_eq!(summary.recorded(), 0);
    }

    // ==================== Archive Remainder ====================

    /// Dialogs that survived earlier phases are archived, failures ignored
    #[tokio::test(start_paused = true)]
    async fn test_archive_remaining_dialogs() {
        let worklist = WorklistFactory::mixed(2, 0, 1, 0);
        let mut dialogs = worklist.entities.clone();
        dialogs.push(RelationshipEntity::direct(77, "Not in worklist"));
        dialogs.push(RelationshipEntity::direct(78, "Archive refuses"));
        let session = ScriptedSession::new()
            .with_dialogs(dialogs)
            .fail(SessionCall::Leave, Some(-2), TransportError::AdminRequired)
            .fail(SessionCall::Archive, Some(78), TransportError::ChannelPrivate);
        let scenario = Scenario::new(session);

        let summary = scenario.run(&worklist).await;

        let mut archived = scenario.session.archived();
        archived.sort();
        // -2 could not be left; 1 had its history erased but still exists
        assert_eq!(archived, vec![-2, 1, 77]);
        assert_eq!(summary.statistics.dialogs_closed, 3);
        assert_eq!(summary.statistics.errors, 1);
        assert_eq!(scenario.session.count(SessionCall::ListDialogs), 1);
    }

    // ==================== Dry Run ====================

    /// A dry run never calls the session and writes nothing
    #[tokio::test]
    async fn test_dry_run_with_untouchable_session() {
        let worklist =
            WorklistFactory::mixed(3, 1, 2, 2).with_contacts(WorklistFactory::contacts(4));
        let dir = tempfile::tempdir().unwrap();
        let config = CleanupConfig {
            report_directory: dir.path().display().to_string(),
            ..CleanupConfig::default()
        };
        let ctx = Arc::new(RunContext::new("dry", config));
        let runner = BatchRunner::new(ctx, Arc::new(MockSession::new()));

        let summary = runner.run(&worklist, true).await;

        assert!(summary.success);
        assert!(summary.dry_run);
        let plan = summary.plan.unwrap();
        assert_eq!(plan.leave_total, 4);
        assert_eq!(plan.erase_total, 4);
        assert_eq!(plan.contacts, Some(4));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
