//! Cancellation, fatal faults and panic isolation

#[cfg(test)]
mod tests {
    use crate::common::assertions::SummaryAssertions;
    use crate::common::{Scenario, WorklistFactory};
    use account_sweeper::{
        ActionStatus, CleanupConfig, ScriptedSession, SessionCall, TransportError,
    };
    use std::collections::HashSet;
    use std::time::Duration;

    /// Cancelling mid-phase finishes in-flight work and skips the rest
    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_leave_phase() {
        let worklist =
            WorklistFactory::mixed(6, 0, 2, 0).with_contacts(WorklistFactory::contacts(3));
        let config = CleanupConfig {
            leave_concurrency: 2,
            ..CleanupConfig::without_delays()
        };
        let session = ScriptedSession::new().with_latency(Duration::from_secs(1));
        let scenario = Scenario::with_config(session, config);

        let token = scenario.context.cancellation_token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            token.cancel();
        });

        let summary = scenario.run(&worklist).await;

        assert!(summary.cancelled);
        assert!(!summary.success);
        assert!(!summary.failed);
        // Two waves of two started before the cancel
        assert_eq!(summary.statistics.groups_left, 4);
        assert_eq!(summary.statistics.skipped, 4);
        assert_eq!(summary.recorded(), 8);
        assert_eq!(scenario.session.count(SessionCall::DeleteContacts), 0);
        assert_eq!(scenario.session.count(SessionCall::ListDialogs), 0);
        assert_eq!(scenario.report_files().len(), 2);
    }

    /// A session fault aborts the run but the report is still written
    #[tokio::test(start_paused = true)]
    async fn test_session_fault_aborts_run() {
        let worklist = WorklistFactory::mixed(1, 0, 3, 0);
        let session = ScriptedSession::new().fail(
            SessionCall::DeleteHistory { revoke: true },
            Some(2),
            TransportError::Disconnected("connection reset".to_string()),
        );
        let config = CleanupConfig {
            delete_history_concurrency: 1,
            ..CleanupConfig::without_delays()
        };
        let scenario = Scenario::with_config(session, config);

        let summary = scenario.run(&worklist).await;

        assert!(summary.failed);
        assert!(!summary.success);
        assert!(summary.error.as_deref().unwrap().contains("connection reset"));
        assert!(summary.report.as_ref().unwrap().failed);
        assert_eq!(scenario.session.count(SessionCall::ListDialogs), 0);
        assert_eq!(scenario.report_files().len(), 2);

        // Every worklist entity still has exactly one record
        let report = summary.report.unwrap();
        let ids: HashSet<i64> = report.actions.iter().map(|r| r.chat_id).collect();
        assert_eq!(ids.len(), report.actions.len());
        assert_eq!(report.actions.len(), 4);
    }

    /// A panicking call becomes one failed record; siblings are unaffected
    #[tokio::test]
    async fn test_panic_is_isolated() {
        let worklist = WorklistFactory::mixed(3, 0, 1, 0);
        let session = ScriptedSession::new().panic_on(SessionCall::Leave, Some(-2));
        let scenario = Scenario::new(session);

        let summary = scenario.run(&worklist).await;

        assert!(summary.success);
        summary.assert_counts([2, 0, 1, 0, 0, 1, 0]);
        summary.assert_status_count(ActionStatus::Failed, 1);
        let report = summary.report.unwrap();
        let aborted = report.actions.iter().find(|r| r.chat_id == -2).unwrap();
        assert_eq!(
            aborted.error.as_deref(),
            Some("Operation aborted before completion")
        );
    }
}
