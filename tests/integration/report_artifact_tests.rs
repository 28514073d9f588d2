//! Report artifacts written at the end of a run

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::common::Scenario;
    use account_sweeper::{
        BatchRunner, CleanupConfig, RelationshipEntity, ReportWriter, RunContext,
        ScriptedSession, SessionCall, TransportError, Worklist,
    };
    use std::sync::Arc;

    fn tricky_worklist() -> Worklist {
        Worklist::new(vec![
            RelationshipEntity::group(-10, "Smith, Jones & \"Partners\""),
            RelationshipEntity::channel(-11, "Plain"),
            RelationshipEntity::direct(12, "Line\nbreak"),
        ])
    }

    /// Both files describe the same ledger
    #[tokio::test(start_paused = true)]
    async fn test_csv_and_json_agree() {
        let session = ScriptedSession::new().fail(
            SessionCall::Leave,
            Some(-11),
            TransportError::BannedInChannel,
        );
        let scenario = Scenario::new(session);

        let summary = scenario.run(&tricky_worklist()).await;

        let json_path = summary.json_path.clone().unwrap();
        let csv_path = summary.csv_path.clone().unwrap();
        assert_eq!(
            json_path.file_name().unwrap(),
            "cleanup_test_account_20240102_030405.json"
        );
        assert_eq!(
            csv_path.file_name().unwrap(),
            "cleanup_test_account_20240102_030405.csv"
        );

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json["account_name"], "test_account");
        assert_eq!(json["timestamp"], "20240102_030405");
        assert_eq!(json["statistics"]["groups_left"], 1);
        assert_eq!(json["statistics"]["errors"], 1);
        let actions = json["actions"].as_array().unwrap();
        assert_eq!(actions.len(), 3);
        let banned = actions.iter().find(|a| a["chat_id"] == -11).unwrap();
        assert_eq!(banned["status"], "failed");
        assert_eq!(banned["error"], "Permission error: USER_BANNED_IN_CHANNEL");
        assert_eq!(actions[2]["actions_done"][1], "revoked");

        let csv = std::fs::read_to_string(&csv_path).unwrap();
        assert!(csv.starts_with("chat_id,title,chat_type,actions_done,status,error,timestamp\r\n"));
        assert!(csv.contains("-10,\"Smith, Jones & \"\"Partners\"\"\",group,left,success,,"));
        assert!(csv.contains("\"Line\nbreak\",direct,\"history_deleted, revoked\",success"));
        // Header plus one row per record
        assert_eq!(csv.matches("\r\n").count(), 4);
    }

    /// Elapsed time is rounded to two decimals in JSON
    #[tokio::test]
    async fn test_json_elapsed_is_rounded() {
        let scenario = Scenario::new(ScriptedSession::new());
        let summary = scenario.run(&Worklist::default()).await;

        let json: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(summary.json_path.unwrap()).unwrap(),
        )
        .unwrap();
        let elapsed = json["elapsed_time_seconds"].as_f64().unwrap();
        assert_approx_eq!(elapsed * 100.0, (elapsed * 100.0).round());
        assert!(json["actions"].as_array().unwrap().is_empty());
    }

    /// Account names cannot escape the report directory
    #[tokio::test]
    async fn test_account_name_is_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Arc::new(RunContext::with_timestamp(
            "../team/a",
            CleanupConfig::without_delays(),
            "20240102_030405",
        ));
        let runner = BatchRunner::new(ctx, Arc::new(ScriptedSession::new()))
            .with_writer(ReportWriter::new(dir.path()));

        let summary = runner.run(&Worklist::default(), false).await;

        let json_path = summary.json_path.unwrap();
        assert_eq!(json_path.parent().unwrap(), dir.path());
        assert_eq!(
            json_path.file_name().unwrap(),
            "cleanup_.._team_a_20240102_030405.json"
        );
    }

    /// Missing report directories are created
    #[tokio::test]
    async fn test_nested_report_directory_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports").join("2024");
        let ctx = Arc::new(RunContext::new("acct", CleanupConfig::without_delays()));
        let runner = BatchRunner::new(ctx, Arc::new(ScriptedSession::new()))
            .with_writer(ReportWriter::new(&nested));

        let summary = runner.run(&Worklist::default(), false).await;

        assert!(summary.csv_path.unwrap().starts_with(&nested));
        assert_eq!(std::fs::read_dir(&nested).unwrap().count(), 2);
    }
}
