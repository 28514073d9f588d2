//! Configuration loading from files

#[cfg(test)]
mod tests {
    use account_sweeper::{CleanupError, Config, LaneSet, OperationKind};
    use std::io::Write;
    use std::time::Duration;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    /// camelCase keys are accepted and unspecified keys keep defaults
    #[tokio::test]
    async fn test_load_camel_case_file() {
        let file = write_config(
            "leaveConcurrency: 5\nminPeerIntervalSeconds: 2.5\nrevokeByDefault: false\n",
        );

        let config = Config::from_file(file.path()).await.unwrap();
        let cleanup = config.cleanup();

        assert_eq!(cleanup.leave_concurrency, 5);
        assert_eq!(cleanup.min_peer_interval(), Duration::from_millis(2500));
        assert!(!cleanup.revoke_by_default);
        assert_eq!(cleanup.delete_history_concurrency, 2);
        assert_eq!(cleanup.report_directory, "./reports");

        let lanes = LaneSet::from_config(cleanup);
        assert_eq!(lanes.lane(OperationKind::Leave).capacity(), 5);
        assert_eq!(lanes.lane(OperationKind::Archive).capacity(), 1);
    }

    /// Invalid values are rejected with a configuration error
    #[tokio::test]
    async fn test_invalid_file_rejected() {
        let file = write_config("archive_concurrency: 0\n");
        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(matches!(err, CleanupError::Config(_)));

        let file = write_config("action_sleep_seconds: -1\n");
        assert!(Config::from_file(file.path()).await.is_err());
    }

    /// A missing file is a configuration error, not an I/O panic
    #[tokio::test]
    async fn test_missing_file() {
        let err = Config::from_file("/nonexistent/sweeper.yaml")
            .await
            .unwrap_err();
        assert!(matches!(err, CleanupError::Config(_)));
    }
}
