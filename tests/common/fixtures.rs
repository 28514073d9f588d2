//! Test fixtures and data factories
//!
//! Provides factory methods for creating worklists and runners with
//! sensible defaults. Runs use an in-memory session and write reports into
//! a temporary directory.

use account_sweeper::{
    BatchRunner, CleanupConfig, CleanupSummary, RelationshipEntity, ReportWriter, RunContext,
    ScriptedSession, Worklist,
};
use std::sync::Arc;
use tempfile::TempDir;

/// Account name used by every scenario
pub const ACCOUNT: &str = "test_account";

/// Factory for creating worklists
pub struct WorklistFactory;

impl WorklistFactory {
    /// Worklist with the given number of entities per category
    ///
    /// Ids are negative for groups and channels and positive for direct
    /// chats and bots, and unique across categories.
    pub fn mixed(groups: i64, channels: i64, direct: i64, bots: i64) -> Worklist {
        let mut entities = Vec::new();
        entities.extend((1..=groups).map(|i| RelationshipEntity::group(-i, format!("Group {}", i))));
        entities.extend(
            (1..=channels).map(|i| RelationshipEntity::channel(-1000 - i, format!("Channel {}", i))),
        );
        entities.extend((1..=direct).map(|i| RelationshipEntity::direct(i, format!("User {}", i))));
        entities.extend((1..=bots).map(|i| RelationshipEntity::bot(1000 + i, format!("Bot {}", i))));
        Worklist::new(entities)
    }

    /// Contact ids `1..=count`
    pub fn contacts(count: i64) -> Vec<i64> {
        (1..=count).collect()
    }
}

/// A runner bound to a scripted session and a temporary report directory
pub struct Scenario {
    pub session: Arc<ScriptedSession>,
    pub context: Arc<RunContext>,
    pub reports: TempDir,
}

impl Scenario {
    /// Scenario with every delay disabled
    pub fn new(session: ScriptedSession) -> Self {
        Self::with_config(session, CleanupConfig::without_delays())
    }

    pub fn with_config(session: ScriptedSession, config: CleanupConfig) -> Self {
        let reports = tempfile::tempdir().expect("temp dir");
        let config = CleanupConfig {
            report_directory: reports.path().display().to_string(),
            ..config
        };
        Self {
            session: Arc::new(session),
            context: Arc::new(RunContext::with_timestamp(ACCOUNT, config, "20240102_030405")),
            reports,
        }
    }

    pub fn runner(&self) -> BatchRunner {
        BatchRunner::new(self.context.clone(), self.session.clone())
            .with_writer(ReportWriter::new(self.reports.path()))
    }

    pub async fn run(&self, worklist: &Worklist) -> CleanupSummary {
        self.runner().run(worklist, false).await
    }

    /// Files written into the report directory
    pub fn report_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.reports.path())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}
