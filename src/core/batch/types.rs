//! Batch run types

use crate::core::models::{EntityCategory, OperationKind, RunStatistics, Worklist};
use crate::core::report::RunReport;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// The phases of a run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Leave groups and channels
    Leave,
    /// Erase history with direct chats and bots
    EraseHistory,
    /// Remove contacts in batches
    RemoveContacts,
    /// Archive every dialog that survived the earlier phases
    ArchiveRemainder,
}

impl Phase {
    pub const ORDER: [Phase; 4] = [
        Phase::Leave,
        Phase::EraseHistory,
        Phase::RemoveContacts,
        Phase::ArchiveRemainder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Leave => "leave",
            Self::EraseHistory => "erase_history",
            Self::RemoveContacts => "remove_contacts",
            Self::ArchiveRemainder => "archive_remainder",
        }
    }

    /// Operation kind (and lane) the phase runs on
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Leave => OperationKind::Leave,
            Self::EraseHistory => OperationKind::EraseHistory,
            Self::RemoveContacts => OperationKind::RemoveContact,
            Self::ArchiveRemainder => OperationKind::Archive,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a run would touch, computed without any remote call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DryRunPlan {
    pub groups: usize,
    pub channels: usize,
    pub direct: usize,
    pub bots: usize,
    pub leave_total: usize,
    pub erase_total: usize,
    /// Known only when the worklist carries the contact list
    pub contacts: Option<usize>,
}

impl DryRunPlan {
    pub fn from_worklist(worklist: &Worklist) -> Self {
        let groups = worklist.count(EntityCategory::Group);
        let channels = worklist.count(EntityCategory::Channel);
        let direct = worklist.count(EntityCategory::Direct);
        let bots = worklist.count(EntityCategory::Bot);
        Self {
            groups,
            channels,
            direct,
            bots,
            leave_total: groups + channels,
            erase_total: direct + bots,
            contacts: worklist.contacts.as_ref().map(Vec::len),
        }
    }
}

/// Outcome of [`super::BatchRunner::run`]
#[derive(Debug, Clone)]
pub struct CleanupSummary {
    /// Every phase ran to completion without a fatal fault
    pub success: bool,
    /// A fault outside per-item handling aborted the run
    pub failed: bool,
    /// The run was cancelled by the caller
    pub cancelled: bool,
    pub dry_run: bool,
    /// Message of the fault that aborted the run
    pub error: Option<String>,
    pub elapsed: Duration,
    pub statistics: RunStatistics,
    /// Records that completed only partially
    pub degraded: u64,
    /// Skipped records the run never dispatched because it was cancelled
    pub undispatched: u64,
    /// The finalized report; `None` for dry runs
    pub report: Option<RunReport>,
    pub json_path: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
    /// Counts of a dry run
    pub plan: Option<DryRunPlan>,
}

impl CleanupSummary {
    pub(crate) fn dry_run(plan: DryRunPlan, elapsed: Duration) -> Self {
        Self {
            success: true,
            failed: false,
            cancelled: false,
            dry_run: true,
            error: None,
            elapsed,
            statistics: RunStatistics::default(),
            degraded: 0,
            undispatched: 0,
            report: None,
            json_path: None,
            csv_path: None,
            plan: Some(plan),
        }
    }

    /// Number of action records in the report
    pub fn recorded(&self) -> usize {
        self.report.as_ref().map_or(0, |r| r.actions.len())
    }
}
