//! Per-entity action records

use super::entity::{EntityCategory, RelationshipEntity};
use super::operation::{OperationKind, SubAction};
use serde::{Deserialize, Serialize};

/// Terminal (or not yet terminal) state of an action record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    #[default]
    Pending,
    Success,
    Partial,
    Failed,
    Skipped,
}

impl ActionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one phase for one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRecord {
    pub chat_id: i64,
    pub title: String,
    pub chat_type: EntityCategory,
    pub actions_done: Vec<SubAction>,
    pub status: ActionStatus,
    pub error: Option<String>,
    pub timestamp: String,
    #[serde(skip)]
    pub kind: OperationKind,
}

impl ActionRecord {
    pub fn new(entity: &RelationshipEntity, kind: OperationKind) -> Self {
        Self {
            chat_id: entity.id,
            title: entity.title.clone(),
            chat_type: entity.category,
            actions_done: Vec::new(),
            status: ActionStatus::Pending,
            error: None,
            timestamp: local_timestamp(),
            kind,
        }
    }

    pub fn push(&mut self, action: SubAction) {
        self.actions_done.push(action);
    }

    pub fn succeed(&mut self) {
        self.status = ActionStatus::Success;
        self.error = None;
    }

    pub fn partial(&mut self, reason: impl Into<String>) {
        self.status = ActionStatus::Partial;
        self.error = Some(reason.into());
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.status = ActionStatus::Failed;
        self.error = Some(reason.into());
    }

    pub fn skip(&mut self, reason: impl Into<String>) {
        self.status = ActionStatus::Skipped;
        self.error = Some(reason.into());
    }

    pub fn is_finalized(&self) -> bool {
        self.status.is_terminal()
    }

    /// `actions_done` as the comma separated form used in tabular output
    pub fn joined_actions(&self) -> String {
        self.actions_done
            .iter()
            .map(SubAction::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Local wall-clock time, ISO-8601 with microseconds
pub(crate) fn local_timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
