//! Operation kinds and the sub-actions they complete

use super::entity::EntityCategory;
use super::statistics::Counter;
use serde::{Deserialize, Serialize};

/// One category of destructive lifecycle operation
///
/// Every kind runs in its own concurrency lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Leave,
    EraseHistory,
    RemoveContact,
    Archive,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Leave,
        OperationKind::EraseHistory,
        OperationKind::RemoveContact,
        OperationKind::Archive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Leave => "leave",
            Self::EraseHistory => "erase_history",
            Self::RemoveContact => "remove_contact",
            Self::Archive => "archive",
        }
    }

    /// Lane capacity used when configuration does not say otherwise
    pub fn default_concurrency(&self) -> usize {
        match self {
            Self::Leave => 3,
            Self::EraseHistory => 2,
            Self::RemoveContact => 3,
            Self::Archive => 1,
        }
    }

    /// Failures of best-effort kinds never count as run errors
    pub fn is_best_effort(&self) -> bool {
        matches!(self, Self::Archive)
    }

    /// Counter bumped when this kind completes for an entity of `category`
    pub fn success_counter(&self, category: EntityCategory) -> Counter {
        match self {
            Self::Leave if category == EntityCategory::Channel => Counter::ChannelsLeft,
            Self::Leave => Counter::GroupsLeft,
            Self::EraseHistory => Counter::HistoriesDeleted,
            Self::RemoveContact => Counter::ContactsDeleted,
            Self::Archive => Counter::DialogsClosed,
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed step recorded in an action record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubAction {
    Left,
    HistoryDeleted,
    Revoked,
    ContactRemoved,
    Archived,
}

impl SubAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::HistoryDeleted => "history_deleted",
            Self::Revoked => "revoked",
            Self::ContactRemoved => "contact_removed",
            Self::Archived => "archived",
        }
    }
}
