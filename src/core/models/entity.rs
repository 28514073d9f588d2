//! Relationship entities and the classified worklist

use crate::utils::error::{CleanupError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Category tag assigned by the enumeration collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    Group,
    Channel,
    Direct,
    Bot,
}

impl EntityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Channel => "channel",
            Self::Direct => "direct",
            Self::Bot => "bot",
        }
    }

    /// Groups and channels are left; direct and bot chats are erased
    pub fn is_membership(&self) -> bool {
        matches!(self, Self::Group | Self::Channel)
    }
}

impl std::fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote group, channel, direct conversation or bot conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEntity {
    pub id: i64,
    pub title: String,
    pub category: EntityCategory,
}

impl RelationshipEntity {
    pub fn new(id: i64, title: impl Into<String>, category: EntityCategory) -> Self {
        Self {
            id,
            title: title.into(),
            category,
        }
    }

    pub fn group(id: i64, title: impl Into<String>) -> Self {
        Self::new(id, title, EntityCategory::Group)
    }

    pub fn channel(id: i64, title: impl Into<String>) -> Self {
        Self::new(id, title, EntityCategory::Channel)
    }

    pub fn direct(id: i64, title: impl Into<String>) -> Self {
        Self::new(id, title, EntityCategory::Direct)
    }

    pub fn bot(id: i64, title: impl Into<String>) -> Self {
        Self::new(id, title, EntityCategory::Bot)
    }
}

/// Pre-classified input of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Worklist {
    #[serde(default)]
    pub entities: Vec<RelationshipEntity>,
    /// Pre-fetched contact ids; asked from the session when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Vec<i64>>,
}

impl Worklist {
    pub fn new(entities: Vec<RelationshipEntity>) -> Self {
        Self {
            entities,
            contacts: None,
        }
    }

    pub fn with_contacts(mut self, contacts: Vec<i64>) -> Self {
        self.contacts = Some(contacts);
        self
    }

    pub fn of_category(&self, category: EntityCategory) -> impl Iterator<Item = &RelationshipEntity> {
        self.entities.iter().filter(move |e| e.category == category)
    }

    pub fn count(&self, category: EntityCategory) -> usize {
        self.of_category(category).count()
    }

    /// Groups then channels, in worklist order within each
    pub fn leave_targets(&self) -> Vec<RelationshipEntity> {
        self.of_category(EntityCategory::Group)
            .chain(self.of_category(EntityCategory::Channel))
            .cloned()
            .collect()
    }

    /// Direct chats then bots, in worklist order within each
    pub fn erase_targets(&self) -> Vec<RelationshipEntity> {
        self.of_category(EntityCategory::Direct)
            .chain(self.of_category(EntityCategory::Bot))
            .cloned()
            .collect()
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a worklist exported as JSON
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            CleanupError::Config(format!("Failed to read worklist {:?}: {}", path, e))
        })?;
        Self::from_json_str(&content)
    }
}
