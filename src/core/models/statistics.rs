//! Run-wide counters

use serde::{Deserialize, Serialize};

/// Name of one run counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    GroupsLeft,
    ChannelsLeft,
    HistoriesDeleted,
    ContactsDeleted,
    DialogsClosed,
    Errors,
    Skipped,
}

impl Counter {
    pub const ALL: [Counter; 7] = [
        Counter::GroupsLeft,
        Counter::ChannelsLeft,
        Counter::HistoriesDeleted,
        Counter::ContactsDeleted,
        Counter::DialogsClosed,
        Counter::Errors,
        Counter::Skipped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GroupsLeft => "groups_left",
            Self::ChannelsLeft => "channels_left",
            Self::HistoriesDeleted => "histories_deleted",
            Self::ContactsDeleted => "contacts_deleted",
            Self::DialogsClosed => "dialogs_closed",
            Self::Errors => "errors",
            Self::Skipped => "skipped",
        }
    }
}

/// Monotonic counters of a run
///
/// Field order is the serialized order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub groups_left: u64,
    pub channels_left: u64,
    pub histories_deleted: u64,
    pub contacts_deleted: u64,
    pub dialogs_closed: u64,
    pub errors: u64,
    pub skipped: u64,
}

impl RunStatistics {
    pub fn get(&self, counter: Counter) -> u64 {
        match counter {
            Counter::GroupsLeft => self.groups_left,
            Counter::ChannelsLeft => self.channels_left,
            Counter::HistoriesDeleted => self.histories_deleted,
            Counter::ContactsDeleted => self.contacts_deleted,
            Counter::DialogsClosed => self.dialogs_closed,
            Counter::Errors => self.errors,
            Counter::Skipped => self.skipped,
        }
    }

    pub fn add(&mut self, counter: Counter, amount: u64) {
        let slot = match counter {
            Counter::GroupsLeft => &mut self.groups_left,
            Counter::ChannelsLeft => &mut self.channels_left,
            Counter::HistoriesDeleted => &mut self.histories_deleted,
            Counter::ContactsDeleted => &mut self.contacts_deleted,
            Counter::DialogsClosed => &mut self.dialogs_closed,
            Counter::Errors => &mut self.errors,
            Counter::Skipped => &mut self.skipped,
        };
        *slot = slot.saturating_add(amount);
    }

    pub fn increment(&mut self, counter: Counter) {
        self.add(counter, 1);
    }

    /// `(name, value)` pairs in serialized order
    pub fn entries(&self) -> Vec<(&'static str, u64)> {
        Counter::ALL
            .iter()
            .map(|c| (c.as_str(), self.get(*c)))
            .collect()
    }
}
