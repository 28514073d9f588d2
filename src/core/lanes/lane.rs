//! Lane implementation

use crate::config::CleanupConfig;
use crate::core::models::OperationKind;
use crate::utils::error::{CleanupError, Result};
use crate::utils::instant_after;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;
use tracing::{debug, warn};

/// A fixed-size pool of execution slots with lane-wide suspension
#[derive(Debug)]
pub struct ConcurrencyLane {
    kind: OperationKind,
    capacity: usize,
    slots: Arc<Semaphore>,
    suspended_until: Mutex<Option<Instant>>,
}

/// A held slot; released on drop
#[derive(Debug)]
pub struct LanePermit {
    kind: OperationKind,
    _permit: OwnedSemaphorePermit,
}

impl LanePermit {
    pub fn kind(&self) -> OperationKind {
        self.kind
    }
}

impl ConcurrencyLane {
    pub fn new(kind: OperationKind, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            kind,
            capacity,
            slots: Arc::new(Semaphore::new(capacity)),
            suspended_until: Mutex::new(None),
        }
    }

    /// Wait for a free slot outside of any suspension
    ///
    /// A slot obtained while a suspension started in the meantime is handed
    /// back and the wait starts over, so no acquisition completes inside a
    /// suspension window.
    pub async fn acquire(&self) -> Result<LanePermit> {
        loop {
            self.wait_resumed().await;

            let permit = self.slots.clone().acquire_owned().await.map_err(|e| {
                CleanupError::Internal(format!("Lane '{}' closed: {}", self.kind, e))
            })?;

            if !self.is_suspended() {
                debug!(
                    "Lane '{}' acquired slot ({} free)",
                    self.kind,
                    self.slots.available_permits()
                );
                return Ok(LanePermit {
                    kind: self.kind,
                    _permit: permit,
                });
            }
        }
    }

    /// Sleep until no suspension is active
    pub async fn wait_resumed(&self) {
        while let Some(until) = self.suspended_until() {
            tokio::time::sleep_until(until).await;
        }
    }

    /// Suspend new acquisitions for `duration`
    ///
    /// An active suspension is extended, never shortened.
    pub fn suspend_for(&self, duration: Duration) {
        let until = instant_after(Instant::now(), duration);
        let mut current = self.suspended_until.lock();
        let next = match *current {
            Some(existing) if existing > until => existing,
            _ => until,
        };
        *current = Some(next);
        warn!("Lane '{}' suspended for {:?}", self.kind, duration);
    }

    /// End of the active suspension, if any
    pub fn suspended_until(&self) -> Option<Instant> {
        let current = *self.suspended_until.lock();
        current.filter(|until| *until > Instant::now())
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended_until().is_some()
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots right now
    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }
}

/// The four lanes of a run
#[derive(Debug)]
pub struct LaneSet {
    leave: ConcurrencyLane,
    erase_history: ConcurrencyLane,
    remove_contact: ConcurrencyLane,
    archive: ConcurrencyLane,
}

impl LaneSet {
    pub fn from_config(config: &CleanupConfig) -> Self {
        Self {
            leave: ConcurrencyLane::new(OperationKind::Leave, config.leave_concurrency),
            erase_history: ConcurrencyLane::new(
                OperationKind::EraseHistory,
                config.delete_history_concurrency,
            ),
            remove_contact: ConcurrencyLane::new(
                OperationKind::RemoveContact,
                config.delete_contacts_concurrency,
            ),
            archive: ConcurrencyLane::new(OperationKind::Archive, config.archive_concurrency),
        }
    }

    /// Lanes with every kind's built-in default capacity
    pub fn with_defaults() -> Self {
        let lane = |kind: OperationKind| ConcurrencyLane::new(kind, kind.default_concurrency());
        Self {
            leave: lane(OperationKind::Leave),
            erase_history: lane(OperationKind::EraseHistory),
            remove_contact: lane(OperationKind::RemoveContact),
            archive: lane(OperationKind::Archive),
        }
    }

    pub fn lane(&self, kind: OperationKind) -> &ConcurrencyLane {
        match kind {
            OperationKind::Leave => &self.leave,
            OperationKind::EraseHistory => &self.erase_history,
            OperationKind::RemoveContact => &self.remove_contact,
            OperationKind::Archive => &self.archive,
        }
    }
}
