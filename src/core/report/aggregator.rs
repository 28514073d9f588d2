//! Ledger and counters of a run

use crate::core::models::{ActionRecord, ActionStatus, Counter, RunStatistics};
use parking_lot::Mutex;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Immutable result of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub account_name: String,
    /// Run start, `yyyyMMdd_HHmmss`
    pub timestamp: String,
    pub elapsed_time_seconds: f64,
    pub statistics: RunStatistics,
    pub actions: Vec<ActionRecord>,
    /// Aborted by a fault outside per-item handling
    #[serde(skip)]
    pub failed: bool,
    /// Records that completed only partially
    #[serde(skip)]
    pub degraded: u64,
    /// Skipped records that were never dispatched because of cancellation
    #[serde(skip)]
    pub undispatched: u64,
}

#[derive(Debug, Default)]
struct Tally {
    statistics: RunStatistics,
    degraded: u64,
    undispatched: u64,
}

/// Collects action records and run counters
#[derive(Debug)]
pub struct ReportAggregator {
    account_name: String,
    timestamp: String,
    ledger: Mutex<Vec<ActionRecord>>,
    tally: Mutex<Tally>,
}

impl ReportAggregator {
    pub fn new(account_name: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            timestamp: timestamp.into(),
            ledger: Mutex::new(Vec::new()),
            tally: Mutex::new(Tally::default()),
        }
    }

    /// Append a finalized record and update the counters
    ///
    /// A record that is still pending is stored as failed.
    pub fn record(&self, mut record: ActionRecord) {
        if !record.is_finalized() {
            warn!(
                "Record for {} appended while pending, marking failed",
                record.chat_id
            );
            record.fail("Record was not finalized");
        }

        {
            let mut tally = self.tally.lock();
            match record.status {
                ActionStatus::Success => {
                    tally
                        .statistics
                        .increment(record.kind.success_counter(record.chat_type));
                }
                ActionStatus::Partial => {
                    tally
                        .statistics
                        .increment(record.kind.success_counter(record.chat_type));
                    tally.degraded += 1;
                }
                ActionStatus::Failed if record.kind.is_best_effort() => {}
                ActionStatus::Failed => tally.statistics.increment(Counter::Errors),
                ActionStatus::Skipped => tally.statistics.increment(Counter::Skipped),
                ActionStatus::Pending => {}
            }
        }

        debug!(
            "Recorded {} {} for {} ({})",
            record.kind, record.status, record.chat_id, record.title
        );
        self.ledger.lock().push(record);
    }

    /// Append a skipped record for work cancelled before dispatch
    ///
    /// It counts as `skipped` and is also tallied apart from skips of gone
    /// peers.
    pub fn record_undispatched(&self, record: ActionRecord) {
        if record.status == ActionStatus::Skipped {
            self.tally.lock().undispatched += 1;
        }
        self.record(record);
    }

    pub fn add_contacts_deleted(&self, count: u64) {
        self.tally
            .lock()
            .statistics
            .add(Counter::ContactsDeleted, count);
    }

    pub fn add_dialogs_closed(&self, count: u64) {
        self.tally.lock().statistics.add(Counter::DialogsClosed, count);
    }

    /// Count a failure that has no action record of its own
    pub fn note_error(&self) {
        self.tally.lock().statistics.increment(Counter::Errors);
    }

    pub fn statistics(&self) -> RunStatistics {
        self.tally.lock().statistics
    }

    pub fn degraded(&self) -> u64 {
        self.tally.lock().degraded
    }

    pub fn undispatched(&self) -> u64 {
        self.tally.lock().undispatched
    }

    pub fn records(&self) -> Vec<ActionRecord> {
        self.ledger.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.ledger.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.lock().is_empty()
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Snapshot everything recorded so far into a report
    pub fn finalize(&self, elapsed: Duration, failed: bool) -> RunReport {
        let (statistics, degraded, undispatched) = {
            let tally = self.tally.lock();
            (tally.statistics, tally.degraded, tally.undispatched)
        };
        RunReport {
            account_name: self.account_name.clone(),
            timestamp: self.timestamp.clone(),
            elapsed_time_seconds: elapsed.as_secs_f64(),
            statistics,
            actions: self.records(),
            failed,
            degraded,
            undispatched,
        }
    }
}
