//! Drop guard that appends a record exactly once

use super::executor::ABORTED_MESSAGE;
use crate::core::models::ActionRecord;
use crate::core::report::ReportAggregator;
use std::sync::Arc;

/// Owns a record until it is committed to the ledger
///
/// Dropping an uncommitted guard (task aborted or unwinding) commits the
/// record as failed, unless it already reached a terminal state.
pub(crate) struct RecordGuard {
    record: ActionRecord,
    report: Arc<ReportAggregator>,
    committed: bool,
}

impl RecordGuard {
    pub(crate) fn new(record: ActionRecord, report: Arc<ReportAggregator>) -> Self {
        Self {
            record,
            report,
            committed: false,
        }
    }

    pub(crate) fn record_mut(&mut self) -> &mut ActionRecord {
        &mut self.record
    }

    /// Append the record and hand back a copy
    pub(crate) fn commit(mut self) -> ActionRecord {
        self.committed = true;
        let record = self.record.clone();
        self.report.record(record.clone());
        record
    }
}

impl Drop for RecordGuard {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if !self.record.is_finalized() {
            self.record.fail(ABORTED_MESSAGE);
        }
        self.report.record(self.record.clone());
    }
}
