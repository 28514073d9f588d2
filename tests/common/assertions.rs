//! Custom test assertions
//!
//! Provides domain-specific assertions for run summaries.

use account_sweeper::{ActionStatus, CleanupSummary};

/// Assertions for CleanupSummary
pub trait SummaryAssertions {
    /// Assert the counters in serialized order
    fn assert_counts(&self, expected: [u64; 7]);

    /// Assert the ledger holds `count` records with `status`
    fn assert_status_count(&self, status: ActionStatus, count: usize);
}

impl SummaryAssertions for CleanupSummary {
    fn assert_counts(&self, expected: [u64; 7]) {
        let actual: Vec<u64> = self
            .statistics
            .entries()
            .into_iter()
            .map(|(_, value)| value)
            .collect();
        assert_eq!(
            actual,
            expected.to_vec(),
            "statistics mismatch: {:?}",
            self.statistics
        );
    }

    fn assert_status_count(&self, status: ActionStatus, count: usize) {
        let report = self.report.as_ref().expect("summary without report");
        let actual = report.actions.iter().filter(|r| r.status == status).count();
        assert_eq!(
            actual, count,
            "expected {} records with status {}, found {}",
            count, status, actual
        );
    }
}

/// Assert two values are approximately equal (for floats)
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr) => {
        assert_approx_eq!($left, $right, 1e-6_f64)
    };
    ($left:expr, $right:expr, $epsilon:expr) => {
        let left_val: f64 = $left as f64;
        let right_val: f64 = $right as f64;
        let diff = (left_val - right_val).abs();
        assert!(
            diff < $epsilon,
            "assertion failed: `(left ~ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}`",
            left_val,
            right_val,
            diff
        );
    };
}
