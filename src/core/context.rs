//! Per-run shared state
//!
//! Everything a run mutates across tasks lives here: the report aggregator,
//! the rate gate and the lanes. The caller creates one context per run and
//! drops it after the report is finalized.

use crate::config::CleanupConfig;
use crate::core::lanes::LaneSet;
use crate::core::rate_gate::RateGate;
use crate::core::report::ReportAggregator;
use crate::core::throttle::{ThrottleBackoff, random_up_to};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Format of the run timestamp used in report names
pub const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug)]
pub struct RunContext {
    config: CleanupConfig,
    report: Arc<ReportAggregator>,
    gate: RateGate,
    lanes: LaneSet,
    backoff: ThrottleBackoff,
    cancel: CancellationToken,
    started_at: Instant,
}

impl RunContext {
    pub fn new(account_name: impl Into<String>, config: CleanupConfig) -> Self {
        let timestamp = chrono::Local::now()
            .format(RUN_TIMESTAMP_FORMAT)
            .to_string();
        Self::with_timestamp(account_name, config, timestamp)
    }

    /// Context with a fixed run timestamp
    pub fn with_timestamp(
        account_name: impl Into<String>,
        config: CleanupConfig,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            report: Arc::new(ReportAggregator::new(account_name, timestamp)),
            gate: RateGate::new(config.min_peer_interval()),
            lanes: LaneSet::from_config(&config),
            backoff: ThrottleBackoff::new(config.throttle_jitter()),
            cancel: CancellationToken::new(),
            started_at: Instant::now(),
            config,
        }
    }

    pub fn config(&self) -> &CleanupConfig {
        &self.config
    }

    pub fn account_name(&self) -> &str {
        self.report.account_name()
    }

    pub fn report(&self) -> &Arc<ReportAggregator> {
        &self.report
    }

    pub fn gate(&self) -> &RateGate {
        &self.gate
    }

    pub fn lanes(&self) -> &LaneSet {
        &self.lanes
    }

    pub fn backoff(&self) -> &ThrottleBackoff {
        &self.backoff
    }

    /// Token that stops dispatching new operations when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Post-call pacing: the fixed delay plus jitter
    pub fn pacing_delay(&self) -> Duration {
        self.config.action_sleep() + random_up_to(self.config.action_jitter())
    }
}
