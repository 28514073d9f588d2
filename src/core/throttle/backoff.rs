//! Lane-scoped backoff with a single retry

use crate::core::lanes::ConcurrencyLane;
use crate::core::session::{FailureKind, TransportResult};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Longest lane suspension honoured for a single throttle signal
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(86_400);

/// Which attempt of an operation produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    First,
    Retried,
}

/// Result of an operation run under [`ThrottleBackoff::run`]
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffOutcome<T> {
    pub result: TransportResult<T>,
    pub attempt: Attempt,
}

impl<T> BackoffOutcome<T> {
    pub fn was_retried(&self) -> bool {
        self.attempt == Attempt::Retried
    }
}

/// Suspends a lane on throttle signals and grants one retry
#[derive(Debug, Clone)]
pub struct ThrottleBackoff {
    jitter_max: Duration,
}

impl ThrottleBackoff {
    pub fn new(jitter_max: Duration) -> Self {
        Self { jitter_max }
    }

    /// Uniform random jitter in `[0, jitter_max]`
    pub fn jitter(&self) -> Duration {
        random_up_to(self.jitter_max)
    }

    /// Suspend `lane` for `retry_after` plus jitter and wait until it resumes
    ///
    /// `retry_after` is capped at [`MAX_RETRY_AFTER`]. Returns the suspension
    /// that was requested.
    pub async fn pause(&self, lane: &ConcurrencyLane, retry_after: Duration) -> Duration {
        if retry_after > MAX_RETRY_AFTER {
            warn!(
                "Lane '{}' asked to wait {:?}, capping at {:?}",
                lane.kind(),
                retry_after,
                MAX_RETRY_AFTER
            );
        }
        let total = retry_after.min(MAX_RETRY_AFTER).saturating_add(self.jitter());
        lane.suspend_for(total);
        lane.wait_resumed().await;
        total
    }

    /// Run `op`, retrying it once if the first attempt is throttled
    ///
    /// A result from the retried attempt is returned as is; a second throttle
    /// is never retried.
    pub async fn run<T, F, Fut>(&self, lane: &ConcurrencyLane, mut op: F) -> BackoffOutcome<T>
    where
        F: FnMut(Attempt) -> Fut,
        Fut: Future<Output = TransportResult<T>>,
    {
        let first = op(Attempt::First).await;

        let retry_after = match &first {
            Err(error) => match error.classify() {
                FailureKind::Throttled { retry_after } => retry_after,
                _ => {
                    return BackoffOutcome {
                        result: first,
                        attempt: Attempt::First,
                    };
                }
            },
            Ok(_) => {
                return BackoffOutcome {
                    result: first,
                    attempt: Attempt::First,
                };
            }
        };

        warn!(
            "Throttled on lane '{}', retrying after {:?}",
            lane.kind(),
            retry_after
        );
        let paused = self.pause(lane, retry_after).await;
        debug!("Lane '{}' resumed after {:?}", lane.kind(), paused);

        BackoffOutcome {
            result: op(Attempt::Retried).await,
            attempt: Attempt::Retried,
        }
    }
}

/// Uniform random duration in `[0, max]`, millisecond resolution
pub(crate) fn random_up_to(max: Duration) -> Duration {
    let max_ms = max.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
}
