//! Core rate gate implementation

use crate::utils::instant_after;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Minimum-interval gate keyed by entity id
///
/// The release time of a caller is reserved atomically under the map lock:
/// `max(now, last_release + min_interval)`. The lock is never held across
/// the sleep, so callers for different ids never wait on each other while
/// callers for the same id are spaced by at least `min_interval`.
#[derive(Debug)]
pub struct RateGate {
    min_interval: Duration,
    last_release: Mutex<HashMap<i64, Instant>>,
}

impl RateGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_release: Mutex::new(HashMap::new()),
        }
    }

    /// Wait until `entity_id` may be operated on again, then record the release
    pub async fn wait(&self, entity_id: i64) {
        let release_at = self.reserve(entity_id);
        if release_at > Instant::now() {
            debug!(
                "Rate gate holding entity {} for {:?}",
                entity_id,
                release_at - Instant::now()
            );
            tokio::time::sleep_until(release_at).await;
        }
    }

    /// Atomically compute and store the next release time for `entity_id`
    fn reserve(&self, entity_id: i64) -> Instant {
        let now = Instant::now();
        let mut entries = self.last_release.lock();
        let release_at = match entries.get(&entity_id) {
            Some(&last) => instant_after(last, self.min_interval).max(now),
            None => now,
        };
        entries.insert(entity_id, release_at);
        release_at
    }

    /// Last reserved release of `entity_id`
    pub fn last_release(&self, entity_id: i64) -> Option<Instant> {
        self.last_release.lock().get(&entity_id).copied()
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Number of distinct ids seen
    pub fn tracked(&self) -> usize {
        self.last_release.lock().len()
    }
}
