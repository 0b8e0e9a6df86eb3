use std::sync::Arc;
use std::time::Duration;
use tokio::time;

use super::memory::MemoryStore;

/// Background task that periodically purges soft-deleted items whose undo
/// window has elapsed.
///
/// Correctness never depends on this task: an expired item already answers
/// 410 on restore. Purging only reclaims memory.
pub struct PurgeTask {
    store: Arc<MemoryStore>,
    interval: Duration,
}

impl PurgeTask {
    pub fn new(store: Arc<MemoryStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Runs indefinitely; spawn it with `tokio::spawn(task.run())`.
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Starting soft-delete purge task"
        );

        let mut interval = time::interval(self.interval);

        loop {
            interval.tick().await;
            self.run_once().await;
        }
    }

    pub async fn run_once(&self) -> usize {
        let purged = self.store.purge_expired().await;
        if purged > 0 {
            tracing::info!(purged_count = purged, "Purged expired soft-deleted items");
        } else {
            tracing::debug!("No expired soft-deleted items to purge");
        }

        let (lists, active, soft_deleted, tombstones) = self.store.counts().await;
        tracing::debug!(
            lists = lists,
            active_items = active,
            soft_deleted_items = soft_deleted,
            tombstones = tombstones,
            "Current store size"
        );
        purged
    }
}
