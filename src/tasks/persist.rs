//! Cache Persist Task
//!
//! Background task that periodically sweeps expired entries and writes the
//! cache snapshot to disk.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::cache::SharedCache;

/// Spawns a background task that persists `cache` every `interval_secs`.
///
/// Each run first removes expired entries, then writes the snapshot. A failed
/// write is logged and retried on the next tick.
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown before
/// the final persist.
///
/// # Example
/// ```ignore
/// let cache = SharedCache::new("cache.json");
/// let persist_handle = spawn_persist_task(cache.clone(), 60);
/// // Later, during shutdown:
/// persist_handle.abort();
/// cache.persist().await?;
/// ```
pub fn spawn_persist_task(cache: SharedCache, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache persist task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired().await;
            if removed > 0 {
                debug!("Sweep removed {} expired entries", removed);
            }

            match cache.persist().await {
                Ok(bytes) => debug!("Periodic persist wrote {} bytes", bytes),
                Err(err) => error!("Periodic persist failed: {}", err),
            }
        }
    })
}
