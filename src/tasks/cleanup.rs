//! Expiry Sweep Task
//!
//! Background task that periodically removes expired keys the lazy path has
//! not touched yet.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::Store;

/// Spawns a background task that periodically sweeps expired keys.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. Each sweep follows the store's two-phase discipline
/// (collect under the shared lock, re-check and delete under the exclusive
/// lock), so keys refreshed mid-sweep survive.
///
/// # Arguments
/// * `store` - shared store to sweep
/// * `cleanup_interval_secs` - seconds between sweeps, at least 1
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let store = Arc::new(Store::new());
/// let cleanup_handle = spawn_cleanup_task(store.clone(), 60);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(store: Arc<Store>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.sweep_expired().await;

            if removed > 0 {
                info!("Expiry sweep: removed {} expired keys", removed);
            } else {
                debug!("Expiry sweep: no expired keys found");
            }
        }
    })
}
