//! Store Module
//!
//! The single stateful component: one keyspace behind one coarse
//! read/write lock, shared by every command in flight.

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::cache::{current_timestamp_ms, Keyspace, QueueWaiters};

// == Store ==
/// Process-wide key-value store.
///
/// Not a singleton: construct one per server (or per test) and inject it.
#[derive(Debug, Default)]
pub struct Store {
    /// Key-value storage, one lock for the whole mapping
    keyspace: RwLock<Keyspace>,
    /// Wake-up registry for blocking pops
    waiters: QueueWaiters,
}

impl Store {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Lock Access ==
    /// Acquires shared access to the keyspace.
    pub async fn read(&self) -> RwLockReadGuard<'_, Keyspace> {
        self.keyspace.read().await
    }

    /// Acquires exclusive access to the keyspace.
    pub async fn write(&self) -> RwLockWriteGuard<'_, Keyspace> {
        self.keyspace.write().await
    }

    pub fn waiters(&self) -> &QueueWaiters {
        &self.waiters
    }

    // == Length ==
    /// Number of keys currently held, expired-but-unswept ones included.
    pub async fn len(&self) -> usize {
        self.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.read().await.is_empty()
    }

    // == Sweep Expired ==
    /// Removes every expired key.
    ///
    /// Candidates are collected under the shared lock, then each is deleted
    /// under the exclusive lock only if it is still expired, so a key
    /// refreshed in between survives.
    ///
    /// Returns the number of keys removed.
    pub async fn sweep_expired(&self) -> usize {
        let candidates = self.read().await.expired_keys(current_timestamp_ms());
        if candidates.is_empty() {
            return 0;
        }

        let collected = candidates.len();
        let removed = self
            .write()
            .await
            .remove_expired_keys(candidates, current_timestamp_ms());

        if removed < collected {
            debug!(
                skipped = collected - removed,
                "Sweep kept keys refreshed since collection"
            );
        }
        removed
    }
}
