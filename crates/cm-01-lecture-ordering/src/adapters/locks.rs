//! Keyed async locks
//!
//! One `tokio::sync::Mutex` per key (section or course), created on demand.
//! Multi-key acquisition always locks in ascending key order, so two
//! cross-section moves over the same pair of sections cannot deadlock.

use crate::domain::errors::OrderingError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OwnedMutexGuard;
use tracing::trace;

/// Guards held for the duration of one engine operation.
#[must_use]
pub struct HeldLocks {
    guards: Vec<OwnedMutexGuard<()>>,
}

impl HeldLocks {
    /// Placeholder for operations that run without serialization.
    pub fn none() -> Self {
        Self {
            guards: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

/// Registry of per-key async mutexes.
pub struct KeyedLocks<K> {
    locks: Mutex<HashMap<K, Arc<tokio::sync::Mutex<()>>>>,
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> KeyedLocks<K>
where
    K: Copy + Ord + Hash + Display,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently tracked (held, awaited or not yet pruned).
    pub fn tracked(&self) -> usize {
        self.locks.lock().len()
    }

    fn handle(&self, key: K) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock();
        // Entries nobody holds or awaits are only referenced by the map.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(key).or_default().clone()
    }

    /// Lock one key, waiting at most `timeout`.
    pub async fn acquire(&self, key: K, timeout: Duration) -> Result<HeldLocks, OrderingError> {
        self.acquire_many(&[key], timeout).await
    }

    /// Lock every key in `keys` (duplicates collapsed) in ascending order.
    ///
    /// `timeout` bounds the whole acquisition. On timeout every guard taken
    /// so far is released.
    pub async fn acquire_many(
        &self,
        keys: &[K],
        timeout: Duration,
    ) -> Result<HeldLocks, OrderingError> {
        let mut ordered = keys.to_vec();
        ordered.sort();
        ordered.dedup();

        let deadline = tokio::time::Instant::now() + timeout;
        let mut guards = Vec::with_capacity(ordered.len());
        for key in ordered {
            let lock = self.handle(key);
            match tokio::time::timeout_at(deadline, lock.lock_owned()).await {
                Ok(guard) => {
                    trace!(key = %key, "[cm-01] lock acquired");
                    guards.push(guard);
                }
                Err(_) => {
                    return Err(OrderingError::LockTimeout {
                        resource: key.to_string(),
                        timeout_ms: timeout.as_millis() as u64,
                    });
                }
            }
        }
        Ok(HeldLocks { guards })
    }
}
