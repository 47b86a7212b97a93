//! Shared handle that runs key-value backend calls on the blocking pool.

use crate::domain::errors::StoreError;
use crate::ports::outbound::KeyValueStore;
use parking_lot::Mutex;
use std::sync::Arc;

/// Synchronous `KeyValueStore` behind an `Arc<Mutex<_>>`.
///
/// Every call runs inside `tokio::task::spawn_blocking`, so file I/O never
/// parks an async worker and the awaiting future stays cancellable. A call
/// whose caller stops waiting still runs to completion on the pool.
pub(crate) struct BlockingKv<KV: KeyValueStore> {
    inner: Arc<Mutex<KV>>,
}

impl<KV: KeyValueStore> BlockingKv<KV> {
    pub(crate) fn new(kv: KV) -> Self {
        Self {
            inner: Arc::new(Mutex::new(kv)),
        }
    }

    /// Run `f` with exclusive access to the backend.
    pub(crate) async fn run<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut KV) -> Result<T, StoreError> + Send + 'static,
    {
        let kv = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut guard = kv.lock();
            f(&mut guard)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("key-value task failed: {e}")))?
    }
}
