//! Move journal over a key-value backend
//!
//! Records live under `journal:` + journal id (16 bytes), bincode-encoded.

use super::blocking::BlockingKv;
use super::memory::InMemoryKVStore;
use crate::domain::entities::JournalRecord;
use crate::domain::errors::StoreError;
use crate::domain::value_objects::JournalId;
use crate::ports::outbound::{KeyValueStore, MoveJournal};
use async_trait::async_trait;

const JOURNAL_PREFIX: &[u8] = b"journal:";

fn journal_key(id: JournalId) -> Vec<u8> {
    let mut key = JOURNAL_PREFIX.to_vec();
    key.extend_from_slice(id.0.as_bytes());
    key
}

/// `MoveJournal` adapter persisting records through a `KeyValueStore`.
pub struct KvMoveJournal<KV: KeyValueStore> {
    kv: BlockingKv<KV>,
}

impl KvMoveJournal<InMemoryKVStore> {
    /// Journal that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(InMemoryKVStore::new())
    }
}

impl<KV: KeyValueStore> KvMoveJournal<KV> {
    pub fn new(kv: KV) -> Self {
        Self {
            kv: BlockingKv::new(kv),
        }
    }

    async fn update<F>(&self, id: JournalId, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut JournalRecord) + Send + 'static,
    {
        self.kv
            .run(move |kv| {
                let key = journal_key(id);
                let Some(bytes) = kv.get(&key)? else {
                    return Err(StoreError::Backend(format!("journal record {id} not found")));
                };
                let mut record: JournalRecord = bincode::deserialize(&bytes)?;
                change(&mut record);
                kv.put(&key, &bincode::serialize(&record)?)?;
                Ok(())
            })
            .await
    }
}

#[async_trait]
impl<KV: KeyValueStore> MoveJournal for KvMoveJournal<KV> {
    async fn open(&self, record: &JournalRecord) -> Result<(), StoreError> {
        let key = journal_key(record.id);
        let bytes = bincode::serialize(record)?;
        self.kv
            .run(move |kv| {
                kv.put(&key, &bytes)?;
                Ok(())
            })
            .await
    }

    async fn mark_applied(&self, id: JournalId, applied: usize) -> Result<(), StoreError> {
        self.update(id, move |record| record.applied = applied).await
    }

    async fn mark_failed(&self, id: JournalId, failure: &str) -> Result<(), StoreError> {
        let failure = failure.to_string();
        self.update(id, move |record| record.failure = Some(failure)).await
    }

    async fn close(&self, id: JournalId) -> Result<(), StoreError> {
        self.kv
            .run(move |kv| {
                kv.delete(&journal_key(id))?;
                Ok(())
            })
            .await
    }

    async fn get(&self, id: JournalId) -> Result<Option<JournalRecord>, StoreError> {
        self.kv
            .run(move |kv| {
                kv.get(&journal_key(id))?
                    .map(|bytes| bincode::deserialize(&bytes).map_err(StoreError::from))
                    .transpose()
            })
            .await
    }

    async fn pending(&self) -> Result<Vec<JournalRecord>, StoreError> {
        self.kv
            .run(|kv| {
                kv.prefix_scan(JOURNAL_PREFIX)?
                    .iter()
                    .map(|(_, value)| bincode::deserialize(value).map_err(StoreError::from))
                    .collect()
            })
            .await
    }
}
