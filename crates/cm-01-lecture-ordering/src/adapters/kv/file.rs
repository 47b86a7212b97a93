use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanResult};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File-backed key-value backend.
///
/// The whole map is held in memory and rewritten to disk after every
/// mutation (temp file, fsync, rename). A batch is committed to memory only
/// after the file write succeeds, so a failed batch leaves both copies
/// unchanged.
///
/// On-disk format: `[key_len:u32][key][value_len:u32][value]...`, little
/// endian.
pub struct FileBackedKVStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    path: PathBuf,
}

impl FileBackedKVStore {
    /// Open the store at `path`, loading any existing records.
    ///
    /// A missing file is an empty store. A truncated file is rejected.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let data = Self::load_from_file(&path)?;
            info!(
                "[cm-01] 💾 Loaded {} records from {}",
                data.len(),
                path.display()
            );
            data
        } else {
            info!("[cm-01] 📁 No existing data file at {}", path.display());
            BTreeMap::new()
        };
        Ok(Self { data, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn load_from_file(path: &Path) -> Result<BTreeMap<Vec<u8>, Vec<u8>>, KVStoreError> {
        let mut bytes = Vec::new();
        std::fs::File::open(path)
            .and_then(|mut file| file.read_to_end(&mut bytes))
            .map_err(io_error)?;

        let mut data = BTreeMap::new();
        let mut cursor = 0;
        while cursor < bytes.len() {
            let key = read_chunk(&bytes, &mut cursor, path)?;
            let value = read_chunk(&bytes, &mut cursor, path)?;
            data.insert(key, value);
        }
        Ok(data)
    }

    fn save_to_file(&self, data: &BTreeMap<Vec<u8>, Vec<u8>>) -> Result<(), KVStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let mut bytes = Vec::new();
        for (key, value) in data {
            bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
            bytes.extend_from_slice(key);
            bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
            bytes.extend_from_slice(value);
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;
        std::fs::rename(&temp_path, &self.path).map_err(io_error)?;

        debug!(records = data.len(), bytes = bytes.len(), "[cm-01] data file flushed");
        Ok(())
    }

    fn commit(&mut self, next: BTreeMap<Vec<u8>, Vec<u8>>) -> Result<(), KVStoreError> {
        self.save_to_file(&next)?;
        self.data = next;
        Ok(())
    }
}

fn read_chunk(bytes: &[u8], cursor: &mut usize, path: &Path) -> Result<Vec<u8>, KVStoreError> {
    let corrupt = || KVStoreError::Corrupt {
        key: path.display().to_string(),
    };
    let len_end = cursor.checked_add(4).filter(|end| *end <= bytes.len()).ok_or_else(corrupt)?;
    let len_bytes: [u8; 4] = bytes[*cursor..len_end].try_into().map_err(|_| corrupt())?;
    let len = u32::from_le_bytes(len_bytes) as usize;

    let end = len_end.checked_add(len).filter(|end| *end <= bytes.len()).ok_or_else(corrupt)?;
    let chunk = bytes[len_end..end].to_vec();
    *cursor = end;
    Ok(chunk)
}

fn io_error(err: std::io::Error) -> KVStoreError {
    KVStoreError::IOError {
        message: err.to_string(),
    }
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        let mut next = self.data.clone();
        next.insert(key.to_vec(), value.to_vec());
        self.commit(next)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        if !self.data.contains_key(key) {
            return Ok(());
        }
        let mut next = self.data.clone();
        next.remove(key);
        self.commit(next)
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        if operations.is_empty() {
            return Ok(());
        }
        let mut next = self.data.clone();
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    next.insert(key, value);
                }
                BatchOperation::Delete { key } => {
                    next.remove(&key);
                }
            }
        }
        self.commit(next)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        Ok(self
            .data
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
