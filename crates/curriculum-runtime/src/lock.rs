//! # Data Directory Lock
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on
//! Windows). The file-backed stores assume a single writer process, so the
//! runtime refuses to start while another one holds the directory.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Errors from data directory locking
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("Failed to create lock file: {0}")]
    CreateFailed(#[source] io::Error),

    #[error("Data directory already in use{} ({})", holder(.pid), .path.display())]
    AlreadyLocked { pid: Option<u32>, path: PathBuf },

    #[error("Failed to write PID to lock file: {0}")]
    WriteFailed(#[source] io::Error),
}

fn holder(pid: &Option<u32>) -> String {
    pid.map(|p| format!(" by process {p}")).unwrap_or_default()
}

/// Exclusive lock on a data directory.
///
/// Acquired on startup, released on drop (RAII).
pub struct DataDirLock {
    /// The lock file handle (kept open to maintain lock)
    file: File,
    path: PathBuf,
    pid: u32,
}

impl DataDirLock {
    const LOCK_FILE: &'static str = "LOCK";

    /// Take the lock without waiting.
    pub fn acquire(data_dir: &Path) -> Result<Self, LockError> {
        let lock_path = data_dir.join(Self::LOCK_FILE);

        // Not truncated: a failed attempt must not wipe the holder's PID.
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(LockError::CreateFailed)?;

        if FileExt::try_lock_exclusive(&file).is_err() {
            return Err(LockError::AlreadyLocked {
                pid: Self::read_existing_pid(&lock_path),
                path: lock_path,
            });
        }

        let pid = std::process::id();
        file.set_len(0).map_err(LockError::WriteFailed)?;
        writeln!(file, "{pid}").map_err(LockError::WriteFailed)?;
        file.sync_all().map_err(LockError::WriteFailed)?;

        Ok(Self {
            file,
            path: lock_path,
            pid,
        })
    }

    /// PID of the process holding the lock
    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_existing_pid(path: &Path) -> Option<u32> {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

impl Drop for DataDirLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
    }
}
