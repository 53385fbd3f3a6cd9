//! Cache Store Module
//!
//! Durable key-addressed storage: one `{key}.jpg` file per slot under the
//! cache directory. Every operation is a filesystem round trip.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use tracing::{debug, warn};

use crate::cache::SLOT_EXTENSION;
use crate::error::StoreError;

/// Distinguishes temp files of concurrent writes within this process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

// == File Store ==
/// File-backed cache store.
///
/// Holds no in-memory copy of any payload. The directory listing is the only
/// index.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory holding the slot files
    dir: PathBuf,
}

impl FileStore {
    // == Constructor ==
    /// Creates a store rooted at `dir`. Does not touch the filesystem.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    // == Init ==
    /// Creates the cache directory if it does not exist yet.
    pub async fn init(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Root directory of the store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // == Slot Path ==
    /// Path of the slot file for `key`.
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, SLOT_EXTENSION))
    }

    /// Unique sibling path a write for `key` is staged in before the rename.
    ///
    /// Never ends in the slot extension, so it is never read as a slot.
    fn temp_path(&self, key: &str) -> PathBuf {
        let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!(
            ".{}.{}.{}-{}.tmp",
            key,
            SLOT_EXTENSION,
            std::process::id(),
            seq
        ))
    }

    // == Read ==
    /// Reads the whole payload stored for `key`.
    pub async fn read(&self, key: &str) -> Result<Bytes, StoreError> {
        let path = self.slot_path(key);
        match tokio::fs::read(&path).await {
            Ok(data) => {
                debug!(key, size = data.len(), "Read cache slot");
                Ok(Bytes::from(data))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    // == Write ==
    /// Creates or fully replaces the slot for `key`.
    ///
    /// The payload is written to a temp file and renamed over the slot, so a
    /// reader sees either the old payload or the new one in full. A failed
    /// write leaves the previous slot (or its absence) untouched.
    pub async fn write(&self, key: &str, payload: &[u8]) -> Result<(), StoreError> {
        let path = self.slot_path(key);
        let temp_path = self.temp_path(key);

        let staged = match tokio::fs::write(&temp_path, payload).await {
            Ok(()) => tokio::fs::rename(&temp_path, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = staged {
            if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!(key, error = %cleanup, "Failed to remove temp file");
                }
            }
            return Err(StoreError::Io(e));
        }

        debug!(key, size = payload.len(), "Wrote cache slot");
        Ok(())
    }

    // == Delete ==
    /// Removes the slot for `key`.
    pub async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.slot_path(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key, "Deleted cache slot");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
