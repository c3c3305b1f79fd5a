//! Key-value persistence collaborators.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, warn};

/// Key the ledger snapshot is stored under.
pub const STORAGE_KEY: &str = "fxwallet_state_v2";

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid storage key {0:?}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Opaque blob store addressed by a fixed key.
pub trait Storage: Send + Sync {
    /// Read the blob under `key`, `None` when nothing is stored.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the blob under `key`.
    fn set(&self, key: &str, blob: &str) -> StorageResult<()>;
}

/// In-process storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, blob: &str) -> StorageResult<()> {
        self.entries.write().insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => {
                debug!(path = %path.display(), bytes = bytes.len(), "Read stored blob");
                // Undecodable bytes are handed to the ledger, which falls back to defaults.
                let blob = String::from_utf8(bytes).unwrap_or_else(|e| {
                    warn!(
                        path = %path.display(),
                        error = %e.utf8_error(),
                        "Stored blob is not valid UTF-8"
                    );
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                });
                Ok(Some(blob))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, blob: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;

        // Readers see either the old blob or the new one.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, blob).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), bytes = blob.len(), "Wrote stored blob");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(STORAGE_KEY).unwrap(), None);

        storage.set(STORAGE_KEY, "{}").unwrap();
        storage.set(STORAGE_KEY, "{\"userName\":\"Ana\"}").unwrap();

        assert_eq!(storage.len(), 1);
        assert_eq!(
            storage.get(STORAGE_KEY).unwrap().as_deref(),
            Some("{\"userName\":\"Ana\"}")
        );
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("state"));

        assert_eq!(storage.get(STORAGE_KEY).unwrap(), None);

        storage.set(STORAGE_KEY, "{\"balances\":{}}").unwrap();
        assert_eq!(
            storage.get(STORAGE_KEY).unwrap().as_deref(),
            Some("{\"balances\":{}}")
        );
        assert!(dir.path().join("state").join("fxwallet_state_v2.json").exists());
    }

    #[test]
    fn test_file_storage_reads_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fxwallet_state_v2.json"), [0xff, 0xfe, 0x7b]).unwrap();

        let storage = FileStorage::new(dir.path());
        let blob = storage.get(STORAGE_KEY).unwrap().unwrap();

        assert!(blob.ends_with('{'));
        assert!(blob.contains('\u{FFFD}'));
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        assert!(matches!(
            storage.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.get(""), Err(StorageError::InvalidKey(_))));
    }
}
