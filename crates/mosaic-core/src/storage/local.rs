use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::kernel::error::Result;
use crate::storage::error::StorageSystemError;
use crate::storage::provider::KeyValueStore;

/// Key-value store persisted as a single JSON document on disk.
///
/// Every write rewrites the whole document. Blobs are kept as strings, so the
/// file maps each key to the serialized blob stored under it.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)
                .map_err(|e| StorageSystemError::io(e, "read_store", path.clone()))?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw).map_err(|e| StorageSystemError::DeserializationError {
                    format: "json".to_string(),
                    key: path.display().to_string(),
                    source: Box::new(e),
                })?
            }
        } else {
            BTreeMap::new()
        };
        log::debug!("Opened file store at {} with {} entries", path.display(), entries.len());
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn with_entries<T>(
        &self,
        operation: &str,
        f: impl FnOnce(&mut BTreeMap<String, String>) -> T,
    ) -> Result<T> {
        let mut entries = self.entries.lock().map_err(|_| StorageSystemError::LockPoisoned {
            store: self.name().to_string(),
            operation: operation.to_string(),
        })?;
        Ok(f(&mut entries))
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| StorageSystemError::io(e, "create_dir_all", parent.to_path_buf()))?;
            }
        }
        let raw = serde_json::to_string_pretty(entries).map_err(|e| StorageSystemError::SerializationError {
            format: "json".to_string(),
            key: self.path.display().to_string(),
            source: Box::new(e),
        })?;
        fs::write(&self.path, raw).map_err(|e| StorageSystemError::io(e, "write_store", self.path.clone()))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        self.with_entries("get", |entries| entries.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: String) -> Result<()> {
        // Flushed under the lock so concurrent writers cannot reorder the file.
        self.with_entries("set", |entries| {
            entries.insert(key.to_string(), value);
            self.flush(entries)
        })?
    }

    fn remove(&self, key: &str) -> Result<bool> {
        self.with_entries("remove", |entries| {
            let existed = entries.remove(key).is_some();
            if existed {
                self.flush(entries)?;
            }
            Ok(existed)
        })?
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.with_entries("keys", |entries| entries.keys().cloned().collect())
    }
}
