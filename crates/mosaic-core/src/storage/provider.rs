use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::kernel::error::Result;
use crate::storage::error::StorageSystemError;

/// Persistent key-value store holding independent serialized blobs under
/// stable string keys.
pub trait KeyValueStore: Send + Sync + Debug {
    /// Get the name of this store
    fn name(&self) -> &str;

    /// Read the raw blob stored under `key`
    fn get_raw(&self, key: &str) -> Result<Option<String>>;

    /// Store a raw blob under `key`, replacing any previous value
    fn set_raw(&self, key: &str, value: String) -> Result<()>;

    /// Remove `key`, returning whether it existed
    fn remove(&self, key: &str) -> Result<bool>;

    /// List stored keys
    fn keys(&self) -> Result<Vec<String>>;
}

impl dyn KeyValueStore {
    /// Read and decode the JSON blob stored under `key`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_raw(key)? {
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
                StorageSystemError::DeserializationError {
                    format: "json".to_string(),
                    key: key.to_string(),
                    source: Box::new(e),
                }
                .into()
            }),
            None => Ok(None),
        }
    }

    /// Encode `value` as JSON and store it under `key`.
    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).map_err(|e| StorageSystemError::SerializationError {
            format: "json".to_string(),
            key: key.to_string(),
            source: Box::new(e),
        })?;
        self.set_raw(key, raw)
    }
}

/// Volatile store, the equivalent of a fresh browser profile.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self, operation: &str) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries.lock().map_err(|_| {
            StorageSystemError::LockPoisoned {
                store: self.name().to_string(),
                operation: operation.to_string(),
            }
            .into()
        })
    }
}

impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock("get")?.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: String) -> Result<()> {
        self.lock("set")?.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.lock("remove")?.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.lock("keys")?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
