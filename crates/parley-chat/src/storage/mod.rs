//! Key-value persistence for the session identifier.

mod file;

use std::collections::HashMap;
use std::sync::Mutex;

use parley_common::StorageError;

use crate::lock;

pub use file::FileStore;

/// Minimal string key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Process-local store. Used when no durable location is available, and in
/// tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.values).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_get_missing_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("sessionId").unwrap(), None);
    }

    #[test]
    fn memory_store_set_replaces_value() {
        let store = MemoryStore::new();
        store.set("sessionId", "a").unwrap();
        store.set("sessionId", "b").unwrap();
        assert_eq!(store.get("sessionId").unwrap().as_deref(), Some("b"));
    }
}
