//! In-memory key-value storage.

use promptchat_core::error::{ChatError, Result};
use promptchat_core::storage::{KeyValueStore, StorageKey};
use std::collections::HashMap;
use std::sync::Mutex;

/// A [`KeyValueStore`] held entirely in memory.
///
/// Used in tests and for throwaway sessions; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<StorageKey, String>>> {
        self.entries
            .lock()
            .map_err(|_| ChatError::storage("memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn read(&self, key: StorageKey) -> Result<Option<String>> {
        Ok(self.entries()?.get(&key).cloned())
    }

    fn write(&self, key: StorageKey, value: &str) -> Result<()> {
        self.entries()?.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<()> {
        self.entries()?.remove(&key);
        Ok(())
    }
}
