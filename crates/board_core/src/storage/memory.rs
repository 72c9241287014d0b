use crate::error::AppError;
use crate::storage::KeyValueStore;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-process store, used by tests and by sessions that should leave no trace.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn contains(&self, key: &str) -> bool {
        self.blobs
            .lock()
            .map(|blobs| blobs.contains_key(key))
            .unwrap_or(false)
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| AppError::io("memory store poisoned"))?;
        Ok(blobs.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| AppError::io("memory store poisoned"))?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| AppError::io("memory store poisoned"))?;
        blobs.remove(key);
        Ok(())
    }
}
