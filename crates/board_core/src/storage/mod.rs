//! Persistent store adapter.
//!
//! Every state container mirrors itself into one named JSON blob. Blobs carry
//! a `schema_version` next to the flattened state so older snapshots can be
//! told apart from newer, unsupported ones.

use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub mod json_store;
pub mod memory;

pub use json_store::JsonDirStore;
pub use memory::MemoryStore;

pub const SCHEMA_VERSION: u32 = 1;

/// Named-blob key-value storage.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, AppError>;

    fn write(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), AppError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    schema_version: u32,
    #[serde(flatten)]
    state: T,
}

pub fn load_blob<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, AppError> {
    let Some(content) = store.read(key)? else {
        return Ok(None);
    };

    let envelope: Envelope<T> = serde_json::from_str(&content)
        .map_err(|err| AppError::invalid_data(format!("{key}: {err}")))?;

    if !(1..=SCHEMA_VERSION).contains(&envelope.schema_version) {
        return Err(AppError::invalid_data(format!(
            "{key}: schema_version mismatch"
        )));
    }

    Ok(Some(envelope.state))
}

pub fn save_blob<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    state: &T,
) -> Result<(), AppError> {
    let envelope = Envelope {
        schema_version: SCHEMA_VERSION,
        state,
    };
    let content = serde_json::to_string_pretty(&envelope)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    store.write(key, &content)
}
