//! Durable key-value slots and the snapshot adapter built on them.

pub mod file;
pub mod memory;
pub mod persistence;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use persistence::{DEFAULT_SLOT, Persistence};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access slot `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("slot `{key}` needs {needed} bytes but the quota is {quota}")]
    QuotaExceeded { key: String, needed: usize, quota: usize },

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid slot name `{0}`")]
    InvalidKey(String),
}

/// Synchronous string storage addressed by slot name.
///
/// `set` replaces the whole value or leaves the previous one in place.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Slot names double as file names, so keep them to a safe alphabet.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
