//! Persistence errors of the key-value store.

use thiserror::Error;

/// Failures reading or writing persisted values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The file backing a key could not be read or written
    #[error("storage I/O error for '{key}': {message}")]
    Io { key: String, message: String },

    /// A stored value could not be (de)serialized
    #[error("invalid stored value for '{key}': {message}")]
    Serialization { key: String, message: String },

    /// No directory is available to store data in
    #[error("no data directory available")]
    NoDataDirectory,
}

impl StoreError {
    pub(crate) fn io(key: &str, err: &std::io::Error) -> Self {
        StoreError::Io {
            key: key.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn serialization(key: &str, err: &serde_json::Error) -> Self {
        StoreError::Serialization {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}
