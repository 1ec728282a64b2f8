//! Key-value store trait abstraction.
//!
//! Session history and API configs are persisted as JSON values under
//! string keys. The store is treated as reliable and synchronous.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Trait for persisting JSON values by key.
///
/// # Example
///
/// ```ignore
/// use chatline::traits::{KeyValueStore, StoreExt};
///
/// fn remember<S: KeyValueStore>(store: &S, state: &ApiConfigState) -> Result<(), StoreError> {
///     store.save_json("api-configs", state)
/// }
/// ```
pub trait KeyValueStore: Send + Sync {
    /// Load the value stored under `key`, or `None` if nothing was saved.
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError>;
}

/// Typed helpers over [`KeyValueStore`].
pub trait StoreExt: KeyValueStore {
    /// Load and deserialize the value under `key`.
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.load(key)? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| StoreError::serialization(key, &e)),
            None => Ok(None),
        }
    }

    /// Load the value under `key`, falling back to the default when nothing
    /// was saved or the saved data cannot be decoded.
    ///
    /// I/O failures are still returned.
    fn load_json_or_default<T: DeserializeOwned + Default>(
        &self,
        key: &str,
    ) -> Result<T, StoreError> {
        match self.load_json(key) {
            Ok(value) => Ok(value.unwrap_or_default()),
            Err(err @ StoreError::Serialization { .. }) => {
                tracing::warn!("Ignoring unreadable saved data: {}", err);
                Ok(T::default())
            }
            Err(err) => Err(err),
        }
    }

    /// Serialize and store `value` under `key`.
    fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value).map_err(|e| StoreError::serialization(key, &e))?;
        self.save(key, &value)
    }
}

impl<S: KeyValueStore + ?Sized> StoreExt for S {}
