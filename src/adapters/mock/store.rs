//! In-memory key-value store for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::StoreError;
use crate::traits::KeyValueStore;

/// In-memory store.
///
/// Clones share the same map. Saves can be made to fail to exercise error
/// paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    values: Arc<Mutex<HashMap<String, serde_json::Value>>>,
    save_should_fail: Arc<Mutex<bool>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure whether save should fail.
    pub fn set_save_should_fail(&self, should_fail: bool) {
        *self.save_should_fail.lock().unwrap() = should_fail;
    }

    /// Raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.values.lock().unwrap().get(key).cloned()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.lock().unwrap().len()
    }

    /// Whether nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for InMemoryStore {
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        if *self.save_should_fail.lock().unwrap() {
            return Err(StoreError::Io {
                key: key.to_string(),
                message: "Simulated save failure".to_string(),
            });
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.clone());
        Ok(())
    }
}
