//! Local key-value preferences.
//!
//! Holds the values that outlive a shell session: the authentication
//! token and the username it belongs to. Implementations must never log
//! or print stored values.

mod error;
mod file_store;

pub use error::PreferenceError;
pub use file_store::FilePreferenceStore;

use std::collections::HashMap;
use std::sync::Mutex;

/// Namespace all keys are stored under.
pub const NAMESPACE: &str = "ghshell";

/// Key of the persisted authentication token.
pub const TOKEN_KEY: &str = "token";

/// Key of the persisted username.
pub const USERNAME_KEY: &str = "username";

/// Key-value preference storage.
pub trait PreferenceStore: Send + Sync {
    /// Returns the value for `key`, if set.
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    /// Sets `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;

    /// Removes `key`. Removing a missing key succeeds.
    fn delete(&self, key: &str) -> Result<(), PreferenceError>;
}

/// Preferences held in memory for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, PreferenceError> {
        self.values
            .lock()
            .map_err(|_| PreferenceError::ReadError("store lock poisoned".to_string()))
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), PreferenceError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
