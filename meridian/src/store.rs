//! Persisted key-value storage, implemented by the host application.
//!
//! The host keeps the actual settings file on disk (and decides its format);
//! this crate only ever sees dot-delimited keys and string values. Structured
//! values are JSON-encoded, which keeps the trait surface minimal for the
//! foreign bindings.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur when interacting with the host settings store.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Error, uniffi::Error)]
pub enum StoreError {
    /// The requested key was not found in the store
    #[error("key not found")]
    KeyNotFound,
    /// Failed to parse the value retrieved from the store
    #[error("failed to parse value")]
    ParsingFailure,
    /// Failed to update the value in the store
    #[error("failed to update value")]
    UpdateFailure,
    /// An unexpected error occurred in the foreign callback
    #[error("unexpected error in foreign callback: {0}")]
    UnexpectedUniFFICallbackError(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for StoreError {
    fn from(e: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::UnexpectedUniFFICallbackError(e.reason)
    }
}

/// A trait implemented by the host application to persist settings key-value
/// pairs on the device.
///
/// Keys are dot-delimited paths into the settings document (see
/// [`crate::schema`] for the reserved layout). Only string values are
/// supported; JSON is used to serialize more complex data.
///
/// There are no integrity guarantees: the underlying file may be edited,
/// corrupted, or years stale. Readers in this crate must tolerate any shape
/// they find.
#[uniffi::export(with_foreign)]
pub trait SettingsStore: Send + Sync {
    /// Get a value from the settings store.
    ///
    /// # Errors
    /// - `StoreError::KeyNotFound` if the key is not present
    /// - `StoreError::ParsingFailure` if the value could not be read
    fn get(&self, key: String) -> Result<String, StoreError>;

    /// Set a value in the settings store.
    ///
    /// # Errors
    /// - `StoreError::UpdateFailure` if the value could not be written
    fn set(&self, key: String, value: String) -> Result<(), StoreError>;

    /// Delete a value from the settings store.
    ///
    /// # Errors
    /// - `StoreError::KeyNotFound` if the key is not present
    /// - `StoreError::UpdateFailure` if the value could not be removed
    fn delete(&self, key: String) -> Result<(), StoreError>;
}

/// Read a JSON-encoded value from the store.
///
/// An absent key or a value that does not decode as `T` both yield
/// `Ok(None)`: unrecognized historical data is "not applicable", never an
/// error. Adapter failures still propagate.
pub(crate) fn get_json<T: DeserializeOwned>(
    store: &dyn SettingsStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key.to_string()) {
        Ok(raw) => Ok(serde_json::from_str(&raw).ok()),
        Err(StoreError::KeyNotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Write a value to the store as JSON.
pub(crate) fn set_json<T: Serialize>(
    store: &dyn SettingsStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|_| StoreError::ParsingFailure)?;
    store.set(key.to_string(), raw)
}

/// In-memory implementation of [`SettingsStore`] for unit tests.
#[cfg(test)]
#[derive(Default)]
pub struct InMemorySettingsStore {
    entries: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl InMemorySettingsStore {
    /// Creates a new empty in-memory settings store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: std::sync::Mutex::new(std::collections::HashMap::new()),
        }
    }

    /// A copy of every stored entry, for whole-store assertions.
    pub fn snapshot(&self) -> std::collections::HashMap<String, String> {
        self.entries.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl SettingsStore for InMemorySettingsStore {
    fn get(&self, key: String) -> Result<String, StoreError> {
        let value = self.entries.lock().unwrap().get(&key).cloned();
        value.ok_or(StoreError::KeyNotFound)
    }

    fn set(&self, key: String, value: String) -> Result<(), StoreError> {
        self.entries.lock().unwrap().insert(key, value);
        Ok(())
    }

    fn delete(&self, key: String) -> Result<(), StoreError> {
        self.entries.lock().unwrap().remove(&key);
        Ok(())
    }
}
