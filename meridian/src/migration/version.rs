//! Schema version tracking.
//!
//! The version lives in the store under a reserved key as a stringified
//! integer. Absent or unparseable values read as version 0, so a fresh
//! install and a pre-versioning install look the same to the driver.

use crate::schema::SCHEMA_VERSION_KEY;
use crate::store::{SettingsStore, StoreError};

/// The schema version this build writes and migrates up to.
pub const LATEST_SCHEMA_VERSION: u32 = 5;

/// Reads the persisted schema version.
///
/// # Errors
///
/// Propagates store failures other than a missing key.
pub fn current_version(store: &dyn SettingsStore) -> Result<u32, StoreError> {
    match store.get(SCHEMA_VERSION_KEY.to_string()) {
        Ok(raw) => Ok(raw.trim().parse().unwrap_or(0)),
        Err(StoreError::KeyNotFound) => Ok(0),
        Err(e) => Err(e),
    }
}

/// Persists the schema version.
///
/// # Errors
///
/// Propagates store failures.
pub fn set_version(store: &dyn SettingsStore, version: u32) -> Result<(), StoreError> {
    store.set(SCHEMA_VERSION_KEY.to_string(), version.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemorySettingsStore;

    #[test]
    fn test_absent_version_reads_as_zero() {
        let store = InMemorySettingsStore::new();
        assert_eq!(current_version(&store).unwrap(), 0);
    }

    #[test]
    fn test_garbage_version_reads_as_zero() {
        let store = InMemorySettingsStore::new();
        store
            .set(SCHEMA_VERSION_KEY.to_string(), "not-a-number".to_string())
            .unwrap();
        assert_eq!(current_version(&store).unwrap(), 0);
    }

    #[test]
    fn test_version_round_trip() {
        let store = InMemorySettingsStore::new();
        set_version(&store, 3).unwrap();
        assert_eq!(current_version(&store).unwrap(), 3);
    }

    #[test]
    fn test_whitespace_is_tolerated() {
        let store = InMemorySettingsStore::new();
        store
            .set(SCHEMA_VERSION_KEY.to_string(), " 4 ".to_string())
            .unwrap();
        assert_eq!(current_version(&store).unwrap(), 4);
    }
}
