//! Migration error types.

use crate::store::StoreError;

/// Errors surfaced while running settings migrations.
#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum MigrationError {
    /// The operation is invalid in the current state, e.g. a migration is
    /// already in progress or the step table has a gap.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    /// The underlying settings store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A persisted value could not be re-encoded.
    #[error("json error: {message}")]
    Json {
        /// Details of what went wrong.
        message: String,
    },
}

impl From<serde_json::Error> for MigrationError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json {
            message: e.to_string(),
        }
    }
}

/// Convenience alias used throughout the migration module.
pub type MigrationResult<T> = Result<T, MigrationError>;
