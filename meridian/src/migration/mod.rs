//! Versioned settings migration.
//!
//! Persisted settings carry a schema version under a reserved key. On every
//! launch the host constructs a [`SettingsMigrator`] and calls
//! [`SettingsMigrator::migrate`], which walks the settings forward through
//! each pending schema step. The version is bumped only after a step
//! succeeds, and every step tolerates re-application, so a crash mid-run
//! leaves the data in a state the next run completes from.

mod driver;
mod error;
mod step;
mod steps;
mod version;

pub use driver::{MigrationSummary, SettingsMigrator};
pub use error::{MigrationError, MigrationResult};
pub use step::MigrationStep;
pub use version::{current_version, set_version, LATEST_SCHEMA_VERSION};
