//! The migration step contract.

use async_trait::async_trait;

use super::error::MigrationResult;

/// One schema transition, taking the settings document from
/// `from_version()` to `to_version()`.
///
/// Steps hold their dependencies by `Arc` and must be idempotent: applying
/// a step to data already in its target shape changes nothing. The driver
/// persists the version bump only after `apply` succeeds, so a step may be
/// re-run after a crash.
#[async_trait]
pub trait MigrationStep: Send + Sync {
    /// Schema version this step reads.
    fn from_version(&self) -> u32;

    /// Schema version this step produces.
    fn to_version(&self) -> u32;

    /// Transforms the persisted data in place.
    async fn apply(&self) -> MigrationResult<()>;
}
