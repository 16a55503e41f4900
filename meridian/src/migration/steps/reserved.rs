//! Reserved 0 to 1 transition.

use async_trait::async_trait;

use crate::migration::error::MigrationResult;
use crate::migration::step::MigrationStep;

/// No-op transition reserved by the earliest installers, kept so the step
/// table has no gap.
pub(crate) struct ReservedStep;

#[async_trait]
impl MigrationStep for ReservedStep {
    fn from_version(&self) -> u32 {
        0
    }

    fn to_version(&self) -> u32 {
        1
    }

    async fn apply(&self) -> MigrationResult<()> {
        Ok(())
    }
}
