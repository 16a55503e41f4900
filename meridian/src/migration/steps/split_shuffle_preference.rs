//! 1 to 2: split the single shuffle flag into per-kind flags.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::migration::error::MigrationResult;
use crate::migration::step::MigrationStep;
use crate::schema::{LEGACY_SHUFFLE_KEY, SHUFFLE_IMAGES_KEY, SHUFFLE_VIDEOS_KEY};
use crate::store::{get_json, set_json, SettingsStore, StoreError};

/// Copies the legacy `homeBannerShuffle` boolean into the image and video
/// shuffle flags, then deletes the legacy key. A destination that already
/// holds a value is left alone, so a partially completed run finishes
/// cleanly on retry.
pub(crate) struct SplitShufflePreferenceStep {
    store: Arc<dyn SettingsStore>,
}

impl SplitShufflePreferenceStep {
    pub(crate) const fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MigrationStep for SplitShufflePreferenceStep {
    fn from_version(&self) -> u32 {
        1
    }

    fn to_version(&self) -> u32 {
        2
    }

    async fn apply(&self) -> MigrationResult<()> {
        let Some(legacy) = get_json::<bool>(self.store.as_ref(), LEGACY_SHUFFLE_KEY)? else {
            return Ok(());
        };

        for destination in [SHUFFLE_IMAGES_KEY, SHUFFLE_VIDEOS_KEY] {
            if get_json::<Value>(self.store.as_ref(), destination)?.is_none() {
                set_json(self.store.as_ref(), destination, &legacy)?;
            }
        }

        match self.store.delete(LEGACY_SHUFFLE_KEY.to_string()) {
            Ok(()) | Err(StoreError::KeyNotFound) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
