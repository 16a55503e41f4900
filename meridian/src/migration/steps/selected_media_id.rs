//! 3 to 4: derive the stable selected-media id from the legacy index.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::catalog::entry::BuiltinMedia;
use crate::catalog::{load_custom_media, resolver};
use crate::migration::error::MigrationResult;
use crate::migration::step::MigrationStep;
use crate::schema::{DEFAULT_BUILTIN_FILE_NAME, LEGACY_SELECTED_INDEX_KEY, SELECTED_MEDIA_ID_KEY};
use crate::store::{get_json, SettingsStore, StoreError};

/// Writes `homeBannerMediaId` from the legacy `homeBannerIndex`, using the
/// custom-first addressing rule. An index that resolves to nothing falls
/// back to the default builtin file name. The legacy key stays in place for
/// older readers.
pub(crate) struct SelectedMediaIdStep {
    store: Arc<dyn SettingsStore>,
    builtins: Arc<Vec<BuiltinMedia>>,
}

impl SelectedMediaIdStep {
    pub(crate) const fn new(
        store: Arc<dyn SettingsStore>,
        builtins: Arc<Vec<BuiltinMedia>>,
    ) -> Self {
        Self { store, builtins }
    }
}

#[async_trait]
impl MigrationStep for SelectedMediaIdStep {
    fn from_version(&self) -> u32 {
        3
    }

    fn to_version(&self) -> u32 {
        4
    }

    async fn apply(&self) -> MigrationResult<()> {
        match self.store.get(SELECTED_MEDIA_ID_KEY.to_string()) {
            Ok(existing) if !existing.trim().is_empty() => return Ok(()),
            Ok(_) | Err(StoreError::KeyNotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let legacy_index = get_json::<Value>(self.store.as_ref(), LEGACY_SELECTED_INDEX_KEY)?
            .and_then(|value| value.as_u64())
            .and_then(|index| usize::try_from(index).ok())
            .unwrap_or(0);

        let customs = load_custom_media(self.store.as_ref())?;
        let key = resolver::position_key_for_index(&customs, &self.builtins, legacy_index)
            .unwrap_or_else(|| DEFAULT_BUILTIN_FILE_NAME.to_string());
        self.store.set(SELECTED_MEDIA_ID_KEY.to_string(), key)?;
        Ok(())
    }
}
