//! 2 to 3: stable identities for custom media and their position data.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::catalog::entry::{new_media_id, BuiltinMedia, StoredCustomMedia};
use crate::catalog::load_custom_media;
use crate::migration::error::MigrationResult;
use crate::migration::step::MigrationStep;
use crate::schema::{CUSTOM_MEDIA_KEY, POSITIONS_KEY};
use crate::store::{get_json, set_json, SettingsStore};

/// Converts the legacy custom media list from plain path strings into
/// `{path, id}` records and rekeys the positions map from numeric catalog
/// indices to the new stable keys.
///
/// Generated ids always contain a hex letter, so a rekeyed map can never be
/// mistaken for a legacy one on re-application.
pub(crate) struct CustomMediaRecordsStep {
    store: Arc<dyn SettingsStore>,
    builtins: Arc<Vec<BuiltinMedia>>,
}

impl CustomMediaRecordsStep {
    pub(crate) const fn new(
        store: Arc<dyn SettingsStore>,
        builtins: Arc<Vec<BuiltinMedia>>,
    ) -> Self {
        Self { store, builtins }
    }

    /// Rewrites the legacy path-string array, if that is what is stored.
    fn convert_media_list(&self) -> MigrationResult<()> {
        let Some(Value::Array(raw)) = get_json::<Value>(self.store.as_ref(), CUSTOM_MEDIA_KEY)?
        else {
            return Ok(());
        };
        // Already-converted arrays hold objects as their first element.
        if !matches!(raw.first(), Some(Value::String(_))) {
            return Ok(());
        }

        let records: Vec<StoredCustomMedia> = raw
            .into_iter()
            .filter_map(|element| match element {
                Value::String(path) => Some(StoredCustomMedia {
                    path,
                    id: new_media_id(),
                }),
                _ => None,
            })
            .collect();
        set_json(self.store.as_ref(), CUSTOM_MEDIA_KEY, &records)?;
        Ok(())
    }

    /// Rekeys a positions map still keyed by stringified numeric indices.
    fn rekey_positions(&self) -> MigrationResult<()> {
        let Some(positions) =
            get_json::<Map<String, Value>>(self.store.as_ref(), POSITIONS_KEY)?
        else {
            return Ok(());
        };
        let is_numeric = |key: &str| !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit());
        if !positions.keys().any(|key| is_numeric(key)) {
            return Ok(());
        }

        let customs = load_custom_media(self.store.as_ref())?;
        let mut rekeyed = Map::new();
        for (key, descriptor) in positions {
            if is_numeric(&key) {
                let Ok(index) = key.parse::<usize>() else {
                    continue;
                };
                let stable_key = if index < customs.len() {
                    Some(customs[index].id.clone())
                } else {
                    self.builtins
                        .get(index - customs.len())
                        .map(|media| media.file_name.clone())
                };
                // Out-of-range indices point at media that no longer exists.
                if let Some(stable_key) = stable_key {
                    rekeyed.insert(stable_key, descriptor);
                }
            } else {
                rekeyed.insert(key, descriptor);
            }
        }
        set_json(self.store.as_ref(), POSITIONS_KEY, &rekeyed)?;
        Ok(())
    }
}

#[async_trait]
impl MigrationStep for CustomMediaRecordsStep {
    fn from_version(&self) -> u32 {
        2
    }

    fn to_version(&self) -> u32 {
        3
    }

    async fn apply(&self) -> MigrationResult<()> {
        self.convert_media_list()?;
        self.rekey_positions()
    }
}
