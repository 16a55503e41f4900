//! 4 to 5: attach stable media ids to page background descriptors.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::catalog::entry::BuiltinMedia;
use crate::migration::error::MigrationResult;
use crate::migration::step::MigrationStep;
use crate::schema::PAGE_BACKGROUND_KEYS;
use crate::store::{get_json, set_json, SettingsStore};

/// For each page background descriptor that still addresses its media by
/// numeric `mediaIndex`, resolves the index against the builtin manifest
/// and records the file name as `mediaId`.
///
/// At schema version 4 page backgrounds could only point at builtin media,
/// so the index is resolved against builtins alone. Descriptors that
/// already carry a `mediaId`, or whose index does not resolve, are left
/// untouched.
pub(crate) struct PageBackgroundIdsStep {
    store: Arc<dyn SettingsStore>,
    builtins: Arc<Vec<BuiltinMedia>>,
}

impl PageBackgroundIdsStep {
    pub(crate) const fn new(
        store: Arc<dyn SettingsStore>,
        builtins: Arc<Vec<BuiltinMedia>>,
    ) -> Self {
        Self { store, builtins }
    }
}

#[async_trait]
impl MigrationStep for PageBackgroundIdsStep {
    fn from_version(&self) -> u32 {
        4
    }

    fn to_version(&self) -> u32 {
        5
    }

    async fn apply(&self) -> MigrationResult<()> {
        for key in PAGE_BACKGROUND_KEYS {
            let Some(Value::Object(mut descriptor)) =
                get_json::<Value>(self.store.as_ref(), key)?
            else {
                continue;
            };

            let has_media_id = descriptor
                .get("mediaId")
                .and_then(Value::as_str)
                .is_some_and(|id| !id.trim().is_empty());
            if has_media_id {
                continue;
            }

            let Some(file_name) = descriptor
                .get("mediaIndex")
                .and_then(Value::as_u64)
                .and_then(|index| usize::try_from(index).ok())
                .and_then(|index| self.builtins.get(index))
                .map(|media| media.file_name.clone())
            else {
                continue;
            };

            descriptor.insert("mediaId".to_string(), Value::String(file_name));
            set_json(self.store.as_ref(), key, &descriptor)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::entry::MediaKind;
    use crate::store::InMemorySettingsStore;
    use serde_json::Map;

    fn builtins() -> Arc<Vec<BuiltinMedia>> {
        Arc::new(vec![
            BuiltinMedia {
                file_name: "builtin1.jpg".to_string(),
                display_name: "Builtin 1".to_string(),
                kind: MediaKind::Image,
            },
            BuiltinMedia {
                file_name: "builtin2.jpg".to_string(),
                display_name: "Builtin 2".to_string(),
                kind: MediaKind::Image,
            },
        ])
    }

    fn step(store: &Arc<InMemorySettingsStore>) -> PageBackgroundIdsStep {
        PageBackgroundIdsStep::new(store.clone(), builtins())
    }

    fn descriptor(store: &InMemorySettingsStore, key: &str) -> Map<String, Value> {
        match get_json::<Value>(store, key).unwrap().unwrap() {
            Value::Object(map) => map,
            other => panic!("expected object descriptor, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_index_resolves_to_builtin_file_name() {
        let store = Arc::new(InMemorySettingsStore::new());
        store
            .set(
                "pages.home.background".to_string(),
                r#"{"mediaIndex": 1, "fit": "cover", "opacity": 0.8}"#.to_string(),
            )
            .unwrap();

        step(&store).apply().await.unwrap();

        let background = descriptor(&store, "pages.home.background");
        assert_eq!(
            background.get("mediaId").and_then(Value::as_str),
            Some("builtin2.jpg")
        );
        // Other fields are untouched.
        assert_eq!(background.get("fit").and_then(Value::as_str), Some("cover"));
        assert_eq!(
            background.get("mediaIndex").and_then(Value::as_u64),
            Some(1)
        );
    }

    #[tokio::test]
    async fn test_existing_media_id_is_kept() {
        let store = Arc::new(InMemorySettingsStore::new());
        store
            .set(
                "pages.navigator.background".to_string(),
                r#"{"mediaId": "ab12cd34", "mediaIndex": 0}"#.to_string(),
            )
            .unwrap();

        let migration = step(&store);
        migration.apply().await.unwrap();
        migration.apply().await.unwrap();

        let background = descriptor(&store, "pages.navigator.background");
        assert_eq!(
            background.get("mediaId").and_then(Value::as_str),
            Some("ab12cd34")
        );
    }

    #[tokio::test]
    async fn test_unresolvable_index_leaves_descriptor_alone() {
        let store = Arc::new(InMemorySettingsStore::new());
        store
            .set(
                "pages.settings.background".to_string(),
                r#"{"mediaIndex": 7}"#.to_string(),
            )
            .unwrap();

        step(&store).apply().await.unwrap();

        let background = descriptor(&store, "pages.settings.background");
        assert!(!background.contains_key("mediaId"));
    }

    #[tokio::test]
    async fn test_absent_descriptors_change_nothing() {
        let store = Arc::new(InMemorySettingsStore::new());
        step(&store).apply().await.unwrap();
        for key in PAGE_BACKGROUND_KEYS {
            assert!(get_json::<Value>(store.as_ref(), key).unwrap().is_none());
        }
    }
}
