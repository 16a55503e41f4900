//! Stable-identity media catalog for the home banner.
//!
//! The catalog merges user-imported media (addressed by a random stable id)
//! with application-bundled media (addressed by file name), customs first.
//! All persistence goes through the host's [`SettingsStore`].

pub mod entry;
pub mod resolver;

use std::sync::Arc;

use serde_json::Value;

use crate::catalog::entry::{
    media_kind_for_path, new_media_id, BuiltinMedia, CatalogEntry, CustomMedia, StoredCustomMedia,
};
use crate::logger::LogContext;
use crate::schema::{
    CUSTOM_MEDIA_KEY, DEFAULT_BUILTIN_FILE_NAME, LEGACY_SELECTED_INDEX_KEY, POSITIONS_KEY,
    SELECTED_MEDIA_ID_KEY,
};
use crate::store::{get_json, set_json, SettingsStore, StoreError};

/// Errors surfaced by catalog operations.
///
/// Resolution misses are never errors; only adapter failures reach callers.
#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum CatalogError {
    /// The underlying settings store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Loads the persisted custom media list, re-deriving each kind from the
/// path. Absent or malformed data yields an empty list.
pub(crate) fn load_custom_media(
    store: &dyn SettingsStore,
) -> Result<Vec<CustomMedia>, StoreError> {
    let stored: Vec<StoredCustomMedia> =
        get_json(store, CUSTOM_MEDIA_KEY)?.unwrap_or_default();
    Ok(stored.into_iter().map(CustomMedia::from).collect())
}

/// Persists the custom media list in its stored `{path, id}` form.
pub(crate) fn save_custom_media(
    store: &dyn SettingsStore,
    customs: &[CustomMedia],
) -> Result<(), StoreError> {
    let stored: Vec<StoredCustomMedia> = customs.iter().map(StoredCustomMedia::from).collect();
    set_json(store, CUSTOM_MEDIA_KEY, &stored)
}

/// The home-banner media catalog, backed by a host-provided settings store
/// and a fixed manifest of bundled media.
#[derive(uniffi::Object)]
pub struct MediaCatalog {
    store: Arc<dyn SettingsStore>,
    builtins: Vec<BuiltinMedia>,
}

// Exported methods take owned values, as the FFI layer requires.
#[allow(clippy::needless_pass_by_value)]
#[uniffi::export]
impl MediaCatalog {
    /// Creates a catalog over the given store and builtin manifest.
    #[uniffi::constructor]
    #[must_use]
    pub fn new(store: Arc<dyn SettingsStore>, builtins: Vec<BuiltinMedia>) -> Arc<Self> {
        Arc::new(Self { store, builtins })
    }

    /// All catalog entries in addressing order: customs first, then
    /// builtins.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] if the settings store fails.
    pub fn entries(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let customs = load_custom_media(self.store.as_ref())?;
        Ok(resolver::all_entries(&customs, &self.builtins))
    }

    /// The currently selected entry.
    ///
    /// Falls back along the chain: persisted key, default builtin, first
    /// entry, and finally a synthetic builtin entry carrying the default
    /// file name when the catalog is empty.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] if the settings store fails.
    pub fn selected_entry(&self) -> Result<CatalogEntry, CatalogError> {
        let entries = self.entries()?;
        let selected_key = match self.store.get(SELECTED_MEDIA_ID_KEY.to_string()) {
            Ok(key) => Some(key),
            Err(StoreError::KeyNotFound) => None,
            Err(e) => return Err(e.into()),
        };

        if let Some(key) = selected_key.filter(|key| !key.trim().is_empty()) {
            if let Some(entry) = resolver::resolve_by_key(&entries, &key) {
                return Ok(entry.clone());
            }
        }
        if let Some(entry) = resolver::resolve_by_key(&entries, DEFAULT_BUILTIN_FILE_NAME) {
            return Ok(entry.clone());
        }
        if let Some(entry) = entries.first() {
            return Ok(entry.clone());
        }
        Ok(CatalogEntry::Builtin {
            media: BuiltinMedia {
                file_name: DEFAULT_BUILTIN_FILE_NAME.to_string(),
                display_name: DEFAULT_BUILTIN_FILE_NAME.to_string(),
                kind: media_kind_for_path(DEFAULT_BUILTIN_FILE_NAME),
            },
        })
    }

    /// Persists `key` as the selected media.
    ///
    /// The deprecated numeric `homeBannerIndex` is refreshed alongside when
    /// the key resolves, so older readers stay consistent. An unresolvable
    /// key is still persisted; reads fall back instead of failing.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] if the settings store fails.
    pub fn select_entry(&self, key: String) -> Result<(), CatalogError> {
        let _log_ctx = LogContext::new("MediaCatalog");
        let entries = self.entries()?;
        self.store.set(SELECTED_MEDIA_ID_KEY.to_string(), key.clone())?;
        if let Some(index) = resolver::index_of_key(&entries, &key) {
            self.store
                .set(LEGACY_SELECTED_INDEX_KEY.to_string(), index.to_string())?;
        }
        crate::debug!("catalog.selected key={key}");
        Ok(())
    }

    /// Imports media files by path, in input order, assigning fresh ids.
    ///
    /// No deduplication is applied; callers importing the same path twice
    /// get two entries.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] if the settings store fails.
    pub fn add_custom_media(&self, paths: Vec<String>) -> Result<Vec<CustomMedia>, CatalogError> {
        let _log_ctx = LogContext::new("MediaCatalog");
        let mut customs = load_custom_media(self.store.as_ref())?;
        let added: Vec<CustomMedia> = paths
            .into_iter()
            .map(|path| {
                let kind = media_kind_for_path(&path);
                CustomMedia {
                    id: new_media_id(),
                    path,
                    kind,
                }
            })
            .collect();
        customs.extend(added.iter().cloned());
        save_custom_media(self.store.as_ref(), &customs)?;
        crate::debug!("catalog.custom_media_added count={}", added.len());
        Ok(added)
    }

    /// Imports a single media URL, skipping it when already present.
    ///
    /// Returns the new entry, or `None` when the URL was already in the
    /// catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] if the settings store fails.
    pub fn add_custom_media_url(&self, url: String) -> Result<Option<CustomMedia>, CatalogError> {
        let mut customs = load_custom_media(self.store.as_ref())?;
        if customs.iter().any(|media| media.path == url) {
            return Ok(None);
        }
        let kind = media_kind_for_path(&url);
        let media = CustomMedia {
            id: new_media_id(),
            path: url,
            kind,
        };
        customs.push(media.clone());
        save_custom_media(self.store.as_ref(), &customs)?;
        Ok(Some(media))
    }

    /// Removes the first custom entry matching `path`, drops its position
    /// side-data, and re-anchors the current selection.
    ///
    /// When the removed entry sat at or before the selection, the selection
    /// moves one slot back (clamped to the remaining catalog); an emptied
    /// catalog falls back to the default builtin file name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] if the settings store fails.
    pub fn remove_custom_media(&self, path: String) -> Result<(), CatalogError> {
        let _log_ctx = LogContext::new("MediaCatalog");
        let customs = load_custom_media(self.store.as_ref())?;
        let Some(removed_index) = customs.iter().position(|media| media.path == path) else {
            return Ok(());
        };

        let entries_before = resolver::all_entries(&customs, &self.builtins);
        let selected_index = match self.store.get(SELECTED_MEDIA_ID_KEY.to_string()) {
            Ok(key) => resolver::index_of_key(&entries_before, &key),
            Err(StoreError::KeyNotFound) => None,
            Err(e) => return Err(e.into()),
        };

        let mut remaining = customs;
        let removed = remaining.remove(removed_index);
        save_custom_media(self.store.as_ref(), &remaining)?;
        self.drop_position(&removed.id)?;

        if let Some(selected) = selected_index {
            if removed_index <= selected {
                self.reanchor_selection(&remaining, selected)?;
            }
        }
        crate::debug!("catalog.custom_media_removed id={}", removed.id);
        Ok(())
    }
}

impl MediaCatalog {
    /// Removes one entry from the positions map, if the map exists.
    fn drop_position(&self, id: &str) -> Result<(), StoreError> {
        let Some(mut positions) =
            get_json::<serde_json::Map<String, Value>>(self.store.as_ref(), POSITIONS_KEY)?
        else {
            return Ok(());
        };
        if positions.remove(id).is_some() {
            set_json(self.store.as_ref(), POSITIONS_KEY, &positions)?;
        }
        Ok(())
    }

    fn reanchor_selection(
        &self,
        remaining: &[CustomMedia],
        previous_index: usize,
    ) -> Result<(), StoreError> {
        let entries = resolver::all_entries(remaining, &self.builtins);
        if entries.is_empty() {
            self.store.set(
                SELECTED_MEDIA_ID_KEY.to_string(),
                DEFAULT_BUILTIN_FILE_NAME.to_string(),
            )?;
            self.store
                .set(LEGACY_SELECTED_INDEX_KEY.to_string(), "0".to_string())?;
            return Ok(());
        }
        let new_index = previous_index.saturating_sub(1).min(entries.len() - 1);
        let key = entries[new_index].position_key().to_string();
        self.store.set(SELECTED_MEDIA_ID_KEY.to_string(), key)?;
        self.store
            .set(LEGACY_SELECTED_INDEX_KEY.to_string(), new_index.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::entry::MediaKind;
    use crate::store::InMemorySettingsStore;

    fn builtins() -> Vec<BuiltinMedia> {
        vec![
            BuiltinMedia {
                file_name: DEFAULT_BUILTIN_FILE_NAME.to_string(),
                display_name: "Aurora".to_string(),
                kind: MediaKind::Image,
            },
            BuiltinMedia {
                file_name: "dunes-2.mp4".to_string(),
                display_name: "Dunes".to_string(),
                kind: MediaKind::Video,
            },
        ]
    }

    fn catalog() -> Arc<MediaCatalog> {
        MediaCatalog::new(Arc::new(InMemorySettingsStore::new()), builtins())
    }

    #[test]
    fn test_add_assigns_fresh_ids_in_input_order() {
        let catalog = catalog();
        let added = catalog
            .add_custom_media(vec!["/m/a.jpg".to_string(), "/m/b.mp4".to_string()])
            .unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(added[0].path, "/m/a.jpg");
        assert_eq!(added[0].kind, MediaKind::Image);
        assert_eq!(added[1].kind, MediaKind::Video);
        assert_ne!(added[0].id, added[1].id);

        let entries = catalog.entries().unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].position_key(), added[0].id);
        assert_eq!(entries[2].position_key(), DEFAULT_BUILTIN_FILE_NAME);
    }

    #[test]
    fn test_add_url_skips_duplicates() {
        let catalog = catalog();
        let first = catalog
            .add_custom_media_url("https://m/x.jpg".to_string())
            .unwrap();
        assert!(first.is_some());
        let second = catalog
            .add_custom_media_url("https://m/x.jpg".to_string())
            .unwrap();
        assert!(second.is_none());
        assert_eq!(catalog.entries().unwrap().len(), 3);
    }

    #[test]
    fn test_selected_entry_fallback_chain() {
        let catalog = catalog();
        // No selection persisted: default builtin wins.
        assert_eq!(
            catalog.selected_entry().unwrap().position_key(),
            DEFAULT_BUILTIN_FILE_NAME
        );

        // Unknown key: still falls back.
        catalog.select_entry("deadbeef".to_string()).unwrap();
        assert_eq!(
            catalog.selected_entry().unwrap().position_key(),
            DEFAULT_BUILTIN_FILE_NAME
        );

        // Valid key resolves exactly.
        catalog.select_entry("dunes-2.mp4".to_string()).unwrap();
        assert_eq!(
            catalog.selected_entry().unwrap().position_key(),
            "dunes-2.mp4"
        );
    }

    #[test]
    fn test_empty_catalog_returns_sentinel_entry() {
        let catalog = MediaCatalog::new(Arc::new(InMemorySettingsStore::new()), Vec::new());
        let entry = catalog.selected_entry().unwrap();
        assert_eq!(entry.position_key(), DEFAULT_BUILTIN_FILE_NAME);
    }

    #[test]
    fn test_select_refreshes_legacy_index() {
        let store = Arc::new(InMemorySettingsStore::new());
        let catalog = MediaCatalog::new(store.clone(), builtins());
        catalog.select_entry("dunes-2.mp4".to_string()).unwrap();
        assert_eq!(
            store.get(LEGACY_SELECTED_INDEX_KEY.to_string()).unwrap(),
            "1"
        );

        let added = catalog
            .add_custom_media(vec!["/m/a.jpg".to_string()])
            .unwrap();
        catalog.select_entry(added[0].id.clone()).unwrap();
        assert_eq!(
            store.get(LEGACY_SELECTED_INDEX_KEY.to_string()).unwrap(),
            "0"
        );
    }

    #[test]
    fn test_removal_reanchors_selection_one_slot_back() {
        let catalog = catalog();
        let added = catalog
            .add_custom_media(vec![
                "/m/a.jpg".to_string(),
                "/m/b.jpg".to_string(),
                "/m/c.jpg".to_string(),
            ])
            .unwrap();
        // Select the third custom entry (index 2), remove the first (index 0).
        catalog.select_entry(added[2].id.clone()).unwrap();
        catalog.remove_custom_media("/m/a.jpg".to_string()).unwrap();
        // Selection moves to index 1 of the remaining catalog, still /m/c.jpg.
        assert_eq!(
            catalog.selected_entry().unwrap().position_key(),
            added[2].id
        );
    }

    #[test]
    fn test_removal_after_selection_leaves_it_alone() {
        let catalog = catalog();
        let added = catalog
            .add_custom_media(vec!["/m/a.jpg".to_string(), "/m/b.jpg".to_string()])
            .unwrap();
        catalog.select_entry(added[0].id.clone()).unwrap();
        catalog.remove_custom_media("/m/b.jpg".to_string()).unwrap();
        assert_eq!(
            catalog.selected_entry().unwrap().position_key(),
            added[0].id
        );
    }

    #[test]
    fn test_removing_only_selected_custom_falls_back_to_default_builtin() {
        let catalog = catalog();
        let added = catalog
            .add_custom_media(vec!["/m/only.jpg".to_string()])
            .unwrap();
        catalog.select_entry(added[0].id.clone()).unwrap();
        catalog
            .remove_custom_media("/m/only.jpg".to_string())
            .unwrap();
        assert_eq!(
            catalog.selected_entry().unwrap().position_key(),
            DEFAULT_BUILTIN_FILE_NAME
        );
    }

    #[test]
    fn test_removal_drops_position_side_data() {
        let store = Arc::new(InMemorySettingsStore::new());
        let catalog = MediaCatalog::new(store.clone(), builtins());
        let added = catalog
            .add_custom_media(vec!["/m/a.jpg".to_string()])
            .unwrap();
        store
            .set(
                POSITIONS_KEY.to_string(),
                format!(r#"{{"{}": {{"x": 0.5}}, "{DEFAULT_BUILTIN_FILE_NAME}": {{"x": 0.1}}}}"#, added[0].id),
            )
            .unwrap();

        catalog.remove_custom_media("/m/a.jpg".to_string()).unwrap();
        let positions: serde_json::Map<String, Value> =
            get_json(store.as_ref(), POSITIONS_KEY).unwrap().unwrap();
        assert!(!positions.contains_key(&added[0].id));
        assert!(positions.contains_key(DEFAULT_BUILTIN_FILE_NAME));
    }

    #[test]
    fn test_remove_unknown_path_is_noop() {
        let catalog = catalog();
        catalog
            .remove_custom_media("/m/missing.jpg".to_string())
            .unwrap();
        assert_eq!(catalog.entries().unwrap().len(), 2);
    }
}
