//! Pure catalog addressing helpers.
//!
//! The combined catalog always lists custom media first, then builtins, so
//! legacy numeric indices and stable keys translate consistently.

use super::entry::{BuiltinMedia, CatalogEntry, CustomMedia};

/// Builds the combined catalog in addressing order: customs, then builtins.
#[must_use]
pub fn all_entries(customs: &[CustomMedia], builtins: &[BuiltinMedia]) -> Vec<CatalogEntry> {
    customs
        .iter()
        .map(|media| CatalogEntry::Custom {
            media: media.clone(),
        })
        .chain(builtins.iter().map(|media| CatalogEntry::Builtin {
            media: media.clone(),
        }))
        .collect()
}

/// Finds the entry addressed by a position key.
#[must_use]
pub fn resolve_by_key<'a>(entries: &'a [CatalogEntry], key: &str) -> Option<&'a CatalogEntry> {
    entries.iter().find(|entry| entry.position_key() == key)
}

/// Position of the entry addressed by `key` in the combined catalog.
#[must_use]
pub fn index_of_key(entries: &[CatalogEntry], key: &str) -> Option<usize> {
    entries.iter().position(|entry| entry.position_key() == key)
}

/// Translates a legacy numeric index into the stable position key of the
/// entry at that index, if the index is in range.
#[must_use]
pub fn position_key_for_index(
    customs: &[CustomMedia],
    builtins: &[BuiltinMedia],
    index: usize,
) -> Option<String> {
    if index < customs.len() {
        return Some(customs[index].id.clone());
    }
    builtins
        .get(index - customs.len())
        .map(|media| media.file_name.clone())
}
