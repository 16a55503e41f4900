//! Reserved settings keys, the default settings shape, and key-path
//! validation.
//!
//! The settings document is a flat key/value store on the host side, but a
//! number of keys are reserved for the home-banner subsystem and the page
//! backgrounds. [`KeyPathValidator`] lets callers check dotted key paths
//! against the known shape before writing.

use std::collections::BTreeSet;

use serde_json::Value;

/// Key holding the settings schema version as a stringified integer.
pub const SCHEMA_VERSION_KEY: &str = "__schemaVersion";

/// Key holding the array of user-imported home-banner media records.
pub const CUSTOM_MEDIA_KEY: &str = "homeBannerCustomMedia";

/// Key holding the per-media position map (media id to offset descriptor).
pub const POSITIONS_KEY: &str = "homeBannerPositions";

/// Key holding the stable id of the selected home-banner media.
pub const SELECTED_MEDIA_ID_KEY: &str = "homeBannerMediaId";

/// Legacy key holding the selected media as a catalog index.
pub const LEGACY_SELECTED_INDEX_KEY: &str = "homeBannerIndex";

/// Legacy key holding a single shuffle flag, split in schema version 2.
pub const LEGACY_SHUFFLE_KEY: &str = "homeBannerShuffle";

/// Key holding the image shuffle flag.
pub const SHUFFLE_IMAGES_KEY: &str = "homeBannerShuffleImages";

/// Key holding the video shuffle flag.
pub const SHUFFLE_VIDEOS_KEY: &str = "homeBannerShuffleVideos";

/// Keys holding per-page background descriptors.
pub const PAGE_BACKGROUND_KEYS: [&str; 3] = [
    "pages.home.background",
    "pages.navigator.background",
    "pages.settings.background",
];

/// File name of the builtin media used when nothing else resolves.
pub const DEFAULT_BUILTIN_FILE_NAME: &str = "aurora-1.jpg";

/// Returns the default shape of the settings document.
///
/// Empty objects mark dynamic maps whose keys are only known at runtime;
/// they count as leaves for path validation.
#[must_use]
pub fn default_settings_shape() -> Value {
    serde_json::json!({
        "homeBannerCustomMedia": [],
        "homeBannerPositions": {},
        "homeBannerMediaId": "",
        "homeBannerIndex": 0,
        "homeBannerShuffleImages": false,
        "homeBannerShuffleVideos": false,
        "pages": {
            "home": {
                "background": {
                    "mediaId": "",
                    "mediaIndex": 0,
                    "fit": "cover",
                    "opacity": 1.0,
                },
            },
            "navigator": {
                "background": {
                    "mediaId": "",
                    "mediaIndex": 0,
                    "fit": "cover",
                    "opacity": 1.0,
                },
            },
            "settings": {
                "background": {
                    "mediaId": "",
                    "mediaIndex": 0,
                    "fit": "cover",
                    "opacity": 1.0,
                },
            },
        },
    })
}

/// Collects every dotted leaf path in a JSON shape.
///
/// Non-empty objects recurse; everything else (scalars, arrays and empty
/// objects) is a leaf.
#[must_use]
pub fn collect_key_paths(shape: &Value) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();
    collect_into(shape, String::new(), &mut paths);
    paths
}

fn collect_into(value: &Value, prefix: String, paths: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                collect_into(child, path, paths);
            }
        }
        _ => {
            if !prefix.is_empty() {
                paths.insert(prefix);
            }
        }
    }
}

/// Error raised when a schema shape cannot be parsed.
#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum SchemaError {
    /// The provided shape was not a JSON object.
    #[error("invalid schema shape: {message}")]
    InvalidShape {
        /// Details of what went wrong.
        message: String,
    },
}

/// Validates dotted key paths against a known settings shape.
#[derive(Debug, uniffi::Object)]
pub struct KeyPathValidator {
    paths: BTreeSet<String>,
}

// Exported methods take owned values, as the FFI layer requires.
#[allow(clippy::needless_pass_by_value)]
#[uniffi::export]
impl KeyPathValidator {
    /// Builds a validator from a JSON shape document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidShape`] if `schema_json` is not a JSON
    /// object.
    #[uniffi::constructor]
    pub fn new(schema_json: String) -> Result<Self, SchemaError> {
        let shape: Value =
            serde_json::from_str(&schema_json).map_err(|e| SchemaError::InvalidShape {
                message: e.to_string(),
            })?;
        if !shape.is_object() {
            return Err(SchemaError::InvalidShape {
                message: "top-level shape must be an object".to_string(),
            });
        }
        Ok(Self {
            paths: collect_key_paths(&shape),
        })
    }

    /// Builds a validator over the default settings shape.
    #[uniffi::constructor]
    #[must_use]
    pub fn with_default_shape() -> Self {
        Self {
            paths: collect_key_paths(&default_settings_shape()),
        }
    }

    /// Whether `path` addresses a known leaf or a prefix of one.
    ///
    /// Ancestors are accepted because whole descriptors may be written as a
    /// single value (e.g. `pages.home.background`).
    #[must_use]
    pub fn is_valid(&self, path: String) -> bool {
        if self.paths.contains(&path) {
            return true;
        }
        self.paths.iter().any(|leaf| {
            leaf.len() > path.len()
                && leaf.starts_with(&path)
                && leaf.as_bytes()[path.len()] == b'.'
        })
    }

    /// All leaf paths known to this validator, in sorted order.
    #[must_use]
    pub fn key_paths(&self) -> Vec<String> {
        self.paths.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shape_contains_reserved_keys() {
        let paths = collect_key_paths(&default_settings_shape());
        assert!(paths.contains(CUSTOM_MEDIA_KEY));
        assert!(paths.contains(POSITIONS_KEY));
        assert!(paths.contains(SELECTED_MEDIA_ID_KEY));
        assert!(paths.contains(SHUFFLE_IMAGES_KEY));
        assert!(paths.contains("pages.home.background.mediaId"));
    }

    #[test]
    fn test_validator_accepts_leaves_and_ancestors() {
        let validator = KeyPathValidator::with_default_shape();
        assert!(validator.is_valid("homeBannerMediaId".to_string()));
        assert!(validator.is_valid("pages.home.background.opacity".to_string()));
        assert!(validator.is_valid("pages.home.background".to_string()));
        assert!(validator.is_valid("pages".to_string()));
    }

    #[test]
    fn test_validator_rejects_unknown_and_partial_segments() {
        let validator = KeyPathValidator::with_default_shape();
        assert!(!validator.is_valid("homeBanner".to_string()));
        assert!(!validator.is_valid("pages.home.foreground".to_string()));
        assert!(!validator.is_valid("nonsense".to_string()));
    }

    #[test]
    fn test_dynamic_map_counts_as_leaf() {
        let validator = KeyPathValidator::with_default_shape();
        assert!(validator.is_valid(POSITIONS_KEY.to_string()));
    }

    #[test]
    fn test_new_rejects_non_object_shape() {
        assert!(KeyPathValidator::new("[1, 2]".to_string()).is_err());
        assert!(KeyPathValidator::new("not json".to_string()).is_err());
    }
}
