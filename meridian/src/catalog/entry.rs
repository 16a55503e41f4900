//! Catalog entry types and stable media identifiers.

use serde::{Deserialize, Serialize};

/// Broad classification of a media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum MediaKind {
    /// Still image.
    Image,
    /// Video clip.
    Video,
}

/// A media file shipped with the application.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct BuiltinMedia {
    /// Bundled file name, unique within the builtin set.
    pub file_name: String,
    /// Human-readable name shown in pickers.
    pub display_name: String,
    /// Image or video.
    pub kind: MediaKind,
}

/// A media file imported by the user.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct CustomMedia {
    /// Stable random identifier, assigned once at import time.
    pub id: String,
    /// Absolute path or URL of the media file.
    pub path: String,
    /// Image or video, derived from the path extension.
    pub kind: MediaKind,
}

/// One addressable entry of the home-banner catalog.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum CatalogEntry {
    /// An application-bundled media file.
    Builtin {
        /// The builtin media.
        media: BuiltinMedia,
    },
    /// A user-imported media file.
    Custom {
        /// The custom media.
        media: CustomMedia,
    },
}

impl CatalogEntry {
    /// The key under which positions and selection refer to this entry:
    /// the stable id for custom media, the file name for builtins.
    #[must_use]
    pub fn position_key(&self) -> &str {
        match self {
            Self::Builtin { media } => &media.file_name,
            Self::Custom { media } => &media.id,
        }
    }

    /// The media kind of this entry.
    #[must_use]
    pub const fn kind(&self) -> MediaKind {
        match self {
            Self::Builtin { media } => media.kind,
            Self::Custom { media } => media.kind,
        }
    }
}

/// Persisted form of a custom media record. The kind is re-derived from the
/// path on load, so only the path and id are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredCustomMedia {
    pub path: String,
    pub id: String,
}

impl From<&CustomMedia> for StoredCustomMedia {
    fn from(media: &CustomMedia) -> Self {
        Self {
            path: media.path.clone(),
            id: media.id.clone(),
        }
    }
}

impl From<StoredCustomMedia> for CustomMedia {
    fn from(stored: StoredCustomMedia) -> Self {
        let kind = media_kind_for_path(&stored.path);
        Self {
            id: stored.id,
            path: stored.path,
            kind,
        }
    }
}

/// Generates a fresh 8-character lowercase hex media id.
///
/// Ids containing only digits are rejected and regenerated, so an id can
/// never be mistaken for a legacy numeric catalog index.
#[must_use]
pub(crate) fn new_media_id() -> String {
    loop {
        let id = hex::encode(rand::random::<[u8; 4]>());
        if id.bytes().any(|b| b.is_ascii_alphabetic()) {
            return id;
        }
    }
}

const VIDEO_EXTENSIONS: [&str; 7] = ["mp4", "webm", "mov", "mkv", "avi", "m4v", "ogv"];

/// Classifies a path as image or video by its extension. Unknown and
/// missing extensions default to image.
#[must_use]
pub fn media_kind_for_path(path: &str) -> MediaKind {
    let extension = path
        .rsplit('.')
        .next()
        .filter(|ext| !ext.contains('/') && !ext.contains('\\'))
        .map(str::to_ascii_lowercase);
    match extension {
        Some(ext) if VIDEO_EXTENSIONS.contains(&ext.as_str()) => MediaKind::Video,
        _ => MediaKind::Image,
    }
}
