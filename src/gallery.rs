// Image handling: size-validated uploads and the landing-page gallery.
//
// Images are opaque here. An upload is either accepted whole (stored inline
// with its media type) or refused for size; no decoding or resizing happens
// anywhere in this crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

const MIB: usize = 1024 * 1024;

/// Upload size limit for player portraits.
pub const PORTRAIT_MAX_BYTES: usize = 2 * MIB;
/// Upload size limit for team banners and gallery photos.
pub const PHOTO_MAX_BYTES: usize = 5 * MIB;

/// What an uploaded image will be used as. Determines the size limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    Portrait,
    TeamBanner,
    GalleryPhoto,
}

impl ImageKind {
    pub fn max_bytes(&self) -> usize {
        match self {
            ImageKind::Portrait => PORTRAIT_MAX_BYTES,
            ImageKind::TeamBanner | ImageKind::GalleryPhoto => PHOTO_MAX_BYTES,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ImageKind::Portrait => "portrait",
            ImageKind::TeamBanner => "team banner",
            ImageKind::GalleryPhoto => "gallery photo",
        }
    }
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("{kind} is too large: {size} bytes exceeds the {limit} byte limit")]
    Oversized {
        kind: &'static str,
        size: usize,
        limit: usize,
    },
}

/// A displayable image reference: an external URL (config seeds) or a
/// validated inline upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageRef {
    Url { url: String },
    Inline {
        /// MIME type reported by the uploader, e.g. "image/jpeg".
        media_type: String,
        #[serde(with = "serde_bytes_vec")]
        data: Vec<u8>,
    },
}

impl ImageRef {
    /// Unique-enough identity for removal by value.
    pub fn matches(&self, other: &ImageRef) -> bool {
        self == other
    }
}

/// JSON-friendly byte encoding: arrays of numbers are what serde_json does
/// by default, but going through a dedicated module keeps the snapshot
/// format explicit.
mod serde_bytes_vec {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        data.serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        Vec::<u8>::deserialize(de)
    }
}

/// Validate an uploaded selection against the limit for its kind and wrap it
/// for storage. The bytes are taken as-is; nothing inspects the content.
pub fn store_image(
    kind: ImageKind,
    media_type: impl Into<String>,
    data: Vec<u8>,
) -> Result<ImageRef, ImageError> {
    let limit = kind.max_bytes();
    if data.len() > limit {
        return Err(ImageError::Oversized {
            kind: kind.label(),
            size: data.len(),
            limit,
        });
    }
    Ok(ImageRef::Inline {
        media_type: media_type.into(),
        data,
    })
}

/// The landing-page photo gallery, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gallery {
    pub images: Vec<ImageRef>,
}

impl Gallery {
    /// Build the gallery from seed URLs (used when no persisted gallery
    /// exists).
    pub fn seeded(urls: &[String]) -> Self {
        Gallery {
            images: urls.iter().map(|u| ImageRef::Url { url: u.clone() }).collect(),
        }
    }

    pub fn add(&mut self, image: ImageRef) {
        info!(total = self.images.len() + 1, "added gallery image");
        self.images.push(image);
    }

    /// Remove by index. Out-of-range indices are a no-op returning false.
    pub fn remove(&mut self, index: usize) -> bool {
        if index < self.images.len() {
            self.images.remove(index);
            info!(index, total = self.images.len(), "removed gallery image");
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
