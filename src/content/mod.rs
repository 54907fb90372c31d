//! Shapes shared by every section: the response envelope, media and links.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `{ data, meta }` wrapper around every backend response.
///
/// `meta` (pagination, locale info, ...) is carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl<T> Envelope<T> {
    /// Wraps `data` with empty metadata.
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: Map::new(),
        }
    }

    /// Discards the metadata.
    pub fn into_data(self) -> T {
        self.data
    }
}

/// An uploaded file, usually an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: u64,
    pub document_id: String,
    pub url: String,
    pub alternative_text: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub formats: Option<MediaFormats>,
    /// Fields this type does not name, kept for a lossless round trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Resized variants generated by the backend for raster images.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFormats {
    pub thumbnail: Option<MediaFormat>,
    pub small: Option<MediaFormat>,
    pub medium: Option<MediaFormat>,
    pub large: Option<MediaFormat>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFormat {
    pub url: String,
    pub width: u32,
    pub height: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Media {
    /// Absolute URL of the original file.
    ///
    /// The backend returns upload paths relative to the media host; absolute
    /// URLs (CDN-backed uploads) are returned unchanged.
    pub fn resolve_url(&self, image_base_url: &str) -> String {
        resolve(image_base_url, &self.url)
    }

    /// The smallest variant at least `min_width` pixels wide, falling back to
    /// the original.
    pub fn variant_for_width(&self, min_width: u32) -> &str {
        let Some(formats) = &self.formats else {
            return &self.url;
        };
        [
            &formats.thumbnail,
            &formats.small,
            &formats.medium,
            &formats.large,
        ]
        .into_iter()
        .flatten()
        .filter(|f| f.width >= min_width)
        .min_by_key(|f| f.width)
        .map_or(self.url.as_str(), |f| f.url.as_str())
    }
}

/// A navigation target rendered as a button or anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: u64,
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub is_external: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub(crate) fn resolve(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//") {
        return path.to_owned();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
