//! Resolution of raw media references into absolute, fetchable URLs.
//!
//! Resolution is a pure string join against the configured media base —
//! never a network check, never a decode of the image bytes.

use serde::Serialize;

use crate::product::Product;

/// Media kind accepted by the admin API. Fixed constant; safe to
/// interpolate unescaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MediaContentType {
    Image,
}

impl MediaContentType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MediaContentType::Image => "IMAGE",
        }
    }
}

/// An absolute media URL ready for the attach-media mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMedia {
    pub content_type: MediaContentType,
    pub url: String,
}

/// Resolves every media reference on `product` into an absolute URL.
///
/// Three-way branch, in order:
/// 1. already scheme-qualified — used as-is;
/// 2. starts with the media-root prefix (e.g. `/media/`) — concatenated
///    directly onto the base URL;
/// 3. anything else — joined with exactly one separating slash.
///
/// References with no usable URL field are skipped.
#[must_use]
pub fn resolve_media(product: &Product, base_url: &str, media_root: &str) -> Vec<ResolvedMedia> {
    let base = base_url.trim_end_matches('/');
    product
        .media
        .iter()
        .filter_map(|media| media.best_url())
        .map(|raw| {
            let url = if raw.contains("://") {
                raw.to_owned()
            } else if raw.starts_with(media_root) {
                format!("{base}{raw}")
            } else {
                format!("{base}/{}", raw.trim_start_matches('/'))
            };
            ResolvedMedia {
                content_type: MediaContentType::Image,
                url,
            }
        })
        .collect()
}
