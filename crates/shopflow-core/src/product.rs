//! Canonical product model shared by the whole pipeline.
//!
//! Every upstream payload shape (see [`crate::normalize`]) converges on
//! [`Product`] before variant expansion, tag resolution, media resolution,
//! or serialization happens. A `Product` lives for exactly one request:
//! built from raw JSON, expanded, serialized, discarded.

use serde::Serialize;

/// A pointer to an externally hosted image. Never the image bytes.
///
/// Upstream sends either `src` or `url` (older catalogs); `src` wins when
/// both are present. Values may be absolute URLs or paths relative to the
/// configured media base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaRef {
    pub src: Option<String>,
    pub url: Option<String>,
    pub is_featured: bool,
}

impl MediaRef {
    /// Returns the best-available URL field: `src`, falling back to `url`.
    /// Empty strings count as absent.
    #[must_use]
    pub fn best_url(&self) -> Option<&str> {
        self.src
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.url.as_deref().filter(|s| !s.is_empty()))
    }
}

/// One point along an option's axis (e.g. `"Red"` for `"Color"`), carrying
/// its own optional price/SKU/image overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttrValue {
    /// Display name. Empty means the upstream value was malformed; the
    /// expander substitutes the `"Default"` placeholder.
    pub name: String,
    /// Decimal price string override (e.g. `"19.99"`).
    pub price: Option<String>,
    pub compare_price: Option<String>,
    pub sku: Option<String>,
    pub images: Vec<MediaRef>,
}

/// A named axis of product variation (e.g. `"Color"`) with its ordered
/// values. Names must be unique across a product's attributes; duplicates
/// are a caller error and are not validated here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub values: Vec<AttrValue>,
}

/// The canonical product every input shape normalizes into.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Product {
    /// Opaque upstream identifier, carried through for correlation only.
    pub id: Option<String>,
    pub title: String,
    /// Rich-text/HTML description, passed through verbatim (escaped at
    /// serialization time, never parsed).
    pub description: Option<String>,
    pub attributes: Vec<Attribute>,
    /// Top-level media references, in upstream order.
    pub media: Vec<MediaRef>,
    /// Free-text tags, pre-deduplication.
    pub tags: Vec<String>,
    /// Inventory count; passed through, not used in variant math.
    pub stock: Option<i64>,
    pub is_active: Option<bool>,
    /// Product-level decimal price string, the fallback when a value has no
    /// usable price of its own.
    pub price: Option<String>,
    /// Opaque pass-through echoed back to the caller.
    pub price_range: Option<serde_json::Value>,
}

impl Product {
    /// Maps `is_active` onto the target platform's status vocabulary:
    /// `Some(true)` is active/published, anything else is a draft.
    #[must_use]
    pub fn status(&self) -> ProductStatus {
        if self.is_active == Some(true) {
            ProductStatus::Active
        } else {
            ProductStatus::Draft
        }
    }
}

/// Publication status in the target platform's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProductStatus {
    Active,
    Draft,
}

impl ProductStatus {
    /// The enum literal expected by the admin API. Constrained character
    /// set; safe to interpolate unescaped.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::Active => "ACTIVE",
            ProductStatus::Draft => "DRAFT",
        }
    }
}
