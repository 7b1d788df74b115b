//! Normalization of loosely-structured upstream product payloads into the
//! canonical [`Product`].
//!
//! ## Observed upstream shapes
//!
//! The catalog source sends products in three shapes, detected once as
//! [`RawShape`] and never re-tested downstream:
//!
//! - **Nested sample**: `{ "sample": { "sample_attributes": [...],
//!   "sample_media": [...] }, ... }` — catalog-sourced products. Attribute
//!   values carry `price`/`compare_price`/`sku`/`images`; tags are
//!   synthesized from the marker tag, caller tags, store/manufacturer
//!   names, attribute names, and the display name.
//! - **Flat attributes**: `{ "attributes": [...] }` — seller-authored
//!   products. Value lists mix bare strings with full objects; both are
//!   accepted and made uniform here so the expander never re-checks.
//! - **Plain**: anything else — scalar fields only.
//!
//! Normalization is total: well-formed JSON never fails, missing fields
//! degrade to safe defaults.

use serde_json::Value;

use crate::product::{AttrValue, Attribute, MediaRef, Product};
use crate::tags::dedup_tags;

/// Marker tag attached to every catalog-sourced (nested-sample) product.
pub const CATALOG_MARKER_TAG: &str = "catalog-import";

/// The three incoming payload shapes, checked in declaration order —
/// first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawShape {
    NestedSample,
    FlatAttributes,
    Plain,
}

/// Detects which of the three shapes `raw` is in.
#[must_use]
pub fn detect_shape(raw: &Value) -> RawShape {
    if raw
        .get("sample")
        .and_then(|s| s.get("sample_attributes"))
        .is_some_and(Value::is_array)
    {
        RawShape::NestedSample
    } else if raw.get("attributes").is_some_and(Value::is_array) {
        RawShape::FlatAttributes
    } else {
        RawShape::Plain
    }
}

/// Converts an arbitrary upstream product payload into one canonical
/// [`Product`]. Total function: never fails on well-formed JSON.
#[must_use]
pub fn normalize(raw: &Value) -> Product {
    match detect_shape(raw) {
        RawShape::NestedSample => normalize_nested(raw),
        RawShape::FlatAttributes => normalize_flat(raw),
        RawShape::Plain => normalize_plain(raw),
    }
}

fn normalize_nested(raw: &Value) -> Product {
    let sample = &raw["sample"];

    let attributes: Vec<Attribute> = sample["sample_attributes"]
        .as_array()
        .map(|items| items.iter().map(parse_attribute).collect())
        .unwrap_or_default();

    // Top-level sample media first, then every attribute value image in
    // attribute/value order.
    let mut media: Vec<MediaRef> = sample["sample_media"]
        .as_array()
        .map(|items| items.iter().map(parse_media_ref).collect())
        .unwrap_or_default();
    for attribute in &attributes {
        for value in &attribute.values {
            media.extend(value.images.iter().cloned());
        }
    }

    let title = string_field(raw, "name")
        .or_else(|| string_field(sample, "title"))
        .unwrap_or_default();

    let tags = synthesize_tags(raw, &attributes);

    Product {
        id: id_field(raw).or_else(|| id_field(sample)),
        title,
        description: string_field(raw, "description")
            .or_else(|| string_field(sample, "description")),
        attributes,
        media,
        tags,
        stock: raw["stock"].as_i64().or_else(|| sample["stock"].as_i64()),
        is_active: raw["is_active"].as_bool(),
        price: decimal_field(raw, "price").or_else(|| decimal_field(sample, "price")),
        price_range: raw.get("price_range").filter(|v| !v.is_null()).cloned(),
    }
}

fn normalize_flat(raw: &Value) -> Product {
    let attributes = raw["attributes"]
        .as_array()
        .map(|items| items.iter().map(parse_attribute).collect())
        .unwrap_or_default();

    Product {
        attributes,
        tags: dedup_tags(parse_tags(raw.get("tags"))),
        ..scalar_fields(raw)
    }
}

fn normalize_plain(raw: &Value) -> Product {
    Product {
        tags: dedup_tags(parse_tags(raw.get("tags"))),
        ..scalar_fields(raw)
    }
}

/// Scalar fields common to the flat and plain shapes, plus top-level media.
fn scalar_fields(raw: &Value) -> Product {
    Product {
        id: id_field(raw),
        title: string_field(raw, "name")
            .or_else(|| string_field(raw, "title"))
            .unwrap_or_default(),
        description: string_field(raw, "description"),
        attributes: Vec::new(),
        media: raw["media"]
            .as_array()
            .map(|items| items.iter().map(parse_media_ref).collect())
            .unwrap_or_default(),
        tags: Vec::new(),
        stock: raw["stock"].as_i64(),
        is_active: raw["is_active"].as_bool(),
        price: decimal_field(raw, "price"),
        price_range: raw.get("price_range").filter(|v| !v.is_null()).cloned(),
    }
}

/// Tag assembly for the nested-sample shape, in the fixed source order,
/// then order-preserving dedup.
fn synthesize_tags(raw: &Value, attributes: &[Attribute]) -> Vec<String> {
    let mut tags = vec![CATALOG_MARKER_TAG.to_owned()];

    tags.extend(parse_tags(raw.get("tags")));

    if let Some(store) = string_field(&raw["store"], "name") {
        tags.push(store);
    }

    if let Some(manufacturer) = raw.get("manufacturer") {
        let first = string_field(manufacturer, "first_name").unwrap_or_default();
        let last = string_field(manufacturer, "last_name").unwrap_or_default();
        let full = format!("{first} {last}").trim().to_owned();
        if !full.is_empty() {
            tags.push(full);
        }
    }

    for attribute in attributes {
        tags.push(attribute.name.clone());
    }

    if let Some(name) = string_field(raw, "name") {
        tags.push(name);
    }

    dedup_tags(tags)
}

/// Accepts tags as a scalar string or an array of strings; both occur in
/// live payloads.
fn parse_tags(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(ToOwned::to_owned))
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_attribute(item: &Value) -> Attribute {
    let values = item["values"]
        .as_array()
        .map(|vs| vs.iter().map(parse_attr_value).collect())
        .unwrap_or_default();

    Attribute {
        name: string_field(item, "name").unwrap_or_default(),
        values,
    }
}

/// Bare-string values become `{name: value}`; object values pass through
/// with their overrides. Anything else degrades to an empty name, which
/// the expander renders as the `"Default"` placeholder.
fn parse_attr_value(value: &Value) -> AttrValue {
    match value {
        Value::String(s) => AttrValue {
            name: s.clone(),
            ..AttrValue::default()
        },
        Value::Object(_) => AttrValue {
            name: string_field(value, "name").unwrap_or_default(),
            price: decimal_field(value, "price"),
            compare_price: decimal_field(value, "compare_price"),
            sku: string_field(value, "sku"),
            images: value["images"]
                .as_array()
                .map(|items| items.iter().map(parse_media_ref).collect())
                .unwrap_or_default(),
        },
        _ => AttrValue::default(),
    }
}

/// Media references arrive as bare strings or `{src|url, is_featured}`
/// objects.
fn parse_media_ref(value: &Value) -> MediaRef {
    match value {
        Value::String(s) => MediaRef {
            src: Some(s.clone()),
            url: None,
            is_featured: false,
        },
        Value::Object(_) => MediaRef {
            src: string_field(value, "src"),
            url: string_field(value, "url"),
            is_featured: value["is_featured"].as_bool().unwrap_or(false),
        },
        _ => MediaRef::default(),
    }
}

/// Non-empty string field, or `None`.
fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

/// Price-like field: accepts a decimal string or a bare JSON number.
fn decimal_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Identifier field: opaque, accepts string or number, never interpreted.
fn id_field(value: &Value) -> Option<String> {
    match value.get("id") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
