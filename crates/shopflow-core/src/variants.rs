//! Cartesian expansion of a canonical [`Product`] into its sellable
//! variants, with price and SKU resolution.
//!
//! Enumeration order is load-bearing for reproducible output: the first
//! attribute's values vary slowest, the last attribute's fastest, exactly
//! like nested loops in attribute order.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::product::{AttrValue, Product};

/// Placeholder option label for malformed or missing value names.
pub const DEFAULT_OPTION: &str = "Default";

/// One concrete combination of one value per option, with resolved price
/// and SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    /// Decimal string with exactly two fractional digits.
    pub price: String,
    /// Dash-joined SKUs of the contributing values; absent when none of
    /// them carries a SKU.
    pub sku: Option<String>,
    /// One value name per attribute, in attribute order.
    pub options: Vec<String>,
}

/// The full option/variant matrix for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expansion {
    /// Option names, in attribute order.
    pub options: Vec<String>,
    pub variants: Vec<Variant>,
}

/// Expands `product` into its full variant matrix.
///
/// - No attributes: exactly one variant with an empty combination.
/// - Some attribute has no values: exactly one synthesized default variant
///   with the product-level price and a `"Default"` label per attribute.
/// - Otherwise: `∏ kᵢ` variants in nested-loop order.
#[must_use]
pub fn expand(product: &Product) -> Expansion {
    let options: Vec<String> = product
        .attributes
        .iter()
        .map(|a| a.name.clone())
        .collect();

    let base_price = product
        .price
        .as_deref()
        .and_then(parse_price)
        .unwrap_or(Decimal::ZERO);

    if product.attributes.is_empty() {
        return Expansion {
            options,
            variants: vec![Variant {
                price: format_price(base_price),
                sku: None,
                options: Vec::new(),
            }],
        };
    }

    let mut variants = Vec::new();
    let mut combination: Vec<&AttrValue> = Vec::with_capacity(product.attributes.len());
    build_combinations(product, base_price, 0, &mut combination, &mut variants);

    if variants.is_empty() {
        // Some value list was empty; the cartesian product collapsed.
        variants.push(Variant {
            price: format_price(base_price),
            sku: None,
            options: vec![DEFAULT_OPTION.to_owned(); product.attributes.len()],
        });
    }

    Expansion { options, variants }
}

fn build_combinations<'p>(
    product: &'p Product,
    base_price: Decimal,
    depth: usize,
    combination: &mut Vec<&'p AttrValue>,
    out: &mut Vec<Variant>,
) {
    if depth == product.attributes.len() {
        out.push(resolve_variant(combination, base_price));
        return;
    }
    for value in &product.attributes[depth].values {
        combination.push(value);
        build_combinations(product, base_price, depth + 1, combination, out);
        combination.pop();
    }
}

/// Resolves one combination into a [`Variant`].
///
/// Price is the maximum of each contributing value's own price, falling
/// back per value to the product-level price. When two attributes both
/// carry overrides (say color and size), the higher one wins — an option
/// may represent a premium variant.
fn resolve_variant(combination: &[&AttrValue], base_price: Decimal) -> Variant {
    let price = combination
        .iter()
        .map(|v| v.price.as_deref().and_then(parse_price).unwrap_or(base_price))
        .max()
        .unwrap_or(base_price);

    let skus: Vec<&str> = combination
        .iter()
        .filter_map(|v| v.sku.as_deref())
        .filter(|s| !s.is_empty())
        .collect();
    let sku = if skus.is_empty() {
        None
    } else {
        Some(skus.join("-"))
    };

    let options = combination
        .iter()
        .map(|v| {
            if v.name.is_empty() {
                DEFAULT_OPTION.to_owned()
            } else {
                v.name.clone()
            }
        })
        .collect();

    Variant {
        price: format_price(price),
        sku,
        options,
    }
}

fn parse_price(s: &str) -> Option<Decimal> {
    Decimal::from_str(s.trim()).ok()
}

/// Formats to exactly two fractional digits, clamping negatives to zero
/// (every variant must resolve to a non-negative price).
fn format_price(price: Decimal) -> String {
    format!("{:.2}", price.max(Decimal::ZERO))
}
