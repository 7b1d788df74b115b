//! Response types for the Shopify Admin GraphQL API.
//!
//! Every mutation payload carries a `userErrors` array; an empty array
//! means the mutation applied cleanly. Transport-level failures arrive as
//! a top-level `errors` array instead and never reach these types.

use serde::{Deserialize, Serialize};

/// A field-level validation error from a mutation's `userErrors`.
///
/// `field` is a path (e.g. `["input", "title"]`); Shopify sends `null`
/// for errors not tied to one field. Forwarded to callers verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// The product returned by a successful `productCreate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedProduct {
    pub id: String,
    pub title: String,
    pub status: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub variants: Vec<CreatedVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedVariant {
    pub id: String,
    pub title: String,
    pub price: String,
    #[serde(default)]
    pub sku: Option<String>,
}

/// One order row from the read-only orders query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub fulfillment_status: Option<String>,
    #[serde(default)]
    pub total_price: Option<String>,
}

/// Access token issued by the OAuth code exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Recurring billing plan for `appSubscriptionCreate`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubscriptionPlan {
    pub name: String,
    /// Decimal amount string (e.g. `"9.99"`); validated upstream.
    pub price: String,
    pub return_url: String,
    #[serde(default)]
    pub test: bool,
}

/// Outcome of `appSubscriptionCreate`: the merchant must visit
/// `confirmation_url` to approve the charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionResult {
    pub id: String,
    pub status: String,
    pub confirmation_url: String,
}
