//! HTTP client for the Shopify Admin GraphQL API.
//!
//! Wraps `reqwest` with per-shop endpoint construction, access-token
//! headers, retry on transient failures, and interpretation of the
//! GraphQL envelope: `{"data": {...}}` on success, a top-level `errors`
//! array on transport-level failure, and a `userErrors` array inside
//! every mutation payload for field-level validation errors.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;

use shopflow_core::media::ResolvedMedia;
use shopflow_core::product::Product;
use shopflow_core::variants::Expansion;
use shopflow_core::AppConfig;

use crate::error::ShopifyError;
use crate::mutations;
use crate::retry::retry_with_backoff;
use crate::types::{
    AccessToken, CreatedProduct, CreatedVariant, OrderSummary, SubscriptionPlan,
    SubscriptionResult, UserError,
};

/// Client for the Shopify Admin GraphQL API.
///
/// Endpoints are per-shop (`https://{shop}/admin/api/{version}/graphql.json`);
/// [`ShopifyClient::with_base_url`] redirects every shop at a mock server
/// in tests.
pub struct ShopifyClient {
    client: Client,
    api_key: String,
    api_secret: String,
    api_version: String,
    max_retries: u32,
    backoff_base_ms: u64,
    base_url: Option<Url>,
}

impl ShopifyClient {
    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, ShopifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.client_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("shopflow/0.1 (catalog-sync)")
            .build()?;

        Ok(Self {
            client,
            api_key: config.shopify_api_key.clone(),
            api_secret: config.shopify_api_secret.clone(),
            api_version: config.shopify_api_version.clone(),
            max_retries: config.client_max_retries,
            backoff_base_ms: config.client_retry_backoff_base_ms,
            base_url: None,
        })
    }

    /// Creates a client whose requests all go to `base_url` regardless of
    /// shop domain (for testing with wiremock). Retries are disabled so
    /// failure tests stay fast.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ShopifyError::InvalidUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        api_secret: &str,
        api_version: &str,
        base_url: &str,
    ) -> Result<Self, ShopifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ShopifyError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            api_secret: api_secret.to_owned(),
            api_version: api_version.to_owned(),
            max_retries: 0,
            backoff_base_ms: 0,
            base_url: Some(base_url),
        })
    }

    /// Creates the product, returning the created node or the mutation's
    /// `userErrors` verbatim.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::UserErrors`] — field-level validation failures;
    ///   the caller must not proceed to the media step.
    /// - [`ShopifyError::ApiError`] / [`ShopifyError::Http`] — transport
    ///   failures.
    /// - [`ShopifyError::Deserialize`] — unexpected response shape.
    pub async fn create_product(
        &self,
        shop: &str,
        token: &str,
        product: &Product,
        expansion: &Expansion,
        tags: &[String],
    ) -> Result<CreatedProduct, ShopifyError> {
        let query = mutations::product_create_mutation(product, expansion, tags);
        let body = self.execute(shop, token, &query).await?;

        let payload: ProductCreatePayload =
            deserialize_payload(&body, "productCreate", "productCreate")?;
        if !payload.user_errors.is_empty() {
            return Err(ShopifyError::UserErrors(payload.user_errors));
        }
        let node = payload.product.ok_or_else(|| {
            ShopifyError::ApiError("productCreate returned neither product nor userErrors".into())
        })?;

        Ok(CreatedProduct {
            id: node.id,
            title: node.title,
            status: node.status,
            tags: node.tags,
            variants: node
                .variants
                .edges
                .into_iter()
                .map(|edge| CreatedVariant {
                    id: edge.node.id,
                    title: edge.node.title,
                    price: edge.node.price,
                    sku: edge.node.sku.filter(|s| !s.is_empty()),
                })
                .collect(),
        })
    }

    /// Attaches resolved media to an already-created product. Returns
    /// `Ok(None)` when there is nothing to attach.
    ///
    /// Callers treat failures here as non-fatal: product creation already
    /// succeeded and images are best-effort.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ShopifyClient::create_product`], with
    /// `mediaUserErrors` surfaced as [`ShopifyError::UserErrors`].
    pub async fn attach_media(
        &self,
        shop: &str,
        token: &str,
        product_id: &str,
        media: &[ResolvedMedia],
    ) -> Result<Option<Value>, ShopifyError> {
        let Some(query) = mutations::product_media_mutation(product_id, media) else {
            return Ok(None);
        };
        let body = self.execute(shop, token, &query).await?;

        let payload: MediaCreatePayload =
            deserialize_payload(&body, "productCreateMedia", "productCreateMedia")?;
        if !payload.media_user_errors.is_empty() {
            return Err(ShopifyError::UserErrors(payload.media_user_errors));
        }
        Ok(Some(payload.media))
    }

    /// Fetches the most recent `first` orders. Read-only passthrough.
    ///
    /// # Errors
    ///
    /// [`ShopifyError::ApiError`] / [`ShopifyError::Http`] /
    /// [`ShopifyError::Deserialize`] on failure.
    pub async fn list_orders(
        &self,
        shop: &str,
        token: &str,
        first: usize,
    ) -> Result<Vec<OrderSummary>, ShopifyError> {
        let query = mutations::orders_query(first);
        let body = self.execute(shop, token, &query).await?;

        let payload: OrdersPayload = deserialize_payload(&body, "orders", "orders")?;
        Ok(payload
            .edges
            .into_iter()
            .map(|edge| edge.node.into())
            .collect())
    }

    /// Fetches one order by admin GID; `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// [`ShopifyError::ApiError`] / [`ShopifyError::Http`] /
    /// [`ShopifyError::Deserialize`] on failure.
    pub async fn get_order(
        &self,
        shop: &str,
        token: &str,
        order_id: &str,
    ) -> Result<Option<OrderSummary>, ShopifyError> {
        let query = mutations::order_query(order_id);
        let body = self.execute(shop, token, &query).await?;

        let node = &body["data"]["order"];
        if node.is_null() {
            return Ok(None);
        }
        let node: OrderNode =
            serde_json::from_value(node.clone()).map_err(|e| ShopifyError::Deserialize {
                context: format!("order(id={order_id})"),
                source: e,
            })?;
        Ok(Some(node.into()))
    }

    /// Creates a recurring app subscription. Pass-through mutation.
    ///
    /// # Errors
    ///
    /// [`ShopifyError::UserErrors`] when the platform rejects the plan;
    /// transport errors otherwise.
    pub async fn create_subscription(
        &self,
        shop: &str,
        token: &str,
        plan: &SubscriptionPlan,
    ) -> Result<SubscriptionResult, ShopifyError> {
        let query = mutations::subscription_create_mutation(plan);
        let body = self.execute(shop, token, &query).await?;

        let payload: SubscriptionPayload =
            deserialize_payload(&body, "appSubscriptionCreate", "appSubscriptionCreate")?;
        if !payload.user_errors.is_empty() {
            return Err(ShopifyError::UserErrors(payload.user_errors));
        }
        match (payload.confirmation_url, payload.app_subscription) {
            (Some(confirmation_url), Some(sub)) => Ok(SubscriptionResult {
                id: sub.id,
                status: sub.status,
                confirmation_url,
            }),
            _ => Err(ShopifyError::ApiError(
                "appSubscriptionCreate returned no subscription".into(),
            )),
        }
    }

    /// Exchanges an OAuth authorization code for a permanent access token.
    ///
    /// # Errors
    ///
    /// [`ShopifyError::Http`] on network failure or non-2xx status,
    /// [`ShopifyError::Deserialize`] on an unexpected body.
    pub async fn exchange_code(&self, shop: &str, code: &str) -> Result<AccessToken, ShopifyError> {
        let url = self.token_endpoint(shop)?;
        let response = self
            .client
            .post(url.clone())
            .json(&serde_json::json!({
                "client_id": self.api_key,
                "client_secret": self.api_secret,
                "code": code,
            }))
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ShopifyError::Deserialize {
            context: format!("access_token exchange for {shop}"),
            source: e,
        })
    }

    /// Sends one GraphQL document and returns the full response body after
    /// rejecting top-level `errors`. Transient failures are retried.
    async fn execute(&self, shop: &str, token: &str, query: &str) -> Result<Value, ShopifyError> {
        let url = self.graphql_endpoint(shop)?;
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.execute_once(url.clone(), token, query)
        })
        .await
    }

    async fn execute_once(
        &self,
        url: Url,
        token: &str,
        query: &str,
    ) -> Result<Value, ShopifyError> {
        let response = self
            .client
            .post(url.clone())
            .header("X-Shopify-Access-Token", token)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        let body: Value = serde_json::from_str(&body).map_err(|e| ShopifyError::Deserialize {
            context: url.to_string(),
            source: e,
        })?;
        Self::check_graphql_errors(&body)?;
        Ok(body)
    }

    /// Rejects responses carrying a top-level `errors` array (bad query,
    /// throttling, invalid token).
    fn check_graphql_errors(body: &Value) -> Result<(), ShopifyError> {
        let Some(errors) = body.get("errors").and_then(Value::as_array) else {
            return Ok(());
        };
        if errors.is_empty() {
            return Ok(());
        }
        let message = errors
            .iter()
            .map(|e| {
                e.get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
            })
            .collect::<Vec<_>>()
            .join("; ");
        Err(ShopifyError::ApiError(message))
    }

    fn graphql_endpoint(&self, shop: &str) -> Result<Url, ShopifyError> {
        let path = format!("admin/api/{}/graphql.json", self.api_version);
        self.shop_url(shop, &path)
    }

    fn token_endpoint(&self, shop: &str) -> Result<Url, ShopifyError> {
        self.shop_url(shop, "admin/oauth/access_token")
    }

    fn shop_url(&self, shop: &str, path: &str) -> Result<Url, ShopifyError> {
        let base = match &self.base_url {
            Some(base) => base.clone(),
            None => Url::parse(&format!("https://{shop}/")).map_err(|e| {
                ShopifyError::InvalidUrl {
                    url: shop.to_owned(),
                    reason: e.to_string(),
                }
            })?,
        };
        base.join(path).map_err(|e| ShopifyError::InvalidUrl {
            url: format!("{base}{path}"),
            reason: e.to_string(),
        })
    }
}

/// Pulls `data.{key}` out of the response body and deserializes it,
/// attaching `context` to any shape mismatch.
fn deserialize_payload<T: serde::de::DeserializeOwned>(
    body: &Value,
    key: &str,
    context: &str,
) -> Result<T, ShopifyError> {
    serde_json::from_value(body["data"][key].clone()).map_err(|e| ShopifyError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Private response shapes (GraphQL envelope, camelCase)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    #[serde(default)]
    edges: Vec<Edge<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

#[derive(Debug, Deserialize)]
struct ProductCreatePayload {
    #[serde(default)]
    product: Option<ProductNode>,
    #[serde(default, rename = "userErrors")]
    user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
struct ProductNode {
    id: String,
    title: String,
    status: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    variants: Connection<VariantNode>,
}

#[derive(Debug, Default, Deserialize)]
struct VariantNode {
    id: String,
    title: String,
    price: String,
    #[serde(default)]
    sku: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MediaCreatePayload {
    #[serde(default)]
    media: Value,
    #[serde(default, rename = "mediaUserErrors")]
    media_user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
struct OrdersPayload {
    #[serde(default)]
    edges: Vec<Edge<OrderNode>>,
}

#[derive(Debug, Deserialize)]
struct OrderNode {
    id: String,
    name: String,
    #[serde(default, rename = "createdAt")]
    created_at: Option<String>,
    #[serde(default, rename = "displayFulfillmentStatus")]
    fulfillment_status: Option<String>,
    #[serde(default, rename = "totalPriceSet")]
    total_price_set: Option<PriceSet>,
}

#[derive(Debug, Deserialize)]
struct PriceSet {
    #[serde(rename = "shopMoney")]
    shop_money: Money,
}

#[derive(Debug, Deserialize)]
struct Money {
    amount: String,
}

impl From<OrderNode> for OrderSummary {
    fn from(node: OrderNode) -> Self {
        OrderSummary {
            id: node.id,
            name: node.name,
            created_at: node.created_at,
            fulfillment_status: node.fulfillment_status,
            total_price: node.total_price_set.map(|p| p.shop_money.amount),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SubscriptionPayload {
    #[serde(default, rename = "confirmationUrl")]
    confirmation_url: Option<String>,
    #[serde(default, rename = "appSubscription")]
    app_subscription: Option<SubscriptionNode>,
    #[serde(default, rename = "userErrors")]
    user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionNode {
    id: String,
    status: String,
}
