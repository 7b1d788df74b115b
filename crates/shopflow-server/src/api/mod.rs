mod billing;
mod oauth;
mod orders;
mod products;
mod tracking;
mod webhooks;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shopflow_core::AppConfig;
use shopflow_shopify::{ShopifyClient, ShopifyError};
use shopflow_tracking::TrackingClient;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{request_id, RequestId};
use crate::token_store::TokenStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<dyn TokenStore>,
    pub shopify: Arc<ShopifyClient>,
    pub tracking: Arc<TrackingClient>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Maps client errors from the pass-through endpoints (orders, billing)
/// onto the response envelope. The sync endpoint has its own bespoke
/// error bodies and does not use this.
pub(super) fn map_shopify_error(request_id: String, error: &ShopifyError) -> ApiError {
    match error {
        ShopifyError::UserErrors(errors) => {
            let detail = errors
                .iter()
                .map(|e| e.message.clone())
                .collect::<Vec<_>>()
                .join("; ");
            ApiError::new(request_id, "validation_error", detail)
        }
        other => {
            tracing::error!(error = %other, "Shopify request failed");
            ApiError::new(request_id, "internal_error", "upstream request failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/auth", get(oauth::begin_install))
        .route("/auth/callback", get(oauth::finish_install))
        .route("/webhooks/app-uninstalled", post(webhooks::app_uninstalled))
        .route("/api/v1/products/sync", post(products::sync_product))
        .route("/api/v1/orders", get(orders::list_orders))
        .route("/api/v1/orders/{order_id}", get(orders::get_order))
        .route("/api/v1/tracking/{code}", get(tracking::track_shipment))
        .route("/api/v1/billing/subscribe", post(billing::subscribe))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: HealthData { status: "ok" },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use shopflow_core::{AppConfig, Environment};
    use shopflow_shopify::ShopifyClient;
    use shopflow_tracking::TrackingClient;

    use crate::token_store::{InMemoryTokenStore, TokenStore};

    use super::AppState;

    pub(crate) const TEST_SHOP: &str = "demo.myshopify.com";
    pub(crate) const TEST_TOKEN: &str = "shpat_test_token";
    pub(crate) const TEST_SECRET: &str = "shpss_test_secret";

    pub(crate) fn test_config(upstream: &str) -> AppConfig {
        AppConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse::<SocketAddr>().expect("bind addr"),
            log_level: "debug".to_owned(),
            app_url: "http://localhost:3000".to_owned(),
            shopify_api_key: "test-key".to_owned(),
            shopify_api_secret: TEST_SECRET.to_owned(),
            shopify_scopes: "write_products,read_orders".to_owned(),
            shopify_api_version: "2024-07".to_owned(),
            media_base_url: "https://cdn.example.com".to_owned(),
            media_root_prefix: "/media/".to_owned(),
            carrier_base_url: upstream.to_owned(),
            carrier_api_key: None,
            client_timeout_secs: 10,
            client_max_retries: 0,
            client_retry_backoff_base_ms: 0,
        }
    }

    /// Builds app state pointed at a mock upstream, with one shop's token
    /// already installed. Returns the store handle so tests can inspect it.
    pub(crate) fn test_state(upstream: &str) -> (AppState, Arc<InMemoryTokenStore>) {
        let tokens = Arc::new(InMemoryTokenStore::new());
        tokens.set(TEST_SHOP, TEST_TOKEN.to_owned());

        let shopify = ShopifyClient::with_base_url("test-key", TEST_SECRET, "2024-07", upstream)
            .expect("shopify client");
        let tracking = TrackingClient::new(upstream, None, 10).expect("tracking client");

        let state = AppState {
            config: Arc::new(test_config(upstream)),
            tokens: Arc::clone(&tokens) as Arc<dyn TokenStore>,
            shopify: Arc::new(shopify),
            tracking: Arc::new(tracking),
        };
        (state, tokens)
    }
}
