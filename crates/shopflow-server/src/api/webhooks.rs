//! Platform webhooks. Only app/uninstalled is handled: it revokes the
//! shop's stored token so later sync requests fail closed with a 401.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use shopflow_shopify::oauth::verify_webhook_hmac;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, serde::Serialize)]
struct WebhookAck {
    received: bool,
}

pub(super) async fn app_uninstalled(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get("x-shopify-hmac-sha256")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !verify_webhook_hmac(&body, signature, &state.config.shopify_api_secret) {
        return ApiError::new(req_id.0, "unauthorized", "webhook signature mismatch")
            .into_response();
    }

    let Some(shop) = headers
        .get("x-shopify-shop-domain")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
    else {
        return ApiError::new(req_id.0, "bad_request", "missing shop domain header")
            .into_response();
    };

    state.tokens.delete(shop);
    tracing::info!(shop, "app uninstalled; access token revoked");

    (
        StatusCode::OK,
        Json(ApiResponse {
            data: WebhookAck { received: true },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
        .into_response()
}
