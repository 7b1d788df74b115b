//! Catalog-to-Shopify sync: the one endpoint that runs the whole pipeline.
//!
//! Normalize the raw payload, expand variants, resolve media, then two
//! sequential upstream calls: `productCreate`, then `productCreateMedia`.
//! Field-level `userErrors` from the create call stop the pipeline and are
//! forwarded verbatim. A media-attach failure after a successful create is
//! swallowed: images are best-effort, the product exists either way.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use shopflow_core::{expand, normalize, resolve_media};
use shopflow_shopify::ShopifyError;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SyncRequest {
    shop: String,
    #[serde(default)]
    product: Option<Value>,
}

pub(super) async fn sync_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SyncRequest>,
) -> Response {
    let Some(raw) = body.product.filter(|v| !v.is_null()) else {
        return ApiError::new(req_id.0, "bad_request", "missing product payload").into_response();
    };
    let Some(token) = state.tokens.get(&body.shop) else {
        return ApiError::new(
            req_id.0,
            "unauthorized",
            format!("no access token on file for {}", body.shop),
        )
        .into_response();
    };

    let product = normalize(&raw);
    let expansion = expand(&product);
    let media = resolve_media(
        &product,
        &state.config.media_base_url,
        &state.config.media_root_prefix,
    );

    let created = match state
        .shopify
        .create_product(&body.shop, &token, &product, &expansion, &product.tags)
        .await
    {
        Ok(created) => created,
        Err(ShopifyError::UserErrors(errors)) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response();
        }
        Err(err) => {
            tracing::error!(shop = %body.shop, error = %err, "product creation failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": err.to_string(),
                    "message": "product creation failed",
                })),
            )
                .into_response();
        }
    };

    let media_result = match state
        .shopify
        .attach_media(&body.shop, &token, &created.id, &media)
        .await
    {
        Ok(Some(value)) => value,
        Ok(None) => Value::Null,
        Err(err) => {
            tracing::warn!(
                shop = %body.shop,
                product_id = %created.id,
                error = %err,
                "media attach failed after successful product creation"
            );
            json!({ "failed": true, "error": err.to_string() })
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "product": created,
            "media": media_result,
            "source_data": {
                "original_id": product.id,
                "price_range": product.price_range,
                "stock": product.stock,
                "tags": product.tags,
            },
        })),
    )
        .into_response()
}
