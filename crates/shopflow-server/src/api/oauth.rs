//! OAuth install flow: redirect the merchant to the authorize page, then
//! handle the signed callback and store the exchanged access token.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Extension;
use shopflow_shopify::oauth::{authorize_url, verify_callback_hmac};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

pub(super) async fn begin_install(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let shop = params
        .iter()
        .find(|(k, _)| k == "shop")
        .map(|(_, v)| v.as_str())
        .unwrap_or_default();
    if shop.is_empty() {
        return ApiError::new(req_id.0, "bad_request", "missing shop parameter").into_response();
    }

    let redirect_uri = format!("{}/auth/callback", state.config.app_url);
    let nonce = Uuid::new_v4().to_string();
    match authorize_url(
        shop,
        &state.config.shopify_api_key,
        &state.config.shopify_scopes,
        &redirect_uri,
        &nonce,
    ) {
        Ok(url) => Redirect::temporary(url.as_str()).into_response(),
        Err(e) => {
            ApiError::new(req_id.0, "bad_request", format!("invalid shop domain: {e}"))
                .into_response()
        }
    }
}

pub(super) async fn finish_install(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    if !verify_callback_hmac(&params, &state.config.shopify_api_secret) {
        return ApiError::new(req_id.0, "unauthorized", "callback signature mismatch")
            .into_response();
    }

    let find = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };
    let (Some(shop), Some(code)) = (find("shop"), find("code")) else {
        return ApiError::new(req_id.0, "bad_request", "missing shop or code parameter")
            .into_response();
    };

    match state.shopify.exchange_code(shop, code).await {
        Ok(token) => {
            state.tokens.set(shop, token.access_token);
            tracing::info!(shop, "OAuth install completed");
            Redirect::temporary(&state.config.app_url).into_response()
        }
        Err(e) => {
            tracing::error!(shop, error = %e, "OAuth code exchange failed");
            ApiError::new(req_id.0, "internal_error", "token exchange failed").into_response()
        }
    }
}
