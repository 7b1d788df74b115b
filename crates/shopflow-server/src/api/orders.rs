//! Read-only order passthroughs. No transformation beyond flattening the
//! GraphQL connection shape, which the client already does.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_shopify_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct OrdersQuery {
    shop: String,
    limit: Option<usize>,
}

fn normalize_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(25).clamp(1, 100)
}

pub(super) async fn list_orders(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<OrdersQuery>,
) -> Response {
    let Some(token) = state.tokens.get(&params.shop) else {
        return ApiError::new(
            req_id.0,
            "unauthorized",
            format!("no access token on file for {}", params.shop),
        )
        .into_response();
    };

    match state
        .shopify
        .list_orders(&params.shop, &token, normalize_limit(params.limit))
        .await
    {
        Ok(orders) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: orders,
                meta: ResponseMeta::new(req_id.0),
            }),
        )
            .into_response(),
        Err(e) => map_shopify_error(req_id.0, &e).into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct OrderQuery {
    shop: String,
}

pub(super) async fn get_order(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(order_id): Path<String>,
    Query(params): Query<OrderQuery>,
) -> Response {
    let Some(token) = state.tokens.get(&params.shop) else {
        return ApiError::new(
            req_id.0,
            "unauthorized",
            format!("no access token on file for {}", params.shop),
        )
        .into_response();
    };

    match state.shopify.get_order(&params.shop, &token, &order_id).await {
        Ok(Some(order)) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: order,
                meta: ResponseMeta::new(req_id.0),
            }),
        )
            .into_response(),
        Ok(None) => {
            ApiError::new(req_id.0, "not_found", format!("order {order_id} not found"))
                .into_response()
        }
        Err(e) => map_shopify_error(req_id.0, &e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::test_support::{test_state, TEST_SHOP};
    use crate::api::build_app;

    use super::normalize_limit;

    #[test]
    fn normalize_limit_applies_defaults_and_bounds() {
        assert_eq!(normalize_limit(None), 25);
        assert_eq!(normalize_limit(Some(0)), 1);
        assert_eq!(normalize_limit(Some(1_000)), 100);
        assert_eq!(normalize_limit(Some(10)), 10);
    }

    #[tokio::test]
    async fn list_orders_returns_enveloped_orders() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "orders": { "edges": [
                    { "node": { "id": "gid://shopify/Order/1001", "name": "#1001",
                                "createdAt": "2026-08-01T12:00:00Z",
                                "displayFulfillmentStatus": "FULFILLED",
                                "totalPriceSet": { "shopMoney": { "amount": "41.98" } } } }
                ] } }
            })))
            .mount(&server)
            .await;

        let (state, _tokens) = test_state(&server.uri());
        let app = build_app(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/orders?shop={TEST_SHOP}&limit=5"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["data"][0]["name"].as_str(), Some("#1001"));
    }

    #[tokio::test]
    async fn get_order_maps_missing_order_to_404() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "order": null }
            })))
            .mount(&server)
            .await;

        let (state, _tokens) = test_state(&server.uri());
        let app = build_app(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/orders/9999?shop={TEST_SHOP}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
