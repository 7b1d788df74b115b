//! Subscription billing passthrough: one mutation, no branching beyond
//! error mapping.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;
use shopflow_shopify::SubscriptionPlan;

use crate::middleware::RequestId;

use super::{map_shopify_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SubscribeRequest {
    shop: String,
    plan: SubscriptionPlan,
}

pub(super) async fn subscribe(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SubscribeRequest>,
) -> Response {
    let Some(token) = state.tokens.get(&body.shop) else {
        return ApiError::new(
            req_id.0,
            "unauthorized",
            format!("no access token on file for {}", body.shop),
        )
        .into_response();
    };

    match state
        .shopify
        .create_subscription(&body.shop, &token, &body.plan)
        .await
    {
        Ok(result) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: result,
                meta: ResponseMeta::new(req_id.0),
            }),
        )
            .into_response(),
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

    fn subscribe_request(shop: &str) -> Request<Body> {
        let body = serde_json::json!({
            "shop": shop,
            "plan": {
                "name": "Pro",
                "price": "9.99",
                "return_url": "https://app.example.com/billing/done",
                "test": true
            }
        });
        Request::builder()
            .method("POST")
            .uri("/api/v1/billing/subscribe")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn subscribe_returns_confirmation_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "appSubscriptionCreate": {
                    "confirmationUrl": "https://demo.myshopify.com/admin/charges/1/confirm",
                    "appSubscription": { "id": "gid://shopify/AppSubscription/1",
                                         "status": "PENDING" },
                    "userErrors": []
                } }
            })))
            .mount(&server)
            .await;

        let (state, _tokens) = test_state(&server.uri());
        let app = build_app(state);
        let response = app
            .oneshot(subscribe_request(TEST_SHOP))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert!(json["data"]["confirmation_url"]
            .as_str()
            .is_some_and(|u| u.ends_with("/confirm")));
    }

    #[tokio::test]
    async fn subscribe_rejects_shop_without_token() {
        let (state, _tokens) = test_state("http://127.0.0.1:9");
        let app = build_app(state);
        let response = app
            .oneshot(subscribe_request("stranger.myshopify.com"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn subscribe_maps_plan_rejection_to_400() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "appSubscriptionCreate": {
                    "confirmationUrl": null,
                    "appSubscription": null,
                    "userErrors": [ { "field": null, "message": "Price must be positive" } ]
                } }
            })))
            .mount(&server)
            .await;

        let (state, _tokens) = test_state(&server.uri());
        let app = build_app(state);
        let response = app
            .oneshot(subscribe_request(TEST_SHOP))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
