//! Carrier tracking passthrough.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use shopflow_tracking::TrackingError;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) async fn track_shipment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(code): Path<String>,
) -> Response {
    match state.tracking.track(&code).await {
        Ok(info) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: info,
                meta: ResponseMeta::new(req_id.0),
            }),
        )
            .into_response(),
        Err(TrackingError::NotFound(code)) => {
            ApiError::new(req_id.0, "not_found", format!("tracking code {code} not found"))
                .into_response()
        }
        Err(e) => {
            tracing::error!(code, error = %e, "carrier lookup failed");
            ApiError::new(req_id.0, "internal_error", "carrier lookup failed").into_response()
        }
    }
}
