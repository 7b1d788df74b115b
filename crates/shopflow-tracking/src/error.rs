//! Error types for the carrier tracking client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackingError {
    /// Network-level failure or non-2xx status from the carrier.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The carrier answered 2xx but reported an application error.
    #[error("carrier API error: {0}")]
    ApiError(String),

    /// The tracking code is unknown to the carrier.
    #[error("tracking code not found: {0}")]
    NotFound(String),

    /// The response body did not match the expected shape.
    #[error("failed to deserialize carrier response for {context}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
