use thiserror::Error;

use crate::types::UserError;

/// Errors returned by the Shopify Admin API client.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a top-level `errors` array (transport-level GraphQL
    /// failure: bad query, throttling, auth).
    #[error("Shopify API error: {0}")]
    ApiError(String),

    /// The mutation succeeded at the transport level but reported
    /// field-level validation errors. Surfaced verbatim to the caller.
    #[error("Shopify rejected the mutation with {} user error(s)", .0.len())]
    UserErrors(Vec<UserError>),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A shop domain or base URL could not be parsed into a request URL.
    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
