//! HTTP client for the carrier tracking endpoint.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::TrackingError;
use crate::types::TrackingInfo;

/// Client for the carrier's shipment-tracking API.
pub struct TrackingClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl TrackingClient {
    /// Creates a client for the carrier at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`TrackingError::ApiError`] if `base_url`
    /// does not parse.
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, TrackingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| TrackingError::ApiError(format!("invalid base URL {base_url}: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.map(str::to_owned),
        })
    }

    /// Looks up one tracking code.
    ///
    /// # Errors
    ///
    /// - [`TrackingError::NotFound`] — the carrier answered 404.
    /// - [`TrackingError::Http`] — network failure or other non-2xx status.
    /// - [`TrackingError::Deserialize`] — unexpected response body.
    pub async fn track(&self, code: &str) -> Result<TrackingInfo, TrackingError> {
        let mut url = self
            .base_url
            .join("track")
            .map_err(|e| TrackingError::ApiError(format!("invalid tracking URL: {e}")))?;
        url.query_pairs_mut().append_pair("code", code);

        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let response = request.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TrackingError::NotFound(code.to_owned()));
        }
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| TrackingError::Deserialize {
            context: format!("track(code={code})"),
            source: e,
        })
    }
}
