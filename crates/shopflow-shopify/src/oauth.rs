//! OAuth handshake helpers: authorize URL construction and the two
//! keyed-hash checks (callback query HMAC, webhook body HMAC).
//!
//! Verification uses `Mac::verify_slice`, which compares in constant time;
//! a plain `==` on the digests would leak timing.

use base64::Engine as _;
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::Sha256;

use crate::error::ShopifyError;

type HmacSha256 = Hmac<Sha256>;

/// Builds the merchant-facing authorize URL for the install redirect.
///
/// # Errors
///
/// Returns [`ShopifyError::InvalidUrl`] if `shop` is not a valid host.
pub fn authorize_url(
    shop: &str,
    api_key: &str,
    scopes: &str,
    redirect_uri: &str,
    state: &str,
) -> Result<Url, ShopifyError> {
    let mut url = Url::parse(&format!("https://{shop}/admin/oauth/authorize")).map_err(|e| {
        ShopifyError::InvalidUrl {
            url: shop.to_owned(),
            reason: e.to_string(),
        }
    })?;
    url.query_pairs_mut()
        .append_pair("client_id", api_key)
        .append_pair("scope", scopes)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("state", state);
    Ok(url)
}

/// Verifies the `hmac` parameter of an OAuth callback.
///
/// The signed message is every query parameter except `hmac` itself,
/// sorted by key and joined as `key=value&...`; the signature is the
/// hex-encoded HMAC-SHA256 under the app's shared secret.
#[must_use]
pub fn verify_callback_hmac(params: &[(String, String)], secret: &str) -> bool {
    let Some((_, provided)) = params.iter().find(|(k, _)| k == "hmac") else {
        return false;
    };
    let Ok(provided) = hex::decode(provided) else {
        return false;
    };

    let mut signed: Vec<&(String, String)> =
        params.iter().filter(|(k, _)| k != "hmac").collect();
    signed.sort_by(|a, b| a.0.cmp(&b.0));
    let message = signed
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(message.as_bytes());
    mac.verify_slice(&provided).is_ok()
}

/// Verifies a webhook body against the base64 HMAC-SHA256 header the
/// platform attaches to every delivery.
#[must_use]
pub fn verify_webhook_hmac(body: &[u8], header: &str, secret: &str) -> bool {
    let Ok(provided) = base64::engine::general_purpose::STANDARD.decode(header) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&provided).is_ok()
}
