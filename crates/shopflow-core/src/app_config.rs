use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Public base URL of this app, used for the OAuth redirect URI.
    pub app_url: String,
    pub shopify_api_key: String,
    pub shopify_api_secret: String,
    pub shopify_scopes: String,
    pub shopify_api_version: String,
    /// Base URL relative media paths resolve against.
    pub media_base_url: String,
    /// Path prefix that marks an already-rooted media path (e.g. `/media/`).
    pub media_root_prefix: String,
    pub carrier_base_url: String,
    pub carrier_api_key: Option<String>,
    pub client_timeout_secs: u64,
    pub client_max_retries: u32,
    pub client_retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("app_url", &self.app_url)
            .field("shopify_api_key", &self.shopify_api_key)
            .field("shopify_api_secret", &"[redacted]")
            .field("shopify_scopes", &self.shopify_scopes)
            .field("shopify_api_version", &self.shopify_api_version)
            .field("media_base_url", &self.media_base_url)
            .field("media_root_prefix", &self.media_root_prefix)
            .field("carrier_base_url", &self.carrier_base_url)
            .field(
                "carrier_api_key",
                &self.carrier_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("client_timeout_secs", &self.client_timeout_secs)
            .field("client_max_retries", &self.client_max_retries)
            .field(
                "client_retry_backoff_base_ms",
                &self.client_retry_backoff_base_ms,
            )
            .finish()
    }
}
