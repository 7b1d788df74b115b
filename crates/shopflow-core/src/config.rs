use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let shopify_api_key = require("SHOPFLOW_SHOPIFY_API_KEY")?;
    let shopify_api_secret = require("SHOPFLOW_SHOPIFY_API_SECRET")?;
    let media_base_url = require("SHOPFLOW_MEDIA_BASE_URL")?;

    let env = parse_environment(&or_default("SHOPFLOW_ENV", "development"));
    let bind_addr = parse_addr("SHOPFLOW_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("SHOPFLOW_LOG_LEVEL", "info");
    let app_url = or_default("SHOPFLOW_APP_URL", "http://localhost:3000");

    let shopify_scopes = or_default(
        "SHOPFLOW_SHOPIFY_SCOPES",
        "write_products,read_orders,read_fulfillments",
    );
    let shopify_api_version = or_default("SHOPFLOW_SHOPIFY_API_VERSION", "2024-07");

    let media_root_prefix = or_default("SHOPFLOW_MEDIA_ROOT_PREFIX", "/media/");

    let carrier_base_url = or_default(
        "SHOPFLOW_CARRIER_BASE_URL",
        "https://api.carrier.example.com",
    );
    let carrier_api_key = lookup("SHOPFLOW_CARRIER_API_KEY").ok();

    let client_timeout_secs = parse_u64("SHOPFLOW_CLIENT_TIMEOUT_SECS", "30")?;
    let client_max_retries = parse_u32("SHOPFLOW_CLIENT_MAX_RETRIES", "3")?;
    let client_retry_backoff_base_ms = parse_u64("SHOPFLOW_CLIENT_RETRY_BACKOFF_BASE_MS", "1000")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        app_url,
        shopify_api_key,
        shopify_api_secret,
        shopify_scopes,
        shopify_api_version,
        media_base_url,
        media_root_prefix,
        carrier_base_url,
        carrier_api_key,
        client_timeout_secs,
        client_max_retries,
        client_retry_backoff_base_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated with valid defaults.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("SHOPFLOW_SHOPIFY_API_KEY", "test-key");
        m.insert("SHOPFLOW_SHOPIFY_API_SECRET", "test-secret");
        m.insert("SHOPFLOW_MEDIA_BASE_URL", "https://cdn.example.com");
        m
    }

    #[test]
    fn parse_environment_known_values() {
        assert_eq!(parse_environment("development"), Environment::Development);
        assert_eq!(parse_environment("test"), Environment::Test);
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("unknown"), Environment::Development);
    }

    #[test]
    fn build_app_config_fails_without_api_key() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "SHOPFLOW_SHOPIFY_API_KEY"),
            "expected MissingEnvVar(SHOPFLOW_SHOPIFY_API_KEY), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_without_api_secret() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("SHOPFLOW_SHOPIFY_API_KEY", "test-key");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "SHOPFLOW_SHOPIFY_API_SECRET"),
            "expected MissingEnvVar(SHOPFLOW_SHOPIFY_API_SECRET), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_without_media_base_url() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("SHOPFLOW_SHOPIFY_API_KEY", "test-key");
        map.insert("SHOPFLOW_SHOPIFY_API_SECRET", "test-secret");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "SHOPFLOW_MEDIA_BASE_URL"),
            "expected MissingEnvVar(SHOPFLOW_MEDIA_BASE_URL), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map = full_env();
        map.insert("SHOPFLOW_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPFLOW_BIND_ADDR"),
            "expected InvalidEnvVar(SHOPFLOW_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_succeeds_with_all_required_vars() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).expect("config should build");
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.app_url, "http://localhost:3000");
        assert_eq!(cfg.shopify_api_version, "2024-07");
        assert_eq!(cfg.media_root_prefix, "/media/");
        assert!(cfg.carrier_api_key.is_none());
        assert_eq!(cfg.client_timeout_secs, 30);
        assert_eq!(cfg.client_max_retries, 3);
        assert_eq!(cfg.client_retry_backoff_base_ms, 1000);
    }

    #[test]
    fn build_app_config_timeout_override() {
        let mut map = full_env();
        map.insert("SHOPFLOW_CLIENT_TIMEOUT_SECS", "60");
        let cfg = build_app_config(lookup_from_map(&map)).expect("config should build");
        assert_eq!(cfg.client_timeout_secs, 60);
    }

    #[test]
    fn build_app_config_timeout_invalid() {
        let mut map = full_env();
        map.insert("SHOPFLOW_CLIENT_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPFLOW_CLIENT_TIMEOUT_SECS"),
            "expected InvalidEnvVar(SHOPFLOW_CLIENT_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn app_config_debug_redacts_secrets() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).expect("config should build");
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("test-secret"));
        assert!(debug.contains("[redacted]"));
    }
}
