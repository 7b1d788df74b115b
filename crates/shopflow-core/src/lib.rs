pub mod app_config;
pub mod config;
pub mod media;
pub mod normalize;
pub mod product;
pub mod tags;
pub mod variants;


use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use media::{resolve_media, MediaContentType, ResolvedMedia};
pub use normalize::{detect_shape, normalize, RawShape};
pub use product::{AttrValue, Attribute, MediaRef, Product, ProductStatus};
pub use tags::dedup_tags;
pub use variants::{expand, Expansion, Variant};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
