pub mod client;
pub mod error;
pub mod mutations;
pub mod oauth;
mod retry;
pub mod types;

pub use client::ShopifyClient;
pub use error::ShopifyError;
pub use types::{
    AccessToken, CreatedProduct, CreatedVariant, OrderSummary, SubscriptionPlan,
    SubscriptionResult, UserError,
};
