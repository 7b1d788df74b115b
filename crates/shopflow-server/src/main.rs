mod api;
mod middleware;
mod token_store;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};
use crate::token_store::{InMemoryTokenStore, TokenStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(shopflow_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let shopify = Arc::new(shopflow_shopify::ShopifyClient::new(&config)?);
    let tracking = Arc::new(shopflow_tracking::TrackingClient::new(
        &config.carrier_base_url,
        config.carrier_api_key.as_deref(),
        config.client_timeout_secs,
    )?);
    let tokens: Arc<dyn TokenStore> = Arc::new(InMemoryTokenStore::new());

    tracing::info!(env = %config.env, addr = %config.bind_addr, "starting shopflow server");

    let app = build_app(AppState {
        config: Arc::clone(&config),
        tokens,
        shopify,
        tracking,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
