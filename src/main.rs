use std::sync::Arc;
use std::time::Duration;

use estate_advisor_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_redis_client, Cache},
    services::providers::{InMemoryCatalog, PropertyCatalog, SupabaseCatalog},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client).await;

    let catalog: Arc<dyn PropertyCatalog> = match config.catalog_credentials() {
        Some((url, key)) => Arc::new(SupabaseCatalog::new(cache.clone(), url, key)),
        None => match &config.catalog_seed_path {
            Some(path) => Arc::new(InMemoryCatalog::from_file(path)?),
            None => {
                tracing::warn!("No catalog configured, serving an empty property list");
                Arc::new(InMemoryCatalog::default())
            }
        },
    };

    tracing::info!(catalog = catalog.name(), "Property catalog ready");

    let state = AppState::new(catalog, Arc::new(cache), config.recommendation_limit)
        .with_session_idle_timeout(Duration::from_secs(config.session_idle_secs));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Flush queued behavior writes before exiting
    cache_writer.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
