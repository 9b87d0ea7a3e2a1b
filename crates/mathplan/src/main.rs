use std::sync::Arc;

use anyhow::Context;
use mathplan::config::ServerConfig;
use mathplan::math_plan::{Catalog, MathPlanProcessor, PlanCache};
use mathplan::server::create_router;
use mathplan::types::AppState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;

    let catalog = match &config.catalog_dir {
        Some(dir) => Catalog::load_from_directory(dir)
            .with_context(|| format!("Failed to load catalog from {}", dir.display()))?,
        None => Catalog::embedded().context("Failed to load bundled catalog")?,
    };
    info!("Loaded {} majors", catalog.len());

    let processor = MathPlanProcessor::new(Arc::new(catalog), PlanCache::new(config.cache_ttl));
    let app_state = Arc::new(AppState::new(processor));

    // Expired plans are otherwise only dropped when looked up again
    let cleanup_state = app_state.clone();
    let ttl = config.cache_ttl.max(std::time::Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(ttl);
        loop {
            interval.tick().await;
            cleanup_state.processor.cache().cleanup_expired();
        }
    });

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    info!("Listening on {}", config.addr);

    axum::serve(listener, create_router(app_state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                // Keep serving; the process can still be killed
                std::future::pending::<()>().await;
            }
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
