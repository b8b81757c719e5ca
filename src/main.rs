//!
//! REST service for skydiving operations management.
//! Reads configuration from a TOML file (~/.config/skyops/config.toml).

use std::sync::Arc;

use tracing::{error, info};

use skyops::infrastructure::InMemoryStorage;
use skyops::{create_api_router, default_config_path, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("SKYOPS_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                )
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting SkyOps operations service...");

    // ── Storage seeded from the embedded fixtures ──────────────
    let latency = config.latency.profile();
    if latency.max_ms > 0 {
        info!(
            "Simulated backend latency: {}-{}ms",
            latency.min_ms, latency.max_ms
        );
    }
    let storage = Arc::new(InMemoryStorage::seeded(latency)?);

    // ── REST API server with graceful shutdown ─────────────────
    let router = create_api_router(storage);
    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await?;

    info!("SkyOps service shutdown complete");
    Ok(())
}
