// =============================================================================
// LKBuy Signal — Main Entry Point
// =============================================================================
//
// Loads configuration, builds the provider chain and serves the REST API
// until Ctrl+C.
// =============================================================================

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lkbuy_signal::api;
use lkbuy_signal::app_state::AppState;
use lkbuy_signal::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("LKBuy Signal starting up");

    let config_path =
        std::env::var("LKBUY_CONFIG").unwrap_or_else(|_| "engine_config.json".into());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(path = %config_path, error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });
    config.apply_env_overrides();
    config.validate().context("invalid configuration")?;

    // ── 2. Build shared state ────────────────────────────────────────────
    let bind_addr = config.server.bind_addr.clone();
    let state = Arc::new(AppState::from_config(config).context("failed to build providers")?);

    let providers = state.provider.provider_names();
    if providers.is_empty() {
        warn!("No bar providers configured; every analysis will fail");
    } else {
        info!(?providers, "Bar providers ready");
    }

    // ── 3. Start the API server ──────────────────────────────────────────
    let app = api::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    // ── 4. Graceful shutdown ─────────────────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Shutdown signal received, stopping gracefully");
            }
        })
        .await
        .context("API server failed")?;

    info!("LKBuy Signal shut down complete.");
    Ok(())
}
