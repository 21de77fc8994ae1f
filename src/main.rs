//! Net-hours HTTP server binary.
//!
//! Loads the active rules once at startup and serves the calculation API.
//!
//! # Environment Variables
//!
//! - `RULES_CONFIG_DIR`: Rule configuration directory (default: ./config/default)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `BATCH_CONCURRENCY`: Calculations run at once per batch (default: 8)
//! - `BATCH_TIMEOUT_MS`: Per-employee time limit in a batch, 0 disables it (default: 5000)
//! - `RUST_LOG`: Log filter (default: info)

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use net_hours_engine::api::{AppState, create_router};
use net_hours_engine::calculation::{BatchOptions, DEFAULT_BATCH_CONCURRENCY};
use net_hours_engine::config::ConfigLoader;

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting net-hours server");

    let config_dir =
        env::var("RULES_CONFIG_DIR").unwrap_or_else(|_| "./config/default".to_string());
    let config = ConfigLoader::load(&config_dir)
        .with_context(|| format!("loading rules from {}", config_dir))?;
    info!(
        path = %config.source_dir().display(),
        inactive = ?config.rules().missing_kinds(),
        "Rules loaded"
    );

    let timeout_ms: u64 = env_or("BATCH_TIMEOUT_MS", 5000);
    let batch_options = BatchOptions {
        max_concurrency: env_or("BATCH_CONCURRENCY", DEFAULT_BATCH_CONCURRENCY),
        per_employee_timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
    };

    let state = AppState::with_batch_options(config.into_rules(), batch_options);
    let app = create_router(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env_or("PORT", 8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
