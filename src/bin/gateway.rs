// ============================================================================
// API Gateway
// ============================================================================
//
// Caller-facing entry point. It handles:
// - session verification
// - local validation of list/item requests
// - forwarding to the backing store with X-User-Id / X-User-Email
//
// Architecture:
// - Stateless (can scale horizontally)
// - The backing store must only be reachable through this gateway
//
// ============================================================================

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tasklist_server::Config;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.rust_log.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("=== API Gateway Starting ===");
    info!("Port: {}", config.port);
    info!("Backing store: {}", config.upstream.store_url);
    info!("Store timeout: {}s", config.upstream.timeout_secs);

    if config.logging.enable_user_identifiers {
        warn!("LOG_USER_IDENTIFIERS is enabled: raw user ids will be written to logs");
    }

    let state = tasklist_server::build_default_gateway_state(&config)?;

    if !state.proxy.client().check_health().await {
        warn!("Backing store is not reachable yet; requests will fail until it is");
    }

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .context("Failed to parse bind address")?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    info!("API Gateway listening on {}", addr);

    tasklist_server::run_gateway(state, listener).await
}
