// ============================================================================
// Store Service
// ============================================================================
//
// Reference in-memory backing store for lists and items. Trusts the identity
// headers set by the gateway, so it must run on a private network only.
//
// ============================================================================

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tasklist_server::Config;
use tasklist_server::store_service::{StoreServiceContext, SystemClock};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let (store_config, rust_log) = Config::store_from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("=== Store Service Starting ===");
    info!("Port: {}", store_config.port);
    info!("Undo window: {}s", store_config.undo_window_secs);
    info!("Purge interval: {}s", store_config.purge_interval_secs);

    if store_config.undo_window_secs == 0 {
        warn!("UNDO_WINDOW_SECS is 0: deleted items can never be restored");
    }

    info!("Bind address: {}", store_config.bind_address);

    let addr = format!("{}:{}", store_config.bind_address, store_config.port);
    let context = Arc::new(StoreServiceContext::new(store_config, Arc::new(SystemClock))?);

    // Private network only; see the trust boundary note above
    let addr: SocketAddr = addr
        .parse()
        .context("Failed to parse bind address")?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    info!("Store service listening on {}", addr);

    tasklist_server::run_store_service(context, listener).await
}
