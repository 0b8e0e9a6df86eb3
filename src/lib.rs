use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

// Re-export types from modular crates
pub use tasklist_config::Config;
pub use tasklist_error::{AppError, AppResult};
pub use tasklist_types::{Identity, TodoItem, TodoList, UserId};

pub mod auth;
pub mod domain;
pub mod gateway;
pub mod routes;
pub mod store_service;
pub mod utils;

use auth::{JwtSessionVerifier, SessionVerifier};
use gateway::{GatewayState, ResourceProxy, StoreClient};
use store_service::StoreServiceContext;

/// Wire up gateway state from configuration and an explicit verifier
pub fn build_gateway_state(
    config: &Config,
    verifier: Arc<dyn SessionVerifier>,
) -> Result<Arc<GatewayState>> {
    let client = StoreClient::new(&config.upstream)?;
    let proxy = ResourceProxy::new(verifier, client, config.logging.clone());
    Ok(Arc::new(GatewayState { proxy }))
}

/// Gateway state with the JWT session verifier used in production
pub fn build_default_gateway_state(config: &Config) -> Result<Arc<GatewayState>> {
    let verifier: Arc<dyn SessionVerifier> = Arc::new(JwtSessionVerifier::new(&config.session));
    build_gateway_state(config, verifier)
}

/// Serve the gateway on an already bound listener until shutdown
pub async fn run_gateway(state: Arc<GatewayState>, listener: TcpListener) -> Result<()> {
    let app = gateway::create_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Gateway server failed")
}

/// Serve the store service and its purge task until shutdown
pub async fn run_store_service(
    context: Arc<StoreServiceContext>,
    listener: TcpListener,
) -> Result<()> {
    let purge = tokio::spawn(context.purge_task().run());

    let app = store_service::create_router(context);
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Store service failed");

    purge.abort();
    result
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
