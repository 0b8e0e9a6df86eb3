// ============================================================================
// Tasklist Config - Centralized configuration management
// ============================================================================
//
// Configuration for the gateway and the reference store service.
// Supports loading from environment variables with sensible defaults.
//
// ============================================================================

mod constants;
mod logging;
mod session;
mod store;
mod upstream;

// Re-export all public types
pub use constants::MAX_REQUEST_BODY_SIZE;
pub use logging::LoggingConfig;
pub use session::SessionConfig;
pub use store::StoreConfig;
pub use upstream::UpstreamConfig;

use anyhow::Result;
use constants::*;

/// Main configuration structure
#[derive(Clone, Debug)]
pub struct Config {
    /// Gateway listening port
    pub port: u16,
    pub bind_address: String,
    pub rust_log: String,

    // Sub-configurations
    pub session: SessionConfig,
    pub upstream: UpstreamConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load the full configuration. Fails when SESSION_SECRET is missing or weak.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string()),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            session: SessionConfig::from_env()?,
            upstream: UpstreamConfig::from_env(),
            store: StoreConfig::from_env(),
            logging: LoggingConfig::from_env(),
        })
    }

    /// Configuration for the store service, which never verifies sessions.
    pub fn store_from_env() -> Result<(StoreConfig, String)> {
        dotenvy::dotenv().ok();

        let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        Ok((StoreConfig::from_env(), rust_log))
    }

    /// In-process configuration with defaults (tests, embedding)
    pub fn new(session: SessionConfig, upstream: UpstreamConfig) -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            rust_log: "info".to_string(),
            session,
            upstream,
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
