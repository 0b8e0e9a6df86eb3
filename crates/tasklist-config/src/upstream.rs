// ============================================================================
// Upstream Configuration
// ============================================================================
//
// Where the gateway forwards list/item calls and how long it waits.
//
// ============================================================================

use crate::constants::*;

#[derive(Clone, Debug)]
pub struct UpstreamConfig {
    /// Backing store base URL (e.g., "http://store-service:8000")
    pub store_url: String,
    /// Upper bound for a single forwarded call, including body download
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn new(store_url: impl Into<String>) -> Self {
        Self {
            store_url: store_url.into(),
            timeout_secs: DEFAULT_STORE_TIMEOUT_SECS,
        }
    }

    pub(crate) fn from_env() -> Self {
        Self {
            store_url: std::env::var("STORE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_STORE_URL.to_string()),
            timeout_secs: std::env::var("STORE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_STORE_TIMEOUT_SECS),
        }
    }
}
