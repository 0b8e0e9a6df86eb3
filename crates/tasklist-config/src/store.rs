use crate::constants::*;

/// Backing store settings
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub port: u16,
    /// Private interface only: callers are identified by forwarded headers
    pub bind_address: String,
    /// Restore succeeds only while `now - deleted_at` is below this
    pub undo_window_secs: u64,
    /// How often expired soft-deleted items are purged
    pub purge_interval_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_STORE_PORT,
            bind_address: DEFAULT_STORE_BIND_ADDRESS.to_string(),
            undo_window_secs: DEFAULT_UNDO_WINDOW_SECS,
            purge_interval_secs: DEFAULT_PURGE_INTERVAL_SECS,
        }
    }
}

impl StoreConfig {
    pub(crate) fn from_env() -> Self {
        Self {
            port: std::env::var("STORE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_STORE_PORT),
            bind_address: std::env::var("STORE_BIND_ADDRESS")
                .ok()
                .filter(|addr| !addr.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STORE_BIND_ADDRESS.to_string()),
            undo_window_secs: std::env::var("UNDO_WINDOW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_UNDO_WINDOW_SECS),
            purge_interval_secs: std::env::var("PURGE_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_PURGE_INTERVAL_SECS),
        }
    }
}
