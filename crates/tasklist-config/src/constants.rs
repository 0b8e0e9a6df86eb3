// ============================================================================
// Configuration Constants
// ============================================================================

// Default port values
pub(crate) const DEFAULT_PORT: u16 = 3000;
pub(crate) const DEFAULT_STORE_PORT: u16 = 8000;
pub(crate) const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
// The store trusts identity headers, so it stays on loopback unless told otherwise
pub(crate) const DEFAULT_STORE_BIND_ADDRESS: &str = "127.0.0.1";

// Session defaults
pub(crate) const DEFAULT_SESSION_ISSUER: &str = "tasklist";
pub(crate) const DEFAULT_SESSION_COOKIE_NAME: &str = "session_token";
// 168 hours = 7 days, same lifetime as the session provider
pub(crate) const DEFAULT_SESSION_TTL_HOURS: i64 = 168;
pub(crate) const MIN_SESSION_SECRET_LEN: usize = 32;

// Upstream (backing store) defaults
pub(crate) const DEFAULT_STORE_URL: &str = "http://localhost:8000";
pub(crate) const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

// Soft delete
pub(crate) const DEFAULT_UNDO_WINDOW_SECS: u64 = 5;
pub(crate) const DEFAULT_PURGE_INTERVAL_SECS: u64 = 30;

// Logging
pub(crate) const DEFAULT_LOG_HASH_SALT: &str = "tasklist-log-salt";

// Request bodies above this size are rejected before parsing
pub const MAX_REQUEST_BODY_SIZE: usize = 64 * 1024; // 64 KB
