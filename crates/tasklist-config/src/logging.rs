// ============================================================================
// Logging Configuration
// ============================================================================

use crate::constants::DEFAULT_LOG_HASH_SALT;

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Write raw user ids into logs (off by default)
    pub enable_user_identifiers: bool,
    /// Salt for the short hashes logged in place of user ids
    pub hash_salt: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_user_identifiers: false,
            hash_salt: DEFAULT_LOG_HASH_SALT.to_string(),
        }
    }
}

impl LoggingConfig {
    pub(crate) fn from_env() -> Self {
        Self {
            enable_user_identifiers: std::env::var("LOG_USER_IDENTIFIERS")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            hash_salt: std::env::var("LOG_HASH_SALT")
                .ok()
                .filter(|salt| !salt.is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_HASH_SALT.to_string()),
        }
    }
}
