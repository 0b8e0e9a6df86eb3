use sha2::{Digest, Sha256};

use tasklist_config::LoggingConfig;
use tasklist_types::UserId;

/// Creates a truncated, salted hash of an identifier for safe logging.
pub fn log_safe_id(id: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(id.as_bytes());
    let hash = hasher.finalize();

    // First 4 bytes as hex
    hash[..4]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>()
}

/// User id as it may appear in logs: raw only when explicitly enabled.
pub fn log_user(config: &LoggingConfig, user_id: &UserId) -> String {
    if config.enable_user_identifiers {
        user_id.to_string()
    } else {
        log_safe_id(user_id.as_str(), &config.hash_salt)
    }
}
