use crate::constants::*;

/// Session verification settings (HS256 session tokens)
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Shared signing secret, at least 32 characters
    pub secret: String,
    pub issuer: String,
    /// Cookie consulted when no Authorization header is present
    pub cookie_name: String,
    pub ttl_hours: i64,
}

impl SessionConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: DEFAULT_SESSION_ISSUER.to_string(),
            cookie_name: DEFAULT_SESSION_COOKIE_NAME.to_string(),
            ttl_hours: DEFAULT_SESSION_TTL_HOURS,
        }
    }

    pub(crate) fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET must be set"))?;
        if secret.len() < MIN_SESSION_SECRET_LEN {
            anyhow::bail!(
                "SESSION_SECRET must be at least {} characters long",
                MIN_SESSION_SECRET_LEN
            );
        }

        Ok(Self {
            secret,
            issuer: std::env::var("SESSION_ISSUER")
                .unwrap_or_else(|_| DEFAULT_SESSION_ISSUER.to_string()),
            cookie_name: std::env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| DEFAULT_SESSION_COOKIE_NAME.to_string()),
            ttl_hours: std::env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SESSION_TTL_HOURS),
        })
    }
}
