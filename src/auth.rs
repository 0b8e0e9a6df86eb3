// ============================================================================
// Session Verification
// ============================================================================
//
// The gateway asks a `SessionVerifier` once per request whether the caller
// holds a valid session. The verifier is passed explicitly through gateway
// state so tests can swap it out.
//
// `JwtSessionVerifier` accepts an HS256 session token from either
// `Authorization: Bearer <token>` or the session cookie.
//
// ============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::http::{
    HeaderMap,
    header::{AUTHORIZATION, COOKIE},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use tasklist_config::SessionConfig;
use tasklist_types::{Identity, UserId};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: i64, // Expiration time
    pub iat: i64, // Issued at
    pub iss: String,
}

/// Resolves the caller's identity from inbound request headers.
///
/// `None` means unauthenticated; there is no error channel and no retry.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, headers: &HeaderMap) -> Option<Identity>;
}

pub struct JwtSessionVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    cookie_name: String,
    ttl_hours: i64,
}

impl JwtSessionVerifier {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            cookie_name: config.cookie_name.clone(),
            ttl_hours: config.ttl_hours,
        }
    }

    /// Issue a session token with the configured lifetime
    pub fn issue_token(&self, user_id: &UserId, email: Option<&str>) -> Result<String> {
        self.issue_token_with_ttl(user_id, email, Duration::hours(self.ttl_hours))
    }

    pub fn issue_token_with_ttl(
        &self,
        user_id: &UserId,
        email: Option<&str>,
        ttl: Duration,
    ) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.map(str::to_string),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to encode session token")
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.clone()]);
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .context("Invalid or expired session token")?;
        Ok(token_data.claims)
    }

    /// Bearer token first, then the session cookie
    fn token_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        if let Some(auth_header) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
            if let Some(token) = auth_header.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }

        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|cookies| cookies.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.cookie_name)
            .map(|(_, value)| value.to_string())
    }
}

#[async_trait]
impl SessionVerifier for JwtSessionVerifier {
    async fn verify(&self, headers: &HeaderMap) -> Option<Identity> {
        let token = self.token_from_headers(headers)?;

        let claims = match self.verify_token(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Session verification failed");
                return None;
            }
        };

        let user_id = UserId::new(claims.sub)?;
        let email = claims.email.filter(|email| !email.is_empty());
        Some(Identity::new(user_id, email))
    }
}
