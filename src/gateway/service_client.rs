// ============================================================================
// Store Client
// ============================================================================
//
// HTTP client for the backing store. Handles:
// - one outbound request per call, bounded by the configured timeout
// - identity headers and a fresh X-Request-Id on every request
// - decoding the store's reply into JSON, or into an AppError
//
// No retries happen here. Timeouts and refused connections are reported as
// retryable transport errors and left to the caller.
//
// ============================================================================

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use tasklist_config::UpstreamConfig;
use tasklist_error::{AppError, AppResult};
use tasklist_types::Identity;

use crate::gateway::identity::IdentityForwarder;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Successful store reply, body still in the store's snake_case shape
#[derive(Debug)]
pub struct StoreResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub struct StoreClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl StoreClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);

        // Configure connection pooling and keep-alive
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .tcp_keepalive(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.store_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request to the store on behalf of `identity`
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        identity: &Identity,
        body: Option<&Value>,
    ) -> AppResult<StoreResponse> {
        let url = format!("{}{}", self.base_url, path);
        let request_id = Uuid::new_v4().to_string();

        let mut request = self
            .client
            .request(method.clone(), &url)
            .headers(IdentityForwarder::headers(identity)?);
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            request = request.header(REQUEST_ID_HEADER, value);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(
            method = %method,
            path = %path,
            request_id = %request_id,
            "Forwarding request to backing store"
        );

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(&method, path, e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&method, path, e))?;

        debug!(
            method = %method,
            path = %path,
            request_id = %request_id,
            status = %status.as_u16(),
            "Backing store replied"
        );

        if !status.is_success() {
            return Err(upstream_error(status, &bytes));
        }

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| {
                warn!(
                    path = %path,
                    status = %status.as_u16(),
                    error = %e,
                    "Backing store returned a non-JSON success body"
                );
                AppError::transport("Backing store returned an unreadable response", false)
            })?
        };

        Ok(StoreResponse { status, body })
    }

    fn transport_error(&self, method: &Method, path: &str, e: reqwest::Error) -> AppError {
        warn!(
            method = %method,
            path = %path,
            timeout_secs = self.timeout.as_secs(),
            error = %e,
            "Backing store request failed"
        );

        if e.is_timeout() {
            AppError::transport("Backing store timed out; the request may be retried", true)
        } else if e.is_connect() {
            AppError::transport("Backing store unavailable; the request may be retried", true)
        } else {
            AppError::transport("Backing store request failed", false)
        }
    }

    /// Check if the store is reachable and healthy
    pub async fn check_health(&self) -> bool {
        let health_url = format!("{}/health", self.base_url);
        match self
            .client
            .get(&health_url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!(store_url = %self.base_url, error = %e, "Backing store health check failed");
                false
            }
        }
    }
}

/// Map a non-success store reply onto the caller-facing error contract
pub fn upstream_error(status: StatusCode, bytes: &[u8]) -> AppError {
    let detail = extract_detail(bytes).unwrap_or_else(|| {
        if !bytes.is_empty() {
            debug!(
                status = %status.as_u16(),
                body = %String::from_utf8_lossy(bytes),
                "Unstructured error body from backing store"
            );
        }
        synthesized_detail(status)
    });

    match status {
        StatusCode::FORBIDDEN => AppError::forbidden(detail),
        StatusCode::NOT_FOUND => AppError::not_found(detail),
        StatusCode::GONE => AppError::undo_expired(detail),
        // The store refusing our trust headers is our fault, not the caller's
        StatusCode::UNAUTHORIZED => AppError::upstream(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Backing store rejected the forwarded identity",
        ),
        status if status.is_server_error() => {
            AppError::upstream(StatusCode::INTERNAL_SERVER_ERROR, detail)
        }
        status => AppError::upstream(status, detail),
    }
}

/// Pull a message out of a structured error body: `{"detail": "..."}`,
/// `{"detail": [{"msg": "..."}]}` or `{"error": "..."}`.
fn extract_detail(bytes: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(bytes).ok()?;

    match value.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => return Some(detail.clone()),
        Some(Value::Array(entries)) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }

    value
        .get("error")
        .and_then(Value::as_str)
        .filter(|error| !error.is_empty())
        .map(str::to_string)
}

fn synthesized_detail(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("Backing store request failed: {} {}", status.as_u16(), reason),
        None => format!("Backing store request failed: {}", status.as_u16()),
    }
}
