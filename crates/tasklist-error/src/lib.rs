use axum::{http::StatusCode, response::IntoResponse};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Application error type shared by the gateway and the backing store.
///
/// Every failure path ends up here so callers always receive the same
/// envelope: `{"detail": "<message>"}` with one of the documented statuses.
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Resolved locally, never forwarded =====
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // ===== Originating in the backing store =====
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Undo expired: {0}")]
    UndoExpired(String),

    /// Structured failure from the store (422 semantic validation and friends)
    #[error("Upstream error ({status}): {detail}")]
    Upstream { status: StatusCode, detail: String },

    // ===== Synthesized when the downstream call itself fails =====
    #[error("Transport error: {detail}")]
    Transport { detail: String, retryable: bool },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::UndoExpired(_) => StatusCode::GONE,
            AppError::Upstream { status, .. } => *status,
            AppError::Transport { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message placed in the `detail` field of the envelope
    pub fn detail(&self) -> String {
        match self {
            AppError::Unauthenticated(msg)
            | AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Forbidden(msg)
            | AppError::UndoExpired(msg) => msg.clone(),
            AppError::Upstream { detail, .. } => detail.clone(),
            AppError::Transport { detail, .. } => detail.clone(),
            // Internal details stay in the logs
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Get error code for log correlation
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated(_) => "UNAUTHENTICATED",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::UndoExpired(_) => "UNDO_EXPIRED",
            AppError::Upstream { .. } => "UPSTREAM_ERROR",
            AppError::Transport { .. } => "TRANSPORT_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller may reasonably retry the same request
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Transport { retryable: true, .. })
    }

    /// Log this error with appropriate level and context
    pub fn log(&self) {
        let status = self.status_code();
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(
                error = %self,
                error_code = %code,
                status = %status.as_u16(),
                retryable = self.is_retryable(),
                "Server error occurred"
            );
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                error = %self,
                error_code = %code,
                "Authentication failed"
            );
        } else {
            tracing::debug!(
                error = %self,
                error_code = %code,
                status = %status.as_u16(),
                "Client error occurred"
            );
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        self.log();

        let status = self.status_code();
        let body = json!({ "detail": self.detail() });

        (status, axum::Json(body)).into_response()
    }
}

// ============================================================================
// Helper functions for creating common errors
// ============================================================================

impl AppError {
    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        AppError::Unauthenticated(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn undo_expired(msg: impl Into<String>) -> Self {
        AppError::UndoExpired(msg.into())
    }

    /// Create a 422 semantic validation error (raised by the store)
    pub fn unprocessable(msg: impl Into<String>) -> Self {
        AppError::Upstream {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: msg.into(),
        }
    }

    pub fn upstream(status: StatusCode, detail: impl Into<String>) -> Self {
        AppError::Upstream {
            status,
            detail: detail.into(),
        }
    }

    pub fn transport(detail: impl Into<String>, retryable: bool) -> Self {
        AppError::Transport {
            detail: detail.into(),
            retryable,
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn envelope(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_status_contract() {
        assert_eq!(AppError::unauthenticated("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::undo_expired("x").status_code(), StatusCode::GONE);
        assert_eq!(
            AppError::unprocessable("x").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::transport("x", true).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_envelope_carries_detail_only() {
        let (status, body) = envelope(AppError::not_found("List not found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "detail": "List not found" }));
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let (status, body) =
            envelope(AppError::internal("lock poisoned at store.rs:42")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "detail": "Internal server error" }));
    }
}
