// ============================================================================
// TrustedUser Extractor - Gateway Auth Pattern
// ============================================================================
//
// Extracts the caller identity from the X-User-Id / X-User-Email headers set
// by the gateway.
//
// SECURITY: This extractor trusts the headers unconditionally. It MUST only
// be used by services that are reachable exclusively through the gateway.
// Direct internet access to such a service would let anyone assert any
// identity.
//
// Usage:
// ```rust
// async fn handler(user: TrustedUser, ...) -> Result<...> {
//     let owner = &user.0.user_id;
//     // ...
// }
// ```
//
// ============================================================================

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};

use tasklist_error::AppError;
use tasklist_types::{Identity, UserId};

use crate::gateway::identity::{USER_EMAIL_HEADER, USER_ID_HEADER};

/// Identity propagated from the gateway via trusted headers.
#[derive(Debug, Clone)]
pub struct TrustedUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for TrustedUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(UserId::new)
            .ok_or_else(|| {
                // Should never happen behind the gateway
                tracing::error!(
                    "Missing or invalid X-User-Id header. \
                     Is this request coming through the gateway?"
                );
                AppError::unauthenticated("Authentication required").into_response()
            })?;

        let email = parts
            .headers
            .get(USER_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|email| !email.is_empty())
            .map(str::to_string);

        tracing::trace!("TrustedUser extracted from headers");

        Ok(TrustedUser(Identity::new(user_id, email)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    async fn extract(request: Request<()>) -> Result<TrustedUser, Response> {
        let (mut parts, _) = request.into_parts();
        TrustedUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extracts_identity() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "alice")
            .header(USER_EMAIL_HEADER, "alice@example.com")
            .body(())
            .unwrap();

        let user = extract(request).await.unwrap();
        assert_eq!(user.0.user_id.as_str(), "alice");
        assert_eq!(user.0.email.as_deref(), Some("alice@example.com"));
    }

    #[tokio::test]
    async fn test_empty_email_means_none() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "alice")
            .header(USER_EMAIL_HEADER, "")
            .body(())
            .unwrap();

        let user = extract(request).await.unwrap();
        assert_eq!(user.0.email, None);
    }

    #[tokio::test]
    async fn test_missing_user_id_is_rejected() {
        let request = Request::builder().body(()).unwrap();
        let response = extract(request).await.unwrap_err();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .header(USER_ID_HEADER, "  ")
            .body(())
            .unwrap();
        let response = extract(request).await.unwrap_err();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
