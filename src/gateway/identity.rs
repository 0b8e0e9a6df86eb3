// ============================================================================
// Identity Forwarding - Gateway Trust Boundary
// ============================================================================
//
// The gateway is the only component that verifies sessions. Downstream, the
// store learns who is calling from exactly two headers:
//
//   X-User-Id     verified user id
//   X-User-Email  verified email, "" when the session carries none
//
// Both keys are always present. Any caller-supplied copies of these headers
// are never passed through: outbound requests are built from scratch.
//
// ============================================================================

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use tasklist_error::{AppError, AppResult};
use tasklist_types::Identity;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

pub struct IdentityForwarder;

impl IdentityForwarder {
    /// Trust headers for one downstream call
    pub fn headers(identity: &Identity) -> AppResult<HeaderMap> {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(
            HeaderName::from_static(USER_ID_HEADER),
            header_value(identity.user_id.as_str())?,
        );
        headers.insert(
            HeaderName::from_static(USER_EMAIL_HEADER),
            header_value(identity.forwarded_email())?,
        );
        Ok(headers)
    }
}

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| AppError::unauthenticated("Session identity cannot be forwarded"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklist_types::UserId;

    #[test]
    fn test_forwards_exactly_two_headers() {
        let identity = Identity::new(
            UserId::new("alice").unwrap(),
            Some("alice@example.com".to_string()),
        );
        let headers = IdentityForwarder::headers(&identity).unwrap();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers[USER_ID_HEADER], "alice");
        assert_eq!(headers[USER_EMAIL_HEADER], "alice@example.com");
    }

    #[test]
    fn test_missing_email_is_forwarded_empty() {
        let identity = Identity::new(UserId::new("bob").unwrap(), None);
        let headers = IdentityForwarder::headers(&identity).unwrap();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers[USER_EMAIL_HEADER], "");
    }

    #[test]
    fn test_unencodable_identity_is_rejected() {
        let identity = Identity::new(UserId::new("line\nbreak").unwrap(), None);
        let err = IdentityForwarder::headers(&identity).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
