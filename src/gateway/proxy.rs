// ============================================================================
// Resource Proxy
// ============================================================================
//
// One method per resource/verb pair. Every method runs the same pipeline:
//
//   1. verify the session (401 before any network traffic)
//   2. parse path ids and the body, apply domain rules (400, not forwarded)
//   3. exactly one call to the store with identity headers attached
//   4. translate the reply to camelCase, or map the failure to AppError
//
// ============================================================================

use axum::{
    Json,
    body::Bytes,
    extract::{
        Path,
        rejection::{BytesRejection, PathRejection},
    },
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use tasklist_config::{LoggingConfig, MAX_REQUEST_BODY_SIZE};
use tasklist_error::{AppError, AppResult};
use tasklist_types::{Identity, NewList};

use crate::auth::SessionVerifier;
use crate::domain::{CreateItemRequest, UpdateItemRequest, lists};
use crate::gateway::service_client::StoreClient;
use crate::gateway::wire::{to_camel_case_keys, to_snake_case_keys};
use crate::utils::log_user;

/// Request body as read by axum, parsed by the proxy itself
pub type RawBody = Result<Bytes, BytesRejection>;

/// Single path parameter; a segment axum cannot decode is reported after
/// authentication, inside the usual envelope
pub type RawPath = Result<Path<String>, PathRejection>;

/// A successful store reply, already in caller-facing shape
#[derive(Debug)]
pub struct Forwarded {
    pub status: StatusCode,
    pub body: Value,
}

impl IntoResponse for Forwarded {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub struct ResourceProxy {
    verifier: Arc<dyn SessionVerifier>,
    client: StoreClient,
    logging: LoggingConfig,
}

impl ResourceProxy {
    pub fn new(verifier: Arc<dyn SessionVerifier>, client: StoreClient, logging: LoggingConfig) -> Self {
        Self {
            verifier,
            client,
            logging,
        }
    }

    pub fn client(&self) -> &StoreClient {
        &self.client
    }

    /// Resolve the caller, or fail before any domain logic runs
    pub async fn authenticate(&self, headers: &HeaderMap) -> AppResult<Identity> {
        self.verifier
            .verify(headers)
            .await
            .ok_or_else(|| AppError::unauthenticated("Not authenticated"))
    }

    // ===== Lists =====

    pub async fn list_lists(&self, headers: &HeaderMap) -> AppResult<Forwarded> {
        let identity = self.authenticate(headers).await?;
        self.forward(Method::GET, "/api/v1/lists".to_string(), &identity, None)
            .await
    }

    pub async fn create_list(&self, headers: &HeaderMap, body: RawBody) -> AppResult<Forwarded> {
        let identity = self.authenticate(headers).await?;
        let request: NewList = parse_body(body)?;
        let list = lists::normalize_new_list(request).map_err(|e| e.into_bad_request())?;

        let forwarded = self
            .forward(Method::POST, "/api/v1/lists".to_string(), &identity, Some(to_json(&list)?))
            .await?;
        info!(
            user = %log_user(&self.logging, &identity.user_id),
            list_id = ?forwarded.body.get("id"),
            "List created"
        );
        Ok(forwarded)
    }

    pub async fn get_list(&self, headers: &HeaderMap, list_id: RawPath) -> AppResult<Forwarded> {
        let identity = self.authenticate(headers).await?;
        let list_id = path_id(list_id, "list")?;
        self.forward(Method::GET, format!("/api/v1/lists/{}", list_id), &identity, None)
            .await
    }

    pub async fn rename_list(
        &self,
        headers: &HeaderMap,
        list_id: RawPath,
        body: RawBody,
    ) -> AppResult<Forwarded> {
        let identity = self.authenticate(headers).await?;
        let list_id = path_id(list_id, "list")?;
        let request: NewList = parse_body(body)?;
        let rename = lists::normalize_new_list(request).map_err(|e| e.into_bad_request())?;

        self.forward(
            Method::PUT,
            format!("/api/v1/lists/{}/name", list_id),
            &identity,
            Some(to_json(&rename)?),
        )
        .await
    }

    pub async fn delete_list(&self, headers: &HeaderMap, list_id: RawPath) -> AppResult<Forwarded> {
        let identity = self.authenticate(headers).await?;
        let list_id = path_id(list_id, "list")?;

        let forwarded = self
            .forward(Method::DELETE, format!("/api/v1/lists/{}", list_id), &identity, None)
            .await?;
        info!(
            user = %log_user(&self.logging, &identity.user_id),
            list_id = list_id,
            deleted_items = ?forwarded.body.get("deletedItems"),
            "List deleted"
        );
        Ok(forwarded)
    }

    // ===== Items =====

    pub async fn list_items(&self, headers: &HeaderMap, list_id: RawPath) -> AppResult<Forwarded> {
        let identity = self.authenticate(headers).await?;
        let list_id = path_id(list_id, "list")?;
        self.forward(Method::GET, format!("/api/v1/lists/{}/items", list_id), &identity, None)
            .await
    }

    pub async fn create_item(
        &self,
        headers: &HeaderMap,
        list_id: RawPath,
        body: RawBody,
    ) -> AppResult<Forwarded> {
        let identity = self.authenticate(headers).await?;
        let list_id = path_id(list_id, "list")?;
        let request: CreateItemRequest = parse_body(body)?;
        let item = request.normalize().map_err(|e| e.into_bad_request())?;

        self.forward(
            Method::POST,
            format!("/api/v1/lists/{}/items", list_id),
            &identity,
            Some(to_json(&item)?),
        )
        .await
    }

    pub async fn update_item(
        &self,
        headers: &HeaderMap,
        item_id: RawPath,
        body: RawBody,
    ) -> AppResult<Forwarded> {
        let identity = self.authenticate(headers).await?;
        let item_id = path_id(item_id, "item")?;
        let request: UpdateItemRequest = parse_body(body)?;
        let patch = request.normalize().map_err(|e| e.into_bad_request())?;

        self.forward(
            Method::PATCH,
            format!("/api/v1/items/{}", item_id),
            &identity,
            Some(to_json(&patch)?),
        )
        .await
    }

    pub async fn toggle_item(&self, headers: &HeaderMap, item_id: RawPath) -> AppResult<Forwarded> {
        let identity = self.authenticate(headers).await?;
        let item_id = path_id(item_id, "item")?;
        self.forward(
            Method::PATCH,
            format!("/api/v1/items/{}/toggle-complete", item_id),
            &identity,
            None,
        )
        .await
    }

    pub async fn delete_item(&self, headers: &HeaderMap, item_id: RawPath) -> AppResult<Forwarded> {
        let identity = self.authenticate(headers).await?;
        let item_id = path_id(item_id, "item")?;

        let forwarded = self
            .forward(Method::DELETE, format!("/api/v1/items/{}", item_id), &identity, None)
            .await?;
        info!(
            user = %log_user(&self.logging, &identity.user_id),
            item_id = item_id,
            "Item soft-deleted"
        );
        Ok(forwarded)
    }

    pub async fn restore_item(&self, headers: &HeaderMap, item_id: RawPath) -> AppResult<Forwarded> {
        let identity = self.authenticate(headers).await?;
        let item_id = path_id(item_id, "item")?;

        let forwarded = self
            .forward(
                Method::POST,
                format!("/api/v1/items/{}/restore", item_id),
                &identity,
                None,
            )
            .await?;
        info!(
            user = %log_user(&self.logging, &identity.user_id),
            item_id = item_id,
            "Item restored"
        );
        Ok(forwarded)
    }

    async fn forward(
        &self,
        method: Method,
        path: String,
        identity: &Identity,
        body: Option<Value>,
    ) -> AppResult<Forwarded> {
        let response = self
            .client
            .send(method, &path, identity, body.as_ref())
            .await?;

        Ok(Forwarded {
            status: response.status,
            body: to_camel_case_keys(response.body),
        })
    }
}

/// Decode and check a path id. Segments that are not UTF-8 get the same 400
pub fn path_id(path: RawPath, kind: &str) -> AppResult<i64> {
    let Path(raw) = path.map_err(|e| {
        tracing::debug!(error = %e, "Rejected path parameter");
        AppError::validation(format!("Invalid {} id", kind))
    })?;
    parse_id(&raw, kind)
}

/// Path ids are positive integers; anything else never reaches the store
pub fn parse_id(raw: &str, kind: &str) -> AppResult<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(AppError::validation(format!("Invalid {} id: {}", kind, raw))),
    }
}

/// Caller JSON (camelCase) -> typed request. Every failure is a 400 envelope.
pub fn parse_body<T: DeserializeOwned>(body: RawBody) -> AppResult<T> {
    let bytes = body.map_err(|e| {
        tracing::debug!(error = %e, "Failed to read request body");
        if is_body_too_large(&e) {
            AppError::validation(body_too_large_detail())
        } else {
            AppError::validation("Request body could not be read")
        }
    })?;
    if bytes.is_empty() {
        return Err(AppError::validation("Request body is required"));
    }

    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|_| AppError::validation("Request body must be valid JSON"))?;
    if !value.is_object() {
        return Err(AppError::validation("Request body must be a JSON object"));
    }

    serde_json::from_value(to_snake_case_keys(value))
        .map_err(|e| AppError::validation(format!("Invalid request body: {}", e)))
}

/// DefaultBodyLimit surfaces as a 413 rejection from the Bytes extractor
pub fn is_body_too_large(rejection: &BytesRejection) -> bool {
    rejection.status() == StatusCode::PAYLOAD_TOO_LARGE
}

pub fn body_too_large_detail() -> String {
    format!("Request body exceeds the {} byte limit", MAX_REQUEST_BODY_SIZE)
}

fn to_json<T: Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::internal(format!("Failed to encode store request: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklist_types::{ItemPatch, Patch, Priority};

    fn raw(body: &str) -> RawBody {
        Ok(Bytes::from(body.to_string()))
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12", "list").unwrap(), 12);
        for bad in ["0", "-3", "abc", "1.5", ""] {
            let err = parse_id(bad, "list").unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_parse_body_translates_caller_keys() {
        let request: UpdateItemRequest = parse_body(raw(r#"{"dueDate": "2026-02-01"}"#)).unwrap();
        assert!(request.due_date.as_value().is_some());
        assert!(request.priority.is_absent());
    }

    #[test]
    fn test_parse_body_rejects_malformed_input() {
        for body in ["", "{not json", "[1,2]", r#"{"status": "done"}"#] {
            let result: AppResult<UpdateItemRequest> = parse_body(raw(body));
            assert_eq!(result.unwrap_err().status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_patch_forwarding_keeps_explicit_null() {
        let patch = ItemPatch {
            priority: Patch::Null,
            ..Default::default()
        };
        assert_eq!(to_json(&patch).unwrap(), serde_json::json!({ "priority": null }));

        let patch = ItemPatch {
            priority: Patch::Value(Priority::High),
            ..Default::default()
        };
        assert_eq!(to_json(&patch).unwrap(), serde_json::json!({ "priority": "high" }));
    }
}
