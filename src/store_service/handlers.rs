// ============================================================================
// Store Service Handlers
// ============================================================================
//
// snake_case JSON in and out. Identity comes from TrustedUser (Trust Boundary
// pattern: the gateway sets X-User-Id / X-User-Email). Malformed bodies and
// path ids are answered with 422, like any other failed re-validation.
//
// ============================================================================

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use tasklist_error::{AppError, AppResult};
use tasklist_types::{ItemPatch, NewItem, NewList};

use crate::gateway::proxy::{RawBody, RawPath, body_too_large_detail, is_body_too_large};
use crate::routes::extractors::TrustedUser;
use crate::store_service::StoreServiceContext;

fn path_id(path: RawPath) -> AppResult<i64> {
    let Path(raw) = path.map_err(|_| AppError::unprocessable("Invalid id"))?;
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id >= 1)
        .ok_or_else(|| AppError::unprocessable(format!("Invalid id: {}", raw)))
}

fn json_body<T: DeserializeOwned>(body: RawBody) -> AppResult<T> {
    let bytes = body.map_err(|e| {
        if is_body_too_large(&e) {
            AppError::unprocessable(body_too_large_detail())
        } else {
            AppError::unprocessable("Request body could not be read")
        }
    })?;
    if bytes.is_empty() {
        return Err(AppError::unprocessable("Request body is required"));
    }
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::unprocessable(format!("Invalid request body: {}", e)))
}

// ===== Lists =====

pub async fn list_lists(
    State(context): State<Arc<StoreServiceContext>>,
    user: TrustedUser,
) -> impl IntoResponse {
    Json(context.store.list_lists(&user.0.user_id).await)
}

pub async fn create_list(
    State(context): State<Arc<StoreServiceContext>>,
    user: TrustedUser,
    body: RawBody,
) -> AppResult<impl IntoResponse> {
    let body: NewList = json_body(body)?;
    let list = context.store.create_list(&user.0.user_id, body).await?;
    tracing::debug!(list_id = list.id, "List stored");
    Ok((StatusCode::CREATED, Json(list)))
}

pub async fn get_list(
    State(context): State<Arc<StoreServiceContext>>,
    user: TrustedUser,
    list_id: RawPath,
) -> AppResult<impl IntoResponse> {
    let list = context
        .store
        .get_list(&user.0.user_id, path_id(list_id)?)
        .await?;
    Ok(Json(list))
}

pub async fn rename_list(
    State(context): State<Arc<StoreServiceContext>>,
    user: TrustedUser,
    list_id: RawPath,
    body: RawBody,
) -> AppResult<impl IntoResponse> {
    let list_id = path_id(list_id)?;
    let body: NewList = json_body(body)?;
    let list = context
        .store
        .rename_list(&user.0.user_id, list_id, body)
        .await?;
    Ok(Json(list))
}

pub async fn delete_list(
    State(context): State<Arc<StoreServiceContext>>,
    user: TrustedUser,
    list_id: RawPath,
) -> AppResult<impl IntoResponse> {
    let deleted = context
        .store
        .delete_list(&user.0.user_id, path_id(list_id)?)
        .await?;
    tracing::debug!(
        list_id = deleted.id,
        deleted_items = deleted.deleted_items,
        "List removed"
    );
    Ok(Json(deleted))
}

// ===== Items =====

pub async fn list_items(
    State(context): State<Arc<StoreServiceContext>>,
    user: TrustedUser,
    list_id: RawPath,
) -> AppResult<impl IntoResponse> {
    let items = context
        .store
        .list_items(&user.0.user_id, path_id(list_id)?)
        .await?;
    Ok(Json(items))
}

pub async fn create_item(
    State(context): State<Arc<StoreServiceContext>>,
    user: TrustedUser,
    list_id: RawPath,
    body: RawBody,
) -> AppResult<impl IntoResponse> {
    let list_id = path_id(list_id)?;
    let body: NewItem = json_body(body)?;
    let item = context
        .store
        .create_item(&user.0.user_id, list_id, body)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(context): State<Arc<StoreServiceContext>>,
    user: TrustedUser,
    item_id: RawPath,
    body: RawBody,
) -> AppResult<impl IntoResponse> {
    let item_id = path_id(item_id)?;
    let patch: ItemPatch = json_body(body)?;
    let item = context
        .store
        .update_item(&user.0.user_id, item_id, patch)
        .await?;
    Ok(Json(item))
}

pub async fn toggle_item(
    State(context): State<Arc<StoreServiceContext>>,
    user: TrustedUser,
    item_id: RawPath,
) -> AppResult<impl IntoResponse> {
    let item = context
        .store
        .toggle_item(&user.0.user_id, path_id(item_id)?)
        .await?;
    Ok(Json(item))
}

pub async fn delete_item(
    State(context): State<Arc<StoreServiceContext>>,
    user: TrustedUser,
    item_id: RawPath,
) -> AppResult<impl IntoResponse> {
    let deleted = context
        .store
        .delete_item(&user.0.user_id, path_id(item_id)?)
        .await?;
    tracing::debug!(
        item_id = deleted.id,
        restorable_until = %deleted.restorable_until,
        "Item soft-deleted"
    );
    Ok(Json(deleted))
}

pub async fn restore_item(
    State(context): State<Arc<StoreServiceContext>>,
    user: TrustedUser,
    item_id: RawPath,
) -> AppResult<impl IntoResponse> {
    let item = context
        .store
        .restore_item(&user.0.user_id, path_id(item_id)?)
        .await?;
    Ok(Json(item))
}

pub async fn health_check() -> &'static str {
    "ok"
}
