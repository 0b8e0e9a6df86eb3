// ============================================================================
// Gateway Router
// ============================================================================
//
// Caller-facing routes. Handlers stay thin: they pass the raw headers, path
// segments and body bytes to the ResourceProxy, which owns authentication,
// validation and forwarding.
//
// Routing rules:
// - /api/lists/*   -> store /api/v1/lists/*
// - /api/items/*   -> store /api/v1/items/*
// - /api/auth/me   -> answered locally from the verified session
// - /health*       -> local liveness / readiness
//
// ============================================================================

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post, put},
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use tasklist_config::MAX_REQUEST_BODY_SIZE;
use tasklist_error::AppResult;

use crate::gateway::proxy::{Forwarded, RawBody, RawPath, ResourceProxy};

/// Gateway router state
pub struct GatewayState {
    pub proxy: ResourceProxy,
}

pub fn create_router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .route("/api/auth/me", get(current_user))
        .route("/api/lists", get(list_lists).post(create_list))
        .route("/api/lists/:list_id", get(get_list).delete(delete_list))
        .route("/api/lists/:list_id/name", put(rename_list))
        .route("/api/lists/:list_id/items", get(list_items).post(create_item))
        .route("/api/items/:item_id", patch(update_item).delete(delete_item))
        .route("/api/items/:item_id/toggle-complete", patch(toggle_item))
        .route("/api/items/:item_id/restore", post(restore_item))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE))
                .into_inner(),
        )
        .with_state(state)
}

// ===== Lists =====

async fn list_lists(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
) -> AppResult<Forwarded> {
    state.proxy.list_lists(&headers).await
}

async fn create_list(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    body: RawBody,
) -> AppResult<Forwarded> {
    state.proxy.create_list(&headers, body).await
}

async fn get_list(
    State(state): State<Arc<GatewayState>>,
    list_id: RawPath,
    headers: HeaderMap,
) -> AppResult<Forwarded> {
    state.proxy.get_list(&headers, list_id).await
}

async fn rename_list(
    State(state): State<Arc<GatewayState>>,
    list_id: RawPath,
    headers: HeaderMap,
    body: RawBody,
) -> AppResult<Forwarded> {
    state.proxy.rename_list(&headers, list_id, body).await
}

async fn delete_list(
    State(state): State<Arc<GatewayState>>,
    list_id: RawPath,
    headers: HeaderMap,
) -> AppResult<Forwarded> {
    state.proxy.delete_list(&headers, list_id).await
}

// ===== Items =====

async fn list_items(
    State(state): State<Arc<GatewayState>>,
    list_id: RawPath,
    headers: HeaderMap,
) -> AppResult<Forwarded> {
    state.proxy.list_items(&headers, list_id).await
}

async fn create_item(
    State(state): State<Arc<GatewayState>>,
    list_id: RawPath,
    headers: HeaderMap,
    body: RawBody,
) -> AppResult<Forwarded> {
    state.proxy.create_item(&headers, list_id, body).await
}

async fn update_item(
    State(state): State<Arc<GatewayState>>,
    item_id: RawPath,
    headers: HeaderMap,
    body: RawBody,
) -> AppResult<Forwarded> {
    state.proxy.update_item(&headers, item_id, body).await
}

async fn toggle_item(
    State(state): State<Arc<GatewayState>>,
    item_id: RawPath,
    headers: HeaderMap,
) -> AppResult<Forwarded> {
    state.proxy.toggle_item(&headers, item_id).await
}

async fn delete_item(
    State(state): State<Arc<GatewayState>>,
    item_id: RawPath,
    headers: HeaderMap,
) -> AppResult<Forwarded> {
    state.proxy.delete_item(&headers, item_id).await
}

async fn restore_item(
    State(state): State<Arc<GatewayState>>,
    item_id: RawPath,
    headers: HeaderMap,
) -> AppResult<Forwarded> {
    state.proxy.restore_item(&headers, item_id).await
}

// ===== Session & health =====

async fn current_user(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let identity = state.proxy.authenticate(&headers).await?;
    Ok(Json(json!({
        "userId": identity.user_id,
        "email": identity.email,
    })))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// Ready only when the backing store answers its own health check
async fn readiness_check(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    if state.proxy.client().check_health().await {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable", "store": state.proxy.client().base_url() })),
        )
    }
}
