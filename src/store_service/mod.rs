// ============================================================================
// Store Service
// ============================================================================
//
// Reference backing store for local development and tests. It sits behind
// the gateway and trusts the identity headers it sets; it must never be
// exposed directly.
//
// ============================================================================

pub mod clock;
pub mod handlers;
pub mod memory;
pub mod reaper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use memory::MemoryStore;
pub use reaper::PurgeTask;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use tasklist_config::{MAX_REQUEST_BODY_SIZE, StoreConfig};

/// Store service context
pub struct StoreServiceContext {
    pub store: Arc<MemoryStore>,
    pub config: StoreConfig,
}

impl StoreServiceContext {
    pub fn new(config: StoreConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let undo_window =
            chrono::Duration::from_std(std::time::Duration::from_secs(config.undo_window_secs))
                .context("UNDO_WINDOW_SECS is out of range")?;

        Ok(Self {
            store: Arc::new(MemoryStore::new(clock, undo_window)),
            config,
        })
    }

    pub fn purge_task(&self) -> PurgeTask {
        PurgeTask::new(
            self.store.clone(),
            std::time::Duration::from_secs(self.config.purge_interval_secs),
        )
    }
}

pub fn create_router(context: Arc<StoreServiceContext>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/api/v1/lists",
            get(handlers::list_lists).post(handlers::create_list),
        )
        .route(
            "/api/v1/lists/:list_id",
            get(handlers::get_list).delete(handlers::delete_list),
        )
        .route("/api/v1/lists/:list_id/name", put(handlers::rename_list))
        .route(
            "/api/v1/lists/:list_id/items",
            get(handlers::list_items).post(handlers::create_item),
        )
        .route(
            "/api/v1/items/:item_id",
            patch(handlers::update_item).delete(handlers::delete_item),
        )
        .route(
            "/api/v1/items/:item_id/toggle-complete",
            patch(handlers::toggle_item),
        )
        .route("/api/v1/items/:item_id/restore", post(handlers::restore_item))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE))
                .into_inner(),
        )
        .with_state(context)
}
