//! rollcall-server library
//!
//! Serves one SQLite roster database to any number of desk clients over
//! HTTP. The routes mirror the store operations one to one, so a desk
//! client in networked mode behaves the same as one working on a local file.

use axum::Router;
use rollcall_common::SqliteStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: SqliteStore,
    /// Held for every write and partition read so saves are never seen half done
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: SqliteStore) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::individuals_routes())
        .merge(api::log_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
