//! Event log and wipe endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rollcall_common::api::AppendLogRequest;
use rollcall_common::{EventLogEntry, RosterStore};
use tracing::{debug, info};

use super::ApiError;
use crate::AppState;

/// GET /log
pub async fn get_log(State(state): State<AppState>) -> Result<Json<Vec<EventLogEntry>>, ApiError> {
    Ok(Json(state.store.load_log().await?))
}

/// POST /log
///
/// The timestamp is taken on the server when the entry is stored.
pub async fn append_log(
    State(state): State<AppState>,
    payload: Result<Json<AppendLogRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload?;
    let _guard = state.write_lock.lock().await;
    state
        .store
        .append_log(&request.full_name, &request.group, &request.status_text)
        .await?;
    debug!("Logged: {} ({}) {}", request.full_name, request.group, request.status_text);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /clear
pub async fn clear_all(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let _guard = state.write_lock.lock().await;
    state.store.clear_all().await?;
    info!("All roster data cleared by client request");
    Ok(StatusCode::NO_CONTENT)
}

pub fn log_routes() -> Router<AppState> {
    Router::new()
        .route("/log", get(get_log).post(append_log))
        .route("/clear", post(clear_all))
}
