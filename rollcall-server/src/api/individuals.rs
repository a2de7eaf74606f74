//! Partition read/replace endpoints
//!
//! `POST /individuals/:partition` replaces the whole partition with the
//! posted list, the same contract as a local partition save.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rollcall_common::api::PersonPayload;
use rollcall_common::{Partition, PersonRecord, RosterStore};
use tracing::info;

use super::ApiError;
use crate::AppState;

fn parse_partition(name: &str) -> Result<Partition, ApiError> {
    Ok(name.parse::<Partition>()?)
}

/// GET /individuals/:partition
pub async fn get_individuals(
    State(state): State<AppState>,
    Path(partition): Path<String>,
) -> Result<Json<Vec<PersonPayload>>, ApiError> {
    let partition = parse_partition(&partition)?;
    // Saves are delete-then-insert; never read one half done
    let _guard = state.write_lock.lock().await;
    let records = state.store.load_partition(partition).await?;
    Ok(Json(records.iter().map(PersonPayload::from).collect()))
}

/// POST /individuals/:partition
pub async fn save_individuals(
    State(state): State<AppState>,
    Path(partition): Path<String>,
    payload: Result<Json<Vec<PersonPayload>>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let partition = parse_partition(&partition)?;
    let Json(payload) = payload?;
    let records: Vec<PersonRecord> = payload.into_iter().map(PersonPayload::into_record).collect();

    let _guard = state.write_lock.lock().await;
    state.store.save_partition(partition, &records).await?;
    info!(partition = %partition, count = records.len(), "Partition replaced");
    Ok(StatusCode::NO_CONTENT)
}

pub fn individuals_routes() -> Router<AppState> {
    Router::new().route(
        "/individuals/:partition",
        get(get_individuals).post(save_individuals),
    )
}
