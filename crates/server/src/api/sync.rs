//! Sync API handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use brewdex_core::{SyncError, SyncOutcome, SyncStatus};

use super::{internal_error, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SyncRequest {
    #[serde(default)]
    pub force: bool,
}

/// POST /api/v1/sync
///
/// Run a sync and return its outcome. Progress is streamed on /ws while
/// the request is in flight. A request issued during a running sync
/// returns the `already_running` outcome.
pub async fn trigger_sync(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<SyncOutcome>, (StatusCode, Json<ErrorResponse>)> {
    match state.sync_manager().sync(request.force).await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(e @ SyncError::Fetch { .. }) => Err((
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
        Err(e @ SyncError::Storage(_)) => Err(internal_error(e)),
    }
}

/// GET /api/v1/sync/status
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SyncStatus>, (StatusCode, Json<ErrorResponse>)> {
    let status = state.sync_manager().status().map_err(internal_error)?;
    Ok(Json(status))
}
