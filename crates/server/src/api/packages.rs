//! Package lookup API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use brewdex_core::{Cask, Formula, PackageType};

use super::{internal_error, parse_package_type, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CountsResponse {
    pub formula_count: u64,
    pub cask_count: u64,
    pub total: u64,
}

/// Full record of either package kind.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PackageDetail {
    Formula { record: Formula },
    Cask { record: Cask },
}

/// GET /api/v1/packages/counts
pub async fn get_counts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CountsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let formula_count = state.store().formula_count().map_err(internal_error)?;
    let cask_count = state.store().cask_count().map_err(internal_error)?;
    Ok(Json(CountsResponse {
        formula_count,
        cask_count,
        total: formula_count + cask_count,
    }))
}

/// GET /api/v1/packages/{type}/{id}
pub async fn get_package(
    State(state): State<Arc<AppState>>,
    Path((type_str, id)): Path<(String, String)>,
) -> Result<Json<PackageDetail>, (StatusCode, Json<ErrorResponse>)> {
    let package_type = parse_package_type(&type_str)?;

    let detail = match package_type {
        PackageType::Formula => state
            .store()
            .get_formula(&id)
            .map_err(internal_error)?
            .map(|record| PackageDetail::Formula { record }),
        PackageType::Cask => state
            .store()
            .get_cask(&id)
            .map_err(internal_error)?
            .map(|record| PackageDetail::Cask { record }),
    };

    match detail {
        Some(detail) => Ok(Json(detail)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Package not found: {package_type}/{id}"),
            }),
        )),
    }
}
