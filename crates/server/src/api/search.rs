//! Search API handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use brewdex_core::{parse_query, PackageRecord, SearchRequest, TypeFilter};

use super::{internal_error, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Free-text query in the mini-language (`#tag`, `*`).
    #[serde(default, rename = "q")]
    pub query: String,
    #[serde(default, rename = "type")]
    pub type_filter: TypeFilter,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub favorites_only: bool,
    #[serde(default = "default_hide_deprecated")]
    pub hide_deprecated: bool,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_hide_deprecated() -> bool {
    true
}

fn default_limit() -> usize {
    30
}

impl From<SearchParams> for SearchRequest {
    fn from(params: SearchParams) -> Self {
        Self {
            query: params.query,
            type_filter: params.type_filter,
            tag: params.tag,
            favorites_only: params.favorites_only,
            hide_deprecated: params.hide_deprecated,
            limit: params.limit,
            offset: params.offset,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub records: Vec<PackageRecord>,
    /// Partial tag under the cursor, for tag autocomplete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typing_tag: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: usize,
}

/// GET /api/v1/search
///
/// One ranked page of records for the given query and filters.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let typing_tag = parse_query(&params.query).typing_tag;
    let request = SearchRequest::from(params);

    let records = state.engine().search(&request).map_err(internal_error)?;
    Ok(Json(SearchResponse {
        records,
        typing_tag,
    }))
}

/// GET /api/v1/search/count
///
/// Total matching count under the same predicate as /search.
pub async fn count(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<CountResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request = SearchRequest::from(params);
    let count = state.engine().count(&request).map_err(internal_error)?;
    Ok(Json(CountResponse { count }))
}
