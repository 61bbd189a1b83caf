//! Favorites and tags API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use brewdex_core::{PackageType, UserDataError};

use super::{internal_error, parse_package_type, ErrorResponse};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PackageRef {
    pub package_id: String,
    pub package_type: PackageType,
}

#[derive(Debug, Deserialize)]
pub struct TagRequest {
    pub package_id: String,
    pub package_type: PackageType,
    pub tag: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub new: String,
}

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub favorited: bool,
}

#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TaggedItem {
    pub id: String,
    #[serde(rename = "type")]
    pub package_type: PackageType,
}

#[derive(Debug, Serialize)]
pub struct TagItemsResponse {
    pub exists: bool,
    pub items: Vec<TaggedItem>,
}

#[derive(Debug, Serialize)]
pub struct RenameResponse {
    pub renamed: u64,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: u64,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

fn map_userdata_error(e: UserDataError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        UserDataError::DuplicateTag(_) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        ),
        UserDataError::Store(_) => internal_error(e),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/favorites/toggle
pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PackageRef>,
) -> Result<Json<FavoriteResponse>, (StatusCode, Json<ErrorResponse>)> {
    let favorited = state
        .userdata()
        .toggle_favorite(&body.package_id, body.package_type)
        .map_err(map_userdata_error)?;
    Ok(Json(FavoriteResponse { favorited }))
}

/// GET /api/v1/favorites/{type}/{id}
pub async fn is_favorite(
    State(state): State<Arc<AppState>>,
    Path((type_str, id)): Path<(String, String)>,
) -> Result<Json<FavoriteResponse>, (StatusCode, Json<ErrorResponse>)> {
    let package_type = parse_package_type(&type_str)?;
    Ok(Json(FavoriteResponse {
        favorited: state.userdata().is_favorite(&id, package_type),
    }))
}

/// GET /api/v1/packages/{type}/{id}/tags
pub async fn get_tags(
    State(state): State<Arc<AppState>>,
    Path((type_str, id)): Path<(String, String)>,
) -> Result<Json<TagsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let package_type = parse_package_type(&type_str)?;
    Ok(Json(TagsResponse {
        tags: state.userdata().get_tags(&id, package_type),
    }))
}

/// POST /api/v1/tags
pub async fn add_tag(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TagRequest>,
) -> Result<Json<SuccessResponse>, (StatusCode, Json<ErrorResponse>)> {
    state
        .userdata()
        .add_tag(&body.package_id, body.package_type, &body.tag)
        .map_err(map_userdata_error)?;
    Ok(Json(SuccessResponse {
        message: format!("Tagged {}:{}", body.package_type, body.package_id),
    }))
}

/// DELETE /api/v1/tags
pub async fn remove_tag(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TagRequest>,
) -> Result<Json<SuccessResponse>, (StatusCode, Json<ErrorResponse>)> {
    state
        .userdata()
        .remove_tag(&body.package_id, body.package_type, &body.tag)
        .map_err(map_userdata_error)?;
    Ok(Json(SuccessResponse {
        message: format!("Untagged {}:{}", body.package_type, body.package_id),
    }))
}

/// GET /api/v1/tags
pub async fn list_tags(State(state): State<Arc<AppState>>) -> Json<TagsResponse> {
    Json(TagsResponse {
        tags: state.userdata().list_all_tags(),
    })
}

/// GET /api/v1/tags/{text}/items
///
/// Every package carrying the tag; an unknown tag yields an empty list,
/// with `exists` distinguishing the two cases.
pub async fn get_items_with_tag(
    State(state): State<Arc<AppState>>,
    Path(text): Path<String>,
) -> Json<TagItemsResponse> {
    let items = state
        .userdata()
        .get_items_with_tag(&text)
        .into_iter()
        .map(|(id, package_type)| TaggedItem { id, package_type })
        .collect();

    Json(TagItemsResponse {
        exists: state.userdata().tag_exists(&text),
        items,
    })
}

/// POST /api/v1/tags/{text}/rename
pub async fn rename_tag(
    State(state): State<Arc<AppState>>,
    Path(text): Path<String>,
    Json(body): Json<RenameRequest>,
) -> Result<Json<RenameResponse>, (StatusCode, Json<ErrorResponse>)> {
    let renamed = state
        .userdata()
        .rename_tag(&text, &body.new)
        .map_err(map_userdata_error)?;
    Ok(Json(RenameResponse { renamed }))
}

/// DELETE /api/v1/tags/{text}
pub async fn delete_tag(
    State(state): State<Arc<AppState>>,
    Path(text): Path<String>,
) -> Result<Json<DeleteResponse>, (StatusCode, Json<ErrorResponse>)> {
    let deleted = state
        .userdata()
        .delete_tag(&text)
        .map_err(map_userdata_error)?;
    Ok(Json(DeleteResponse { deleted }))
}
