use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{handlers, middleware, packages, search, sync, userdata, ws};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Search
        .route("/search", get(search::search))
        .route("/search/count", get(search::count))
        // Packages
        .route("/packages/counts", get(packages::get_counts))
        .route("/packages/{type}/{id}", get(packages::get_package))
        .route("/packages/{type}/{id}/tags", get(userdata::get_tags))
        // Sync
        .route("/sync", post(sync::trigger_sync))
        .route("/sync/status", get(sync::get_status))
        // Favorites
        .route("/favorites/toggle", post(userdata::toggle_favorite))
        .route("/favorites/{type}/{id}", get(userdata::is_favorite))
        // Tags
        .route("/tags", get(userdata::list_tags))
        .route("/tags", post(userdata::add_tag))
        .route("/tags", delete(userdata::remove_tag))
        .route("/tags/{text}/items", get(userdata::get_items_with_tag))
        .route("/tags/{text}/rename", post(userdata::rename_tag))
        .route("/tags/{text}", delete(userdata::delete_tag))
        // Observability
        .route("/metrics", get(handlers::get_metrics))
        .route("/ws", get(ws::ws_handler))
        .layer(axum_middleware::from_fn(middleware::metrics_middleware))
        .with_state(state);

    Router::new().nest("/api/v1", api_routes).layer(
        TraceLayer::new_for_http(),
    )
}
