pub mod handlers;
pub mod middleware;
pub mod packages;
pub mod routes;
pub mod search;
pub mod sync;
pub mod userdata;
pub mod ws;

pub use routes::create_router;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// JSON error body shared by every handler.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map a store failure to a 500 with a JSON body.
pub fn internal_error(e: impl std::fmt::Display) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

/// Parse a `{type}` path segment, rejecting anything but the two kinds.
pub fn parse_package_type(
    s: &str,
) -> Result<brewdex_core::PackageType, (StatusCode, Json<ErrorResponse>)> {
    brewdex_core::PackageType::parse(s).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("unknown package type: {s}"),
            }),
        )
    })
}
