//! Types for the local package store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::PackageType;

/// Meta table key holding the last successful sync time (epoch millis).
pub const META_LAST_SYNC_TIME: &str = "last_sync_time";

/// A persisted favorite marker.
///
/// Favorites are modeled as row presence: at most one row per
/// `(package_id, package_type)` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteRow {
    /// Surrogate row id.
    pub id: String,
    pub package_id: String,
    pub package_type: PackageType,
    pub created_at: DateTime<Utc>,
}

/// A persisted user tag on a package.
///
/// At most one row per `(package_id, package_type, tag)`; the tag text is
/// stored case-sensitively and compared case-insensitively only at query
/// time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRow {
    /// Surrogate row id.
    pub id: String,
    pub package_id: String,
    pub package_type: PackageType,
    pub tag: String,
    pub created_at: DateTime<Utc>,
}

/// Errors for local store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    /// A stored row could not be decoded back into its domain type.
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}
