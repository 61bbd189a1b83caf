//! Durable local storage for the mirrored catalog and user metadata.
//!
//! The store owns five tables: `formulae` and `casks` (immutable between
//! syncs), `favorites` and `tags` (mutable user data), and `meta` (sync
//! metadata). Catalog replacement goes through staging tables so readers
//! never observe a half-written or empty catalog.

mod migrations;
mod sqlite;
mod types;

pub use migrations::{apply_migrations, latest_version, Migration, MIGRATIONS};
pub use sqlite::SqliteStore;
pub use types::*;

use crate::catalog::{Cask, Formula, PackageRecord, PackageType};

/// Trait for the durable package store.
pub trait PackageStore: Send + Sync {
    // Catalog replacement. Records are written into a staging table in
    // caller-sized batches; the commit swaps staging in atomically, so a
    // failed sync leaves the previous catalog intact.

    /// Create (or reset) the staging table for one catalog.
    fn begin_catalog_replace(&self, kind: PackageType) -> Result<(), StoreError>;

    /// Append a batch of formulae to the formula staging table.
    fn stage_formulae(&self, batch: &[Formula]) -> Result<(), StoreError>;

    /// Append a batch of casks to the cask staging table.
    fn stage_casks(&self, batch: &[Cask]) -> Result<(), StoreError>;

    /// Atomically replace the live catalog table with its staging table.
    fn commit_catalog_replace(&self, kind: PackageType) -> Result<(), StoreError>;

    /// Drop the staging table without touching the live catalog.
    fn abort_catalog_replace(&self, kind: PackageType) -> Result<(), StoreError>;

    // Catalog reads.

    /// All records of both catalogs as the unified read-side view.
    fn all_packages(&self) -> Result<Vec<PackageRecord>, StoreError>;

    /// Point lookup by identity key; `None` for missing keys.
    fn get_formula(&self, name: &str) -> Result<Option<Formula>, StoreError>;

    /// Point lookup by identity key; `None` for missing keys.
    fn get_cask(&self, token: &str) -> Result<Option<Cask>, StoreError>;

    fn formula_count(&self) -> Result<u64, StoreError>;

    fn cask_count(&self) -> Result<u64, StoreError>;

    // Sync metadata.

    /// Last successful sync time in epoch millis, if any sync completed.
    fn last_sync_time(&self) -> Result<Option<i64>, StoreError>;

    fn set_last_sync_time(&self, millis: i64) -> Result<(), StoreError>;

    // Favorites. Row-level operations; the metadata service keeps the
    // in-memory mirror consistent with these.

    fn list_favorites(&self) -> Result<Vec<FavoriteRow>, StoreError>;

    /// Returns true if a row was inserted, false if it already existed.
    fn insert_favorite(
        &self,
        package_id: &str,
        package_type: PackageType,
    ) -> Result<bool, StoreError>;

    /// Returns true if a row was deleted.
    fn delete_favorite(
        &self,
        package_id: &str,
        package_type: PackageType,
    ) -> Result<bool, StoreError>;

    // Tags.

    fn list_tags(&self) -> Result<Vec<TagRow>, StoreError>;

    /// Returns true if a row was inserted, false if it already existed.
    fn insert_tag(
        &self,
        package_id: &str,
        package_type: PackageType,
        tag: &str,
    ) -> Result<bool, StoreError>;

    /// Returns true if a row was deleted.
    fn delete_tag(
        &self,
        package_id: &str,
        package_type: PackageType,
        tag: &str,
    ) -> Result<bool, StoreError>;

    /// Number of rows currently carrying this exact tag text.
    fn count_rows_with_tag(&self, tag: &str) -> Result<u64, StoreError>;

    /// Rewrite every row with `old` to `new` in one transaction.
    ///
    /// Returns the number of rows renamed.
    fn rename_tag_rows(&self, old: &str, new: &str) -> Result<u64, StoreError>;

    /// Delete every row with this exact tag text.
    ///
    /// Returns the number of rows deleted.
    fn delete_tag_rows(&self, tag: &str) -> Result<u64, StoreError>;
}
