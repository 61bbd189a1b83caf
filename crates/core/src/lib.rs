pub mod catalog;
pub mod config;
pub mod events;
pub mod metrics;
pub mod search;
pub mod store;
pub mod sync;
pub mod testing;
pub mod userdata;

pub use catalog::{
    package_key, Cask, CaskDependsOn, Dependency, DependencyKind, Formula, FormulaVersions,
    PackageRecord, PackageType,
};
pub use config::{
    load_config, load_config_from_str, resolve_config, validate_config, Config, ConfigError,
    DatabaseConfig, SanitizedConfig, ServerConfig, SyncConfig,
};
pub use events::{ChangeEvent, ChangeHub};
pub use search::{parse_query, match_score, ParsedQuery, SearchEngine, SearchRequest, TypeFilter};
pub use store::{FavoriteRow, PackageStore, SqliteStore, StoreError, TagRow};
pub use sync::{
    CatalogFetcher, FetchError, HttpCatalogFetcher, ProgressCallback, SyncError, SyncManager,
    SyncOutcome, SyncProgress, SyncStage, SyncStatus,
};
pub use userdata::{MetadataSnapshot, UserDataError, UserDataStore};
