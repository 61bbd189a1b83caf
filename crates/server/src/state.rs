use std::sync::Arc;

use brewdex_core::{
    ChangeHub, Config, PackageStore, SanitizedConfig, SearchEngine, SyncManager, UserDataStore,
};

/// Shared application state
pub struct AppState {
    config: Config,
    store: Arc<dyn PackageStore>,
    sync_manager: Arc<SyncManager>,
    engine: SearchEngine,
    userdata: Arc<UserDataStore>,
    hub: ChangeHub,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn PackageStore>,
        sync_manager: Arc<SyncManager>,
        engine: SearchEngine,
        userdata: Arc<UserDataStore>,
        hub: ChangeHub,
    ) -> Self {
        Self {
            config,
            store,
            sync_manager,
            engine,
            userdata,
            hub,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn store(&self) -> &dyn PackageStore {
        self.store.as_ref()
    }

    pub fn sync_manager(&self) -> &SyncManager {
        &self.sync_manager
    }

    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    pub fn userdata(&self) -> &UserDataStore {
        &self.userdata
    }

    pub fn hub(&self) -> &ChangeHub {
        &self.hub
    }
}
