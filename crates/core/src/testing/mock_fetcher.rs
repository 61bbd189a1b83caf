//! Mock catalog fetcher for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::catalog::{Cask, Formula};
use crate::sync::{CatalogFetcher, FetchError};

/// Mock implementation of the CatalogFetcher trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable formula/cask payloads
/// - Simulate non-2xx failures per catalog
/// - Optional artificial fetch delay (for single-flight tests)
/// - Track fetch counts for assertions
pub struct MockCatalogFetcher {
    formulae: Arc<RwLock<Vec<Formula>>>,
    casks: Arc<RwLock<Vec<Cask>>>,
    formula_failure: Arc<RwLock<Option<u16>>>,
    cask_failure: Arc<RwLock<Option<u16>>>,
    fetch_delay: Arc<RwLock<Option<Duration>>>,
    formula_fetches: Arc<AtomicU32>,
    cask_fetches: Arc<AtomicU32>,
}

impl Default for MockCatalogFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalogFetcher {
    /// Create a new mock fetcher with empty payloads.
    pub fn new() -> Self {
        Self {
            formulae: Arc::new(RwLock::new(Vec::new())),
            casks: Arc::new(RwLock::new(Vec::new())),
            formula_failure: Arc::new(RwLock::new(None)),
            cask_failure: Arc::new(RwLock::new(None)),
            fetch_delay: Arc::new(RwLock::new(None)),
            formula_fetches: Arc::new(AtomicU32::new(0)),
            cask_fetches: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Set the formula payload returned by subsequent fetches.
    pub async fn set_formulae(&self, formulae: Vec<Formula>) {
        *self.formulae.write().await = formulae;
    }

    /// Set the cask payload returned by subsequent fetches.
    pub async fn set_casks(&self, casks: Vec<Cask>) {
        *self.casks.write().await = casks;
    }

    /// Make formula fetches fail with the given HTTP status.
    pub async fn fail_formulae_with_status(&self, status: u16) {
        *self.formula_failure.write().await = Some(status);
    }

    /// Make cask fetches fail with the given HTTP status.
    pub async fn fail_casks_with_status(&self, status: u16) {
        *self.cask_failure.write().await = Some(status);
    }

    /// Delay every fetch by the given duration.
    pub async fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.write().await = Some(delay);
    }

    /// Number of formula fetches performed.
    pub fn formula_fetch_count(&self) -> u32 {
        self.formula_fetches.load(Ordering::SeqCst)
    }

    /// Number of cask fetches performed.
    pub fn cask_fetch_count(&self) -> u32 {
        self.cask_fetches.load(Ordering::SeqCst)
    }

    async fn apply_delay(&self) {
        if let Some(delay) = *self.fetch_delay.read().await {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl CatalogFetcher for MockCatalogFetcher {
    async fn fetch_formulae(&self) -> Result<Vec<Formula>, FetchError> {
        self.formula_fetches.fetch_add(1, Ordering::SeqCst);
        self.apply_delay().await;

        if let Some(status) = *self.formula_failure.read().await {
            return Err(FetchError::Status {
                status,
                url: "mock://formula.json".to_string(),
            });
        }

        Ok(self.formulae.read().await.clone())
    }

    async fn fetch_casks(&self) -> Result<Vec<Cask>, FetchError> {
        self.cask_fetches.fetch_add(1, Ordering::SeqCst);
        self.apply_delay().await;

        if let Some(status) = *self.cask_failure.read().await {
            return Err(FetchError::Status {
                status,
                url: "mock://cask.json".to_string(),
            });
        }

        Ok(self.casks.read().await.clone())
    }
}
