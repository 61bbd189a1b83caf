//! Sync manager implementation.
//!
//! Drives a sync run through its stages: check status, fetch both
//! catalogs, then replace both tables batch by batch behind the store's
//! staging swap. Only one run may be active at a time; a second request
//! while one is in flight is a no-op.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use crate::catalog::PackageType;
use crate::config::SyncConfig;
use crate::events::ChangeHub;
use crate::metrics;
use crate::store::{PackageStore, StoreError};

use super::fetcher::CatalogFetcher;
use super::types::{
    stage_span, SyncError, SyncOutcome, SyncProgress, SyncStage, SyncStatus,
};

/// Callback invoked with each progress report of a sync run.
pub type ProgressCallback = Arc<dyn Fn(SyncProgress) + Send + Sync>;

/// The sync manager - mirrors the remote catalogs into the local store.
pub struct SyncManager {
    config: SyncConfig,
    store: Arc<dyn PackageStore>,
    fetcher: Arc<dyn CatalogFetcher>,
    hub: ChangeHub,
    syncing: AtomicBool,
}

impl SyncManager {
    pub fn new(
        config: SyncConfig,
        store: Arc<dyn PackageStore>,
        fetcher: Arc<dyn CatalogFetcher>,
        hub: ChangeHub,
    ) -> Self {
        Self {
            config,
            store,
            fetcher,
            hub,
            syncing: AtomicBool::new(false),
        }
    }

    /// Whether a sync run is currently in flight.
    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::SeqCst)
    }

    /// Snapshot of the current sync state.
    pub fn status(&self) -> Result<SyncStatus, StoreError> {
        let formula_count = self.store.formula_count()?;
        let cask_count = self.store.cask_count()?;
        let last_sync_time = self.store.last_sync_time()?;
        let needs_sync = self.needs_sync(formula_count + cask_count, last_sync_time);

        Ok(SyncStatus {
            is_syncing: self.is_syncing(),
            last_sync_time,
            needs_sync,
            formula_count,
            cask_count,
        })
    }

    /// Run a sync, reporting progress only through the change hub.
    pub async fn sync(&self, force: bool) -> Result<SyncOutcome, SyncError> {
        self.sync_with_progress(force, None).await
    }

    /// Run a sync, reporting progress through the change hub and an
    /// optional callback.
    pub async fn sync_with_progress(
        &self,
        force: bool,
        on_progress: Option<ProgressCallback>,
    ) -> Result<SyncOutcome, SyncError> {
        if self.syncing.swap(true, Ordering::SeqCst) {
            warn!("Sync already in progress, ignoring request");
            metrics::SYNC_RUNS.with_label_values(&["already_running"]).inc();
            return Ok(SyncOutcome::AlreadyRunning);
        }

        let hub = self.hub.clone();
        let report = move |progress: SyncProgress| {
            hub.notify_sync_progress(progress.clone());
            if let Some(cb) = &on_progress {
                cb(progress);
            }
        };

        let started = Instant::now();
        let result = self.run(force, &report).await;
        metrics::SYNC_DURATION.observe(started.elapsed().as_secs_f64());

        match &result {
            Ok(SyncOutcome::Completed { .. }) => {
                metrics::SYNC_RUNS.with_label_values(&["completed"]).inc();
            }
            Ok(SyncOutcome::NotNeeded { .. }) => {
                metrics::SYNC_RUNS.with_label_values(&["not_needed"]).inc();
            }
            Ok(SyncOutcome::AlreadyRunning) => {}
            Err(e) => {
                metrics::SYNC_RUNS.with_label_values(&["error"]).inc();
                report(SyncProgress::new(SyncStage::Error, 0.0, e.to_string()));
            }
        }

        self.syncing.store(false, Ordering::SeqCst);
        result
    }

    fn needs_sync(&self, total_records: u64, last_sync_time: Option<i64>) -> bool {
        if total_records == 0 {
            return true;
        }
        match last_sync_time {
            None => true,
            Some(last) => {
                let window_ms = self.config.staleness_hours as i64 * 60 * 60 * 1000;
                Utc::now().timestamp_millis() - last > window_ms
            }
        }
    }

    async fn run(
        &self,
        force: bool,
        report: &(dyn Fn(SyncProgress) + Send + Sync),
    ) -> Result<SyncOutcome, SyncError> {
        report(SyncProgress::new(
            SyncStage::CheckingStatus,
            stage_span(SyncStage::CheckingStatus).start,
            "Checking sync status...",
        ));

        let formula_count = self.store.formula_count()?;
        let cask_count = self.store.cask_count()?;

        if !force {
            let last_sync_time = self.store.last_sync_time()?;
            if !self.needs_sync(formula_count + cask_count, last_sync_time) {
                report(SyncProgress::new(
                    SyncStage::Done,
                    100.0,
                    "Data is up to date",
                ));
                return Ok(SyncOutcome::NotNeeded {
                    formula_count,
                    cask_count,
                });
            }
        }

        report(SyncProgress::new(
            SyncStage::FetchingFormulae,
            stage_span(SyncStage::FetchingFormulae).start,
            "Fetching formulae data...",
        ));
        let formulae = self.fetcher.fetch_formulae().await.map_err(|e| {
            SyncError::Fetch {
                stage: SyncStage::FetchingFormulae,
                message: e.to_string(),
            }
        })?;

        report(SyncProgress::new(
            SyncStage::FetchingCasks,
            stage_span(SyncStage::FetchingCasks).start,
            "Fetching casks data...",
        ));
        let casks = self.fetcher.fetch_casks().await.map_err(|e| SyncError::Fetch {
            stage: SyncStage::FetchingCasks,
            message: e.to_string(),
        })?;

        self.store_catalog(
            PackageType::Formula,
            SyncStage::StoringFormulae,
            "formulae",
            formulae.len(),
            |range| self.store.stage_formulae(&formulae[range]),
            report,
        )?;

        self.store_catalog(
            PackageType::Cask,
            SyncStage::StoringCasks,
            "casks",
            casks.len(),
            |range| self.store.stage_casks(&casks[range]),
            report,
        )?;

        self.store
            .set_last_sync_time(Utc::now().timestamp_millis())?;

        info!(
            "Sync completed: {} formulae, {} casks",
            formulae.len(),
            casks.len()
        );
        report(SyncProgress::new(SyncStage::Done, 100.0, "Sync completed"));

        Ok(SyncOutcome::Completed {
            formula_count: formulae.len() as u64,
            cask_count: casks.len() as u64,
        })
    }

    /// Replace one catalog table in bounded batches behind a staging swap.
    fn store_catalog(
        &self,
        kind: PackageType,
        stage: SyncStage,
        label: &str,
        total: usize,
        stage_batch: impl Fn(std::ops::Range<usize>) -> Result<(), StoreError>,
        report: &(dyn Fn(SyncProgress) + Send + Sync),
    ) -> Result<(), SyncError> {
        let span = stage_span(stage);
        report(SyncProgress::new(
            stage,
            span.start,
            format!("Storing {label}..."),
        ));

        self.store.begin_catalog_replace(kind)?;

        let batch_size = self.config.batch_size.max(1);
        let mut written = 0;
        while written < total {
            let end = (written + batch_size).min(total);
            if let Err(e) = stage_batch(written..end) {
                let _ = self.store.abort_catalog_replace(kind);
                return Err(SyncError::Storage(e));
            }
            written = end;
            report(SyncProgress::new(
                stage,
                span.at(written as f32 / total as f32),
                format!("Storing {label}... ({written}/{total})"),
            ));
        }

        if let Err(e) = self.store.commit_catalog_replace(kind) {
            let _ = self.store.abort_catalog_replace(kind);
            return Err(SyncError::Storage(e));
        }

        metrics::SYNC_RECORDS_STORED.inc_by(total as u64);
        self.hub.notify_catalog_replaced();
        Ok(())
    }
}
