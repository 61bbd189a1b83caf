//! Sync lifecycle integration tests.
//!
//! These tests verify the complete sync flow against a file-backed store:
//! checking-status -> fetching -> storing -> done, plus the short-circuit
//! and failure paths.

use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use brewdex_core::{
    testing::{fixtures, MockCatalogFetcher},
    CatalogFetcher, ChangeEvent, ChangeHub, PackageStore, ProgressCallback, SqliteStore,
    SyncConfig, SyncError, SyncManager, SyncOutcome, SyncProgress, SyncStage,
};

/// Test helper bundling a manager with its collaborators.
struct TestHarness {
    manager: SyncManager,
    store: Arc<SqliteStore>,
    fetcher: Arc<MockCatalogFetcher>,
    hub: ChangeHub,
    _temp_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_config(SyncConfig::default())
    }

    fn with_config(config: SyncConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let store = Arc::new(SqliteStore::new(&db_path).expect("Failed to create store"));
        let fetcher = Arc::new(MockCatalogFetcher::new());
        let hub = ChangeHub::default();
        let manager = SyncManager::new(
            config,
            Arc::clone(&store) as Arc<dyn PackageStore>,
            Arc::clone(&fetcher) as Arc<dyn CatalogFetcher>,
            hub.clone(),
        );

        Self {
            manager,
            store,
            fetcher,
            hub,
            _temp_dir: temp_dir,
        }
    }
}

fn collecting_callback() -> (ProgressCallback, Arc<Mutex<Vec<SyncProgress>>>) {
    let collected = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&collected);
    let callback: ProgressCallback = Arc::new(move |p| sink.lock().unwrap().push(p));
    (callback, collected)
}

#[tokio::test]
async fn test_first_sync_walks_all_stages() {
    let harness = TestHarness::new();
    harness
        .fetcher
        .set_formulae(fixtures::formulae_batch("pkg", 12))
        .await;
    harness
        .fetcher
        .set_casks(vec![fixtures::cask("firefox", "Web browser")])
        .await;

    let (callback, collected) = collecting_callback();
    let outcome = harness
        .manager
        .sync_with_progress(false, Some(callback))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SyncOutcome::Completed {
            formula_count: 12,
            cask_count: 1
        }
    );

    let stages: Vec<SyncStage> = collected.lock().unwrap().iter().map(|p| p.stage).collect();
    for expected in [
        SyncStage::CheckingStatus,
        SyncStage::FetchingFormulae,
        SyncStage::FetchingCasks,
        SyncStage::StoringFormulae,
        SyncStage::StoringCasks,
        SyncStage::Done,
    ] {
        assert!(stages.contains(&expected), "missing stage {expected}");
    }

    // Stages appear in order.
    let positions: Vec<usize> = [
        SyncStage::CheckingStatus,
        SyncStage::FetchingFormulae,
        SyncStage::FetchingCasks,
        SyncStage::StoringFormulae,
        SyncStage::StoringCasks,
        SyncStage::Done,
    ]
    .iter()
    .map(|stage| stages.iter().position(|s| s == stage).unwrap())
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    assert_eq!(harness.store.formula_count().unwrap(), 12);
    assert_eq!(harness.store.cask_count().unwrap(), 1);
}

#[tokio::test]
async fn test_short_circuit_reports_done_without_network() {
    let harness = TestHarness::new();
    harness
        .fetcher
        .set_formulae(vec![fixtures::formula("wget", "seed")])
        .await;
    harness.manager.sync(true).await.unwrap();

    let (callback, collected) = collecting_callback();
    let outcome = harness
        .manager
        .sync_with_progress(false, Some(callback))
        .await
        .unwrap();

    assert!(matches!(outcome, SyncOutcome::NotNeeded { .. }));
    assert_eq!(harness.fetcher.formula_fetch_count(), 1);

    let events = collected.lock().unwrap();
    let last = events.last().unwrap();
    assert_eq!(last.stage, SyncStage::Done);
    assert_eq!(last.percent, 100.0);
}

#[tokio::test]
async fn test_fetch_failure_keeps_previous_catalog() {
    let harness = TestHarness::new();
    harness
        .fetcher
        .set_formulae(vec![fixtures::formula("wget", "first sync")])
        .await;
    harness.manager.sync(true).await.unwrap();
    let last_sync = harness.store.last_sync_time().unwrap();

    harness.fetcher.fail_formulae_with_status(502).await;
    let err = harness.manager.sync(true).await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Fetch {
            stage: SyncStage::FetchingFormulae,
            ..
        }
    ));

    // Catalog and sync timestamp untouched.
    assert_eq!(harness.store.formula_count().unwrap(), 1);
    assert_eq!(harness.store.last_sync_time().unwrap(), last_sync);
}

#[tokio::test]
async fn test_resync_replaces_catalog_wholesale() {
    let harness = TestHarness::new();
    harness
        .fetcher
        .set_formulae(vec![
            fixtures::formula("wget", "first"),
            fixtures::formula("curl", "first"),
        ])
        .await;
    harness.manager.sync(true).await.unwrap();

    // The next payload no longer contains curl.
    harness
        .fetcher
        .set_formulae(vec![fixtures::formula("wget", "second")])
        .await;
    harness.manager.sync(true).await.unwrap();

    assert_eq!(harness.store.formula_count().unwrap(), 1);
    assert!(harness.store.get_formula("curl").unwrap().is_none());
    let wget = harness.store.get_formula("wget").unwrap().unwrap();
    assert_eq!(wget.desc.as_deref(), Some("second"));
}

#[tokio::test]
async fn test_sync_never_touches_user_metadata() {
    let harness = TestHarness::new();
    harness
        .store
        .insert_favorite("wget", brewdex_core::PackageType::Formula)
        .unwrap();
    harness
        .store
        .insert_tag("wget", brewdex_core::PackageType::Formula, "cli")
        .unwrap();

    harness
        .fetcher
        .set_formulae(vec![fixtures::formula("wget", "synced")])
        .await;
    harness.manager.sync(true).await.unwrap();

    assert_eq!(harness.store.list_favorites().unwrap().len(), 1);
    assert_eq!(harness.store.list_tags().unwrap().len(), 1);
}

#[tokio::test]
async fn test_catalog_replaced_events_published() {
    let harness = TestHarness::new();
    let mut rx = harness.hub.subscribe();
    harness
        .fetcher
        .set_formulae(vec![fixtures::formula("wget", "seed")])
        .await;

    harness.manager.sync(true).await.unwrap();

    // One CatalogReplaced per table swap, among the progress events.
    let mut replaced = 0;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, ChangeEvent::CatalogReplaced { .. }) {
            replaced += 1;
        }
    }
    assert_eq!(replaced, 2);
    assert_eq!(harness.hub.catalog_version(), 2);
}

#[tokio::test]
async fn test_progress_percent_never_decreases_across_run() {
    let harness = TestHarness::with_config(SyncConfig {
        batch_size: 5,
        ..Default::default()
    });
    harness
        .fetcher
        .set_formulae(fixtures::formulae_batch("formula", 23))
        .await;
    harness
        .fetcher
        .set_casks(
            (0..17)
                .map(|i| fixtures::cask(&format!("cask-{i}"), "batch"))
                .collect(),
        )
        .await;

    let (callback, collected) = collecting_callback();
    harness
        .manager
        .sync_with_progress(true, Some(callback))
        .await
        .unwrap();

    let events = collected.lock().unwrap();
    let mut prev = 0.0f32;
    for event in events.iter() {
        assert!(event.percent >= prev, "{:?} regressed", event);
        prev = event.percent;
    }
    assert_eq!(prev, 100.0);
}
