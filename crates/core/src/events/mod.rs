//! Change notification hub for live-updating consumers.
//!
//! The query engine is pure and stateless; consumers that want live
//! results subscribe here and re-run their query whenever a version they
//! depend on changes. The hub carries two monotonically increasing
//! counters: one bumped when a catalog table is swapped in by sync, one
//! bumped on every favorite/tag mutation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::catalog::PackageType;
use crate::sync::SyncProgress;

/// An observable state change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// A catalog table was atomically replaced by a sync.
    CatalogReplaced { catalog_version: u64 },
    /// A favorite was added or removed.
    FavoriteChanged {
        package_id: String,
        package_type: PackageType,
        favorited: bool,
        metadata_version: u64,
    },
    /// Tags were added, removed, renamed or deleted.
    TagsChanged { metadata_version: u64 },
    /// Sync progress report.
    SyncProgress(SyncProgress),
}

struct HubInner {
    catalog_version: AtomicU64,
    metadata_version: AtomicU64,
    tx: broadcast::Sender<ChangeEvent>,
}

/// Cheaply cloneable publish side of the change hub.
///
/// Sends are non-blocking; events published with no live subscribers are
/// simply dropped.
#[derive(Clone)]
pub struct ChangeHub {
    inner: Arc<HubInner>,
}

impl ChangeHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            inner: Arc::new(HubInner {
                catalog_version: AtomicU64::new(0),
                metadata_version: AtomicU64::new(0),
                tx,
            }),
        }
    }

    /// Subscribe to receive change events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.inner.tx.subscribe()
    }

    /// Version of the catalog as of the last table swap.
    pub fn catalog_version(&self) -> u64 {
        self.inner.catalog_version.load(Ordering::SeqCst)
    }

    /// Version of the user metadata as of the last mutation.
    pub fn metadata_version(&self) -> u64 {
        self.inner.metadata_version.load(Ordering::SeqCst)
    }

    pub fn notify_catalog_replaced(&self) {
        let version = self.inner.catalog_version.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self
            .inner
            .tx
            .send(ChangeEvent::CatalogReplaced {
                catalog_version: version,
            });
    }

    pub fn notify_favorite_changed(
        &self,
        package_id: &str,
        package_type: PackageType,
        favorited: bool,
    ) {
        let version = self.inner.metadata_version.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.inner.tx.send(ChangeEvent::FavoriteChanged {
            package_id: package_id.to_string(),
            package_type,
            favorited,
            metadata_version: version,
        });
    }

    pub fn notify_tags_changed(&self) {
        let version = self.inner.metadata_version.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self
            .inner
            .tx
            .send(ChangeEvent::TagsChanged {
                metadata_version: version,
            });
    }

    pub fn notify_sync_progress(&self, progress: SyncProgress) {
        let _ = self.inner.tx.send(ChangeEvent::SyncProgress(progress));
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new(256)
    }
}
