//! Types for catalog synchronization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

/// Discrete stages of a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncStage {
    Idle,
    CheckingStatus,
    FetchingFormulae,
    FetchingCasks,
    StoringFormulae,
    StoringCasks,
    Done,
    Error,
}

impl std::fmt::Display for SyncStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SyncStage::Idle => "idle",
            SyncStage::CheckingStatus => "checking-status",
            SyncStage::FetchingFormulae => "fetching-formulae",
            SyncStage::FetchingCasks => "fetching-casks",
            SyncStage::StoringFormulae => "storing-formulae",
            SyncStage::StoringCasks => "storing-casks",
            SyncStage::Done => "done",
            SyncStage::Error => "error",
        };
        f.write_str(s)
    }
}

/// Sub-range of the overall 0-100 progress scale reserved for one stage.
#[derive(Debug, Clone, Copy)]
pub struct StageSpan {
    pub start: f32,
    pub end: f32,
}

impl StageSpan {
    /// Map a within-stage fraction (0.0..=1.0) onto the overall scale.
    pub fn at(&self, fraction: f32) -> f32 {
        let fraction = fraction.clamp(0.0, 1.0);
        self.start + (self.end - self.start) * fraction
    }
}

/// Stage boundaries are configuration, not scattered constants.
pub fn stage_span(stage: SyncStage) -> StageSpan {
    let (start, end) = match stage {
        SyncStage::Idle => (0.0, 0.0),
        SyncStage::CheckingStatus => (0.0, 10.0),
        SyncStage::FetchingFormulae => (10.0, 30.0),
        SyncStage::FetchingCasks => (30.0, 50.0),
        SyncStage::StoringFormulae => (50.0, 70.0),
        SyncStage::StoringCasks => (70.0, 95.0),
        SyncStage::Done => (100.0, 100.0),
        SyncStage::Error => (0.0, 0.0),
    };
    StageSpan { start, end }
}

/// A progress report emitted during sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncProgress {
    pub stage: SyncStage,
    /// Overall progress, 0-100; monotonically non-decreasing within a stage.
    pub percent: f32,
    pub message: String,
}

impl SyncProgress {
    pub fn new(stage: SyncStage, percent: f32, message: impl Into<String>) -> Self {
        Self {
            stage,
            percent,
            message: message.into(),
        }
    }
}

/// Result of a sync request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// A full sync ran and replaced both catalog tables.
    Completed { formula_count: u64, cask_count: u64 },
    /// The catalog was fresh; no network call was made.
    NotNeeded { formula_count: u64, cask_count: u64 },
    /// Another sync was already in flight; this request was a no-op.
    AlreadyRunning,
}

/// Snapshot of the sync manager's state for status queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncStatus {
    pub is_syncing: bool,
    /// Epoch millis of the last successful full sync.
    pub last_sync_time: Option<i64>,
    pub needs_sync: bool,
    pub formula_count: u64,
    pub cask_count: u64,
}

/// Errors that can end a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Non-2xx response or transport failure while fetching a catalog.
    #[error("fetch failed during {stage}: {message}")]
    Fetch { stage: SyncStage, message: String },

    /// Durable-write failure while storing a catalog.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}
