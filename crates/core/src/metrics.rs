//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Sync manager (runs by outcome, duration, records stored)
//! - Query engine (searches, duration)

use once_cell::sync::Lazy;
use prometheus::{
    core::Collector, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts,
};

// =============================================================================
// Sync Metrics
// =============================================================================

/// Sync runs total by outcome.
pub static SYNC_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("brewdex_sync_runs_total", "Total sync runs"),
        &["outcome"], // "completed", "not_needed", "already_running", "error"
    )
    .unwrap()
});

/// Sync duration in seconds.
pub static SYNC_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("brewdex_sync_duration_seconds", "Duration of sync runs")
            .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
    )
    .unwrap()
});

/// Catalog records written during sync.
pub static SYNC_RECORDS_STORED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "brewdex_sync_records_stored_total",
        "Total catalog records written by sync",
    )
    .unwrap()
});

// =============================================================================
// Query Engine Metrics
// =============================================================================

/// Search executions total.
pub static SEARCH_EXECUTIONS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("brewdex_search_executions_total", "Total search executions").unwrap()
});

/// Search duration in seconds.
pub static SEARCH_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("brewdex_search_duration_seconds", "Duration of searches")
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
    )
    .unwrap()
});

/// All core metrics for registration in a server-side registry.
pub fn all_metrics() -> Vec<Box<dyn Collector>> {
    vec![
        Box::new(SYNC_RUNS.clone()),
        Box::new(SYNC_DURATION.clone()),
        Box::new(SYNC_RECORDS_STORED.clone()),
        Box::new(SEARCH_EXECUTIONS.clone()),
        Box::new(SEARCH_DURATION.clone()),
    ]
}
