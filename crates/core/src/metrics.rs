//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Batch runs (started, completed)
//! - Item submissions (outcome counts, durations)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Batch Run Metrics
// =============================================================================

/// Batch runs started total.
pub static RUNS_STARTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("chute_runs_started_total", "Total batch runs started").unwrap()
});

/// Batch runs completed total.
pub static RUNS_COMPLETED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "chute_runs_completed_total",
        "Total batch runs driven to completion",
    )
    .unwrap()
});

// =============================================================================
// Submission Metrics
// =============================================================================

/// Item submissions total by outcome.
pub static ITEMS_SUBMITTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("chute_items_submitted_total", "Total item submissions"),
        &["result"], // "accepted", "rejected", "transport_error"
    )
    .unwrap()
});

/// Submission exchange duration in seconds.
pub static SUBMISSION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "chute_submission_duration_seconds",
            "Duration of a single submission exchange",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["result"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(RUNS_STARTED.clone()),
        Box::new(RUNS_COMPLETED.clone()),
        Box::new(ITEMS_SUBMITTED.clone()),
        Box::new(SUBMISSION_DURATION.clone()),
    ]
}
