//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Collection runs and per-genre outcomes
//! - Research provider calls

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Collection Metrics
// =============================================================================

/// Collection runs by result.
pub static COLLECTION_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("trendwatch_collection_runs_total", "Total collection runs"),
        &["result"], // "completed", "empty", "failed"
    )
    .expect("valid metric definition")
});

/// Duration of a full collection run.
pub static COLLECTION_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "trendwatch_collection_duration_seconds",
            "Duration of a full collection run",
        )
        .buckets(vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0]),
    )
    .expect("valid metric definition")
});

/// Per-genre results by status.
pub static GENRE_RESULTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "trendwatch_genre_results_total",
            "Per-genre collection results",
        ),
        &["status"], // "success", "no_data", "db_error"
    )
    .expect("valid metric definition")
});

/// Trend rows written by collection.
pub static TRENDS_UPSERTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "trendwatch_trends_upserted_total",
        "Trend rows inserted or updated",
    )
    .expect("valid metric definition")
});

// =============================================================================
// Research Metrics
// =============================================================================

/// Research provider calls by provider and outcome.
pub static RESEARCH_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "trendwatch_research_requests_total",
            "Research provider requests",
        ),
        &["provider", "outcome"], // outcome: "ok", "timeout", "http_error", ...
    )
    .expect("valid metric definition")
});

/// Research call duration, including parsing.
pub static RESEARCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "trendwatch_research_duration_seconds",
            "Duration of research provider calls",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0]),
        &["outcome"],
    )
    .expect("valid metric definition")
});

/// All core metrics for registration with a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Collection
        Box::new(COLLECTION_RUNS.clone()),
        Box::new(COLLECTION_DURATION.clone()),
        Box::new(GENRE_RESULTS.clone()),
        Box::new(TRENDS_UPSERTED.clone()),
        // Research
        Box::new(RESEARCH_REQUESTS.clone()),
        Box::new(RESEARCH_DURATION.clone()),
    ]
}
