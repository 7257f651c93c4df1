//! Prometheus metrics for the Syracuse server.
//!
//! Counts cache hits and misses, write outcomes, failures by stage and
//! backend unavailability, plus the latency of each coordinator operation.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::{LazyLock, Once};
use std::time::Instant;
use syracuse_cache::{CacheError, WriteOutcome};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

pub static CACHE_HITS: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "syracuse_cache_hits_total",
        "Reads served with a complete record",
    )
    .expect("metric creation failed")
});

pub static CACHE_MISSES: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "syracuse_cache_misses_total",
        "Reads that found no complete record",
    )
    .expect("metric creation failed")
});

pub static RECORDS_STORED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "syracuse_records_stored_total",
        "Writes that completed a record",
    )
    .expect("metric creation failed")
});

pub static RECORDS_ALREADY_CACHED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "syracuse_records_already_cached_total",
        "Writes skipped because the record was already complete",
    )
    .expect("metric creation failed")
});

pub static WRITE_FAILURES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "syracuse_write_failures_total",
            "Failed writes by stage (blob, metadata)",
        ),
        &["stage"],
    )
    .expect("metric creation failed")
});

pub static STORE_UNAVAILABLE: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "syracuse_store_unavailable_total",
            "Lookups that failed or timed out, by backend",
        ),
        &["backend"],
    )
    .expect("metric creation failed")
});

pub static OPERATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "syracuse_cache_operation_duration_seconds",
            "Latency of cache coordinator operations",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0]),
        &["operation"],
    )
    .expect("metric creation failed")
});

static REGISTER_ONCE: Once = Once::new();

/// Register all metrics with the global registry. Safe to call repeatedly.
pub fn register_metrics() {
    REGISTER_ONCE.call_once(|| {
        REGISTRY
            .register(Box::new(CACHE_HITS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(CACHE_MISSES.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(RECORDS_STORED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(RECORDS_ALREADY_CACHED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(WRITE_FAILURES.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(STORE_UNAVAILABLE.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(OPERATION_DURATION.clone()))
            .expect("metric registration failed");
    });
}

/// GET /metrics
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        ),
    }
}

/// Record the latency of one coordinator operation.
pub fn observe(operation: &str, started: Instant) {
    OPERATION_DURATION
        .with_label_values(&[operation])
        .observe(started.elapsed().as_secs_f64());
}

pub fn record_read(hit: bool) {
    if hit {
        CACHE_HITS.inc();
    } else {
        CACHE_MISSES.inc();
    }
}

pub fn record_write(outcome: WriteOutcome) {
    match outcome {
        WriteOutcome::Stored => RECORDS_STORED.inc(),
        WriteOutcome::AlreadyCached => RECORDS_ALREADY_CACHED.inc(),
    }
}

pub fn record_cache_error(err: &CacheError) {
    match err {
        CacheError::StoreUnavailable { backend, .. } => STORE_UNAVAILABLE
            .with_label_values(&[backend.as_str()])
            .inc(),
        CacheError::WriteFailed { stage, .. } => {
            WRITE_FAILURES.with_label_values(&[stage.as_str()]).inc()
        }
        CacheError::InvalidRecord(_) | CacheError::Compute(_) => {}
    }
}
