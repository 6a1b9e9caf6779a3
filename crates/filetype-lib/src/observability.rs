//! Observability infrastructure for file type prediction
//!
//! Provides:
//! - Prometheus metrics (prediction and inference latency, predictions by route,
//!   failed predictions, slow inferences)
//! - Structured logging of predictor events with tracing

use crate::models::Prediction;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PredictorMetricsInner> = OnceLock::new();

/// How a prediction was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionRoute {
    /// Fixed answer for an empty or tiny input
    Heuristic,
    /// Model inference
    Model,
}

impl PredictionRoute {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionRoute::Heuristic => "heuristic",
            PredictionRoute::Model => "model",
        }
    }
}

struct PredictorMetricsInner {
    prediction_latency_seconds: Histogram,
    inference_latency_seconds: Histogram,
    predictions_total: IntCounterVec,
    prediction_errors_total: IntCounter,
    slow_inferences_total: IntCounter,
    last_batch_files: IntGauge,
}

impl PredictorMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "filetype_prediction_latency_seconds",
                "Time spent sampling and running inference for one input",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            inference_latency_seconds: register_histogram!(
                "filetype_inference_latency_seconds",
                "Time spent in one model run",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register inference_latency_seconds"),

            predictions_total: register_int_counter_vec!(
                "filetype_predictions_total",
                "Predictions produced, by route",
                &["route"]
            )
            .expect("Failed to register predictions_total"),

            prediction_errors_total: register_int_counter!(
                "filetype_prediction_errors_total",
                "Model predictions that failed while sampling, running inference or reducing output"
            )
            .expect("Failed to register prediction_errors_total"),

            slow_inferences_total: register_int_counter!(
                "filetype_slow_inferences_total",
                "Model runs slower than the latency target"
            )
            .expect("Failed to register slow_inferences_total"),

            last_batch_files: register_int_gauge!(
                "filetype_last_batch_files",
                "Number of files classified by the most recent batch"
            )
            .expect("Failed to register last_batch_files"),
        }
    }
}

/// Predictor metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the same
/// underlying metrics.
#[derive(Clone)]
pub struct PredictorMetrics {
    _private: (),
}

impl Default for PredictorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictorMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PredictorMetricsInner {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new)
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn inc_predictions(&self, route: PredictionRoute) {
        self.inner()
            .predictions_total
            .with_label_values(&[route.as_str()])
            .inc();
    }

    pub fn observe_inference_latency(&self, duration_secs: f64) {
        self.inner().inference_latency_seconds.observe(duration_secs);
    }

    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors_total.inc();
    }

    pub fn inc_slow_inferences(&self) {
        self.inner().slow_inferences_total.inc();
    }

    pub fn set_last_batch_files(&self, count: i64) {
        self.inner().last_batch_files.set(count);
    }

    /// Total predictions recorded for a route
    pub fn predictions(&self, route: PredictionRoute) -> u64 {
        self.inner()
            .predictions_total
            .with_label_values(&[route.as_str()])
            .get()
    }

    /// Model runs observed so far
    pub fn inferences(&self) -> u64 {
        self.inner().inference_latency_seconds.get_sample_count()
    }

    pub fn prediction_errors(&self) -> u64 {
        self.inner().prediction_errors_total.get()
    }
}

/// Structured logger for predictor events
#[derive(Clone, Default)]
pub struct StructuredLogger;

impl StructuredLogger {
    pub fn new() -> Self {
        Self
    }

    /// Log a single prediction
    pub fn log_prediction(&self, input: &str, prediction: &Prediction, route: PredictionRoute) {
        debug!(
            event = "prediction_generated",
            input = %input,
            label = %prediction.label,
            probability = prediction.probability,
            route = route.as_str(),
            "Predicted file type"
        );
    }

    /// Log a prediction failure
    pub fn log_prediction_failed(&self, input: &str, error: &dyn std::error::Error) {
        warn!(
            event = "prediction_failed",
            input = %input,
            error = %error,
            "File type prediction failed"
        );
    }

    /// Log an input skipped by batch prediction
    pub fn log_skipped(&self, input: &str, reason: &str) {
        debug!(
            event = "input_skipped",
            input = %input,
            reason = %reason,
            "Skipped input"
        );
    }

    /// Log the end of a batch
    pub fn log_batch_completed(&self, files: usize, elapsed_ms: u128) {
        info!(
            event = "batch_completed",
            files = files,
            elapsed_ms = elapsed_ms,
            "Batch prediction completed"
        );
    }

    /// Log predictor construction
    pub fn log_predictor_ready(&self, labels: usize, feature_len: usize) {
        info!(
            event = "predictor_ready",
            labels = labels,
            feature_len = feature_len,
            "File type predictor ready"
        );
    }
}
