//! Prometheus Metrics
//!
//! Recording goes through the `metrics` facade; without an installed
//! recorder every call is a no-op.

use inference_engine::Prediction;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

pub const PREDICTIONS_TOTAL: &str = "exohunt_predictions_total";
pub const PREDICTION_ERRORS_TOTAL: &str = "exohunt_prediction_errors_total";
pub const INFERENCE_LATENCY_SECONDS: &str = "exohunt_inference_latency_seconds";
pub const MODEL_READY: &str = "exohunt_model_ready";

/// Install the global Prometheus recorder
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

pub fn record_prediction(prediction: &Prediction) {
    counter!(PREDICTIONS_TOTAL, "classification" => prediction.classification.metric_label())
        .increment(1);
}

pub fn record_error(kind: &'static str) {
    counter!(PREDICTION_ERRORS_TOTAL, "kind" => kind).increment(1);
}

pub fn record_latency(elapsed: Duration) {
    histogram!(INFERENCE_LATENCY_SECONDS).record(elapsed.as_secs_f64());
}

pub fn set_model_ready(ready: bool) {
    gauge!(MODEL_READY).set(if ready { 1.0 } else { 0.0 });
}
