//! Prometheus metrics for the crop advisor.
//!
//! Covers:
//! - HTTP request tracking
//! - Predictions by source (manual input or sensor reading) and outcome
//! - Telemetry fetch outcomes and latency
//! - The model loaded at startup
//!
//! # Example
//! ```no_run
//! use crop_advisor::metrics::PREDICTIONS_TOTAL;
//!
//! PREDICTIONS_TOTAL
//!     .with_label_values(&["manual", "success"])
//!     .inc();
//! ```

mod middleware;

pub use middleware::track_metrics;

use crate::ml::ModelMetadata;
use lazy_static::lazy_static;
use prometheus::{CounterVec, Gauge, Histogram, HistogramOpts, HistogramVec, Opts, Registry};

const NAMESPACE: &str = "crop_advisor";

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    // ============================================================================
    // HTTP Metrics
    // ============================================================================

    /// Total number of HTTP requests received
    ///
    /// Labels: method, path, status_code
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests")
            .namespace(NAMESPACE),
        &["method", "path", "status_code"]
    ).expect("Failed to create HTTP_REQUESTS_TOTAL metric");

    /// HTTP request duration in seconds
    ///
    /// Labels: method, path
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds"
        )
        .namespace(NAMESPACE)
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric");

    // ============================================================================
    // Prediction Metrics
    // ============================================================================

    /// Predictions served
    ///
    /// Labels: source (manual, sensor), outcome (success, error)
    pub static ref PREDICTIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("predictions_total", "Total number of crop predictions")
            .namespace(NAMESPACE),
        &["source", "outcome"]
    ).expect("Failed to create PREDICTIONS_TOTAL metric");

    /// Time spent producing a prediction, including the sensor fetch for the sensor path
    ///
    /// Labels: source
    pub static ref PREDICTION_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "prediction_duration_seconds",
            "Crop prediction latency in seconds"
        )
        .namespace(NAMESPACE)
        .buckets(vec![0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0]),
        &["source"]
    ).expect("Failed to create PREDICTION_DURATION_SECONDS metric");

    /// Distribution of reported confidence percentages
    pub static ref PREDICTION_CONFIDENCE: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "prediction_confidence_percent",
            "Confidence of served predictions in percent"
        )
        .namespace(NAMESPACE)
        .buckets(vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0])
    ).expect("Failed to create PREDICTION_CONFIDENCE metric");

    // ============================================================================
    // Telemetry Metrics
    // ============================================================================

    /// Telemetry fetches by outcome
    ///
    /// Labels: outcome (success, no_data, invalid_format, transport_error)
    pub static ref TELEMETRY_FETCHES_TOTAL: CounterVec = CounterVec::new(
        Opts::new("telemetry_fetches_total", "Total number of telemetry fetches")
            .namespace(NAMESPACE),
        &["outcome"]
    ).expect("Failed to create TELEMETRY_FETCHES_TOTAL metric");

    /// Telemetry round-trip time in seconds
    pub static ref TELEMETRY_FETCH_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "telemetry_fetch_duration_seconds",
            "Telemetry fetch duration in seconds"
        )
        .namespace(NAMESPACE)
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0])
    ).expect("Failed to create TELEMETRY_FETCH_DURATION_SECONDS metric");

    // ============================================================================
    // Model Metrics
    // ============================================================================

    /// Number of crop labels the loaded model can predict
    pub static ref MODEL_CLASSES: Gauge = Gauge::with_opts(
        Opts::new("model_classes", "Number of crop labels known to the model")
            .namespace(NAMESPACE)
    ).expect("Failed to create MODEL_CLASSES metric");

    /// Rows the model was fitted on
    pub static ref MODEL_TRAINING_SAMPLES: Gauge = Gauge::with_opts(
        Opts::new("model_training_samples", "Number of rows the model was trained on")
            .namespace(NAMESPACE)
    ).expect("Failed to create MODEL_TRAINING_SAMPLES metric");

    /// Fraction of training rows the model reproduces
    pub static ref MODEL_TRAINING_ACCURACY: Gauge = Gauge::with_opts(
        Opts::new("model_training_accuracy", "Accuracy of the model on its training rows")
            .namespace(NAMESPACE)
    ).expect("Failed to create MODEL_TRAINING_ACCURACY metric");
}

/// Register all metrics with the global registry
///
/// Safe to call more than once; metrics that are already registered are skipped.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(HTTP_REQUESTS_TOTAL.clone()),
        Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()),
        Box::new(PREDICTIONS_TOTAL.clone()),
        Box::new(PREDICTION_DURATION_SECONDS.clone()),
        Box::new(PREDICTION_CONFIDENCE.clone()),
        Box::new(TELEMETRY_FETCHES_TOTAL.clone()),
        Box::new(TELEMETRY_FETCH_DURATION_SECONDS.clone()),
        Box::new(MODEL_CLASSES.clone()),
        Box::new(MODEL_TRAINING_SAMPLES.clone()),
        Box::new(MODEL_TRAINING_ACCURACY.clone()),
    ];

    for collector in collectors {
        match PROMETHEUS_REGISTRY.register(collector) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

/// Publish the shape of the loaded model
pub fn record_model(metadata: &ModelMetadata) {
    MODEL_CLASSES.set(metadata.classes.len() as f64);
    MODEL_TRAINING_SAMPLES.set(metadata.n_training_samples as f64);
    MODEL_TRAINING_ACCURACY.set(metadata.training_metrics.accuracy);
}

/// Gather all metrics in Prometheus text format
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}
