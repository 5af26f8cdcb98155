use serde::{Deserialize, Serialize};

use super::prediction::PredictionResult;

/// Newest validated reading from the telemetry channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Entry timestamp exactly as reported by the feed (ISO-8601)
    pub timestamp: String,

    /// Ambient temperature in degrees Celsius
    pub temperature: f64,

    /// Relative humidity in percent
    pub humidity: f64,
}

/// A sensor reading together with the prediction computed from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorPredictionResult {
    pub latest_reading: SensorReading,
    pub predictions: PredictionResult,
}
