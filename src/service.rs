//! Advisory service: the two prediction paths behind the HTTP API

use crate::error::{AppError, Result};
use crate::integrations::TelemetryClient;
use crate::metrics::{PREDICTIONS_TOTAL, PREDICTION_CONFIDENCE, PREDICTION_DURATION_SECONDS};
use crate::ml::Predictor;
use crate::models::{PredictionRequest, PredictionResult, SensorPredictionResult};
use std::sync::Arc;
use tracing::{info, warn};

const SOURCE_MANUAL: &str = "manual";
const SOURCE_SENSOR: &str = "sensor";

/// Combines the trained predictor with the optional telemetry channel
pub struct AdvisoryService {
    predictor: Arc<Predictor>,
    telemetry: Option<TelemetryClient>,
}

impl AdvisoryService {
    pub fn new(predictor: Arc<Predictor>, telemetry: Option<TelemetryClient>) -> Self {
        Self {
            predictor,
            telemetry,
        }
    }

    pub fn predictor(&self) -> &Predictor {
        &self.predictor
    }

    pub fn telemetry_enabled(&self) -> bool {
        self.telemetry.is_some()
    }

    /// Predict from caller-supplied values
    pub fn predict_manual(&self, request: &PredictionRequest) -> Result<PredictionResult> {
        let timer = PREDICTION_DURATION_SECONDS
            .with_label_values(&[SOURCE_MANUAL])
            .start_timer();
        let result = self.predictor.predict(request.temperature, request.humidity);
        timer.observe_duration();

        record_outcome(SOURCE_MANUAL, result.as_ref());
        if let Ok(prediction) = &result {
            info!(
                temperature = request.temperature,
                humidity = request.humidity,
                crop = %prediction.predicted_crop,
                confidence = prediction.confidence,
                "Manual prediction served"
            );
        }

        result
    }

    /// Fetch the newest sensor reading and predict from exactly those values
    pub async fn predict_from_sensor(&self) -> Result<SensorPredictionResult> {
        let telemetry = self.telemetry.as_ref().ok_or_else(|| {
            AppError::Configuration("Telemetry integration is disabled".to_string())
        })?;

        let timer = PREDICTION_DURATION_SECONDS
            .with_label_values(&[SOURCE_SENSOR])
            .start_timer();
        let result = telemetry.fetch_latest_reading().await.and_then(|reading| {
            let predictions = self.predictor.predict(reading.temperature, reading.humidity)?;
            Ok(SensorPredictionResult {
                latest_reading: reading,
                predictions,
            })
        });
        timer.observe_duration();

        record_outcome(SOURCE_SENSOR, result.as_ref().map(|r| &r.predictions));

        if let Ok(r) = &result {
            info!(
                timestamp = %r.latest_reading.timestamp,
                temperature = r.latest_reading.temperature,
                humidity = r.latest_reading.humidity,
                crop = %r.predictions.predicted_crop,
                confidence = r.predictions.confidence,
                "Sensor prediction served"
            );
        }

        result
    }
}

fn record_outcome(source: &str, outcome: std::result::Result<&PredictionResult, &AppError>) {
    match outcome {
        Ok(prediction) => {
            PREDICTIONS_TOTAL.with_label_values(&[source, "success"]).inc();
            PREDICTION_CONFIDENCE.observe(prediction.confidence);
        }
        Err(e) => {
            PREDICTIONS_TOTAL.with_label_values(&[source, "error"]).inc();
            warn!(source = source, error = %e, "Prediction failed");
        }
    }
}
