use crate::error::{AppError, Result};
use crate::ml::classifier::Classifier;
use crate::ml::features::{self, FeatureVector};
use crate::ml::models::ClassProbabilities;
use crate::models::PredictionResult;
use std::sync::Arc;
use tracing::debug;

/// Turns a (temperature, humidity) pair into a crop recommendation
///
/// Holds the read-only model and is shared across requests through `Arc`.
/// Inputs are not range-checked; the model extrapolates for values outside
/// what it was trained on.
#[derive(Clone)]
pub struct Predictor {
    model: Arc<dyn Classifier>,
}

impl Predictor {
    pub fn new(model: Arc<dyn Classifier>) -> Self {
        Self { model }
    }

    /// Crop labels the model can return
    pub fn classes(&self) -> &[String] {
        self.model.classes()
    }

    /// Predict the most likely crop and its confidence percentage
    pub fn predict(&self, temperature: f64, humidity: f64) -> Result<PredictionResult> {
        self.predict_features(&FeatureVector::new(temperature, humidity))
    }

    pub fn predict_features(&self, features: &FeatureVector) -> Result<PredictionResult> {
        if !features.is_finite() {
            return Err(AppError::Prediction(format!(
                "Inputs must be finite numbers, got temperature={} humidity={}",
                features.temperature, features.humidity
            )));
        }
        let x = features::to_matrix(std::slice::from_ref(features));

        let proba = self.model.predict_proba(&x).map_err(|e| match e {
            AppError::Prediction(_) => e,
            other => AppError::Prediction(other.to_string()),
        })?;

        if proba.nrows() != 1 {
            return Err(AppError::Prediction(format!(
                "Model returned {} probability rows for a single input",
                proba.nrows()
            )));
        }

        let probabilities = ClassProbabilities(proba.row(0).to_vec());
        let classes = self.model.classes();
        if probabilities.len() != classes.len() {
            return Err(AppError::Prediction(format!(
                "Model returned {} probabilities for {} classes",
                probabilities.len(),
                classes.len()
            )));
        }
        if probabilities.0.iter().any(|p| !(0.0..=1.0).contains(p)) {
            return Err(AppError::Prediction(
                "Model returned probabilities outside [0, 1]".to_string(),
            ));
        }

        let (class_idx, max_probability) = probabilities
            .argmax()
            .ok_or_else(|| AppError::Prediction("Model returned no class probabilities".to_string()))?;

        debug!(
            temperature = features.temperature,
            humidity = features.humidity,
            probabilities = ?probabilities.0,
            "Class probabilities computed"
        );

        Ok(PredictionResult::new(
            classes[class_idx].clone(),
            max_probability * 100.0,
        ))
    }
}
