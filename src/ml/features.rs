use crate::error::{AppError, Result};
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Number of model inputs
pub const N_FEATURES: usize = 2;

/// Model input shared by training and inference
///
/// Column order is fixed by [`FeatureVector::COLUMNS`]: temperature first,
/// humidity second. Both the design matrix built at training time and the
/// single-row input built per request go through [`FeatureVector::to_row`],
/// so the two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub temperature: f64,
    pub humidity: f64,
}

impl FeatureVector {
    /// Column names in model order
    pub const COLUMNS: [&'static str; N_FEATURES] = ["temperature", "humidity"];

    pub fn new(temperature: f64, humidity: f64) -> Self {
        Self {
            temperature,
            humidity,
        }
    }

    /// Values in model column order
    pub fn to_row(&self) -> [f64; N_FEATURES] {
        [self.temperature, self.humidity]
    }

    /// Rebuild a feature vector from a model-ordered row
    pub fn from_row(row: ArrayView1<'_, f64>) -> Result<Self> {
        if row.len() != N_FEATURES {
            return Err(AppError::Prediction(format!(
                "Expected {} features ({}), got {}",
                N_FEATURES,
                Self::COLUMNS.join(", "),
                row.len()
            )));
        }
        Ok(Self::new(row[0], row[1]))
    }

    pub fn is_finite(&self) -> bool {
        self.temperature.is_finite() && self.humidity.is_finite()
    }
}

/// Stack feature vectors into an (n_samples × 2) matrix
pub fn to_matrix(vectors: &[FeatureVector]) -> Array2<f64> {
    let mut matrix = Array2::zeros((vectors.len(), N_FEATURES));
    for (i, vector) in vectors.iter().enumerate() {
        for (j, value) in vector.to_row().iter().enumerate() {
            matrix[[i, j]] = *value;
        }
    }
    matrix
}
