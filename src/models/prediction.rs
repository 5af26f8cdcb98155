use serde::{Deserialize, Serialize};

/// Manual prediction input
///
/// Values are taken as-is; out-of-range inputs are passed to the model,
/// which extrapolates from the nearest region it has seen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Ambient temperature in degrees Celsius
    pub temperature: f64,

    /// Relative humidity in percent
    pub humidity: f64,
}

/// Recommended crop with the model's confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Label of the most likely crop
    pub predicted_crop: String,

    /// Highest class probability as a percentage (0.0 - 100.0)
    pub confidence: f64,
}

impl PredictionResult {
    pub fn new(predicted_crop: impl Into<String>, confidence: f64) -> Self {
        Self {
            predicted_crop: predicted_crop.into(),
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_request_deserialize() {
        let request: PredictionRequest =
            serde_json::from_str(r#"{"temperature": 25.0, "humidity": 80}"#).unwrap();
        assert_eq!(request.temperature, 25.0);
        assert_eq!(request.humidity, 80.0);
    }

    #[test]
    fn test_prediction_request_rejects_non_numeric() {
        let result: Result<PredictionRequest, _> =
            serde_json::from_str(r#"{"temperature": "warm", "humidity": 80}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_prediction_result_serialization() {
        let result = PredictionResult::new("rice", 87.0);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["predicted_crop"], "rice");
        assert_eq!(json["confidence"], 87.0);
    }
}
