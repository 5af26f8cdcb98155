use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Training dataset could not be loaded (startup-fatal)
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// The classifier failed to produce a prediction
    #[error("Prediction error: {0}")]
    Prediction(String),

    /// The telemetry feed returned no entries
    #[error("No sensor data available")]
    NoSensorData,

    /// The telemetry request itself failed (connect, timeout, non-2xx, undecodable body)
    #[error("Failed to fetch sensor data: {0}")]
    Transport(String),

    /// The newest telemetry entry is missing fields or holds non-numeric values
    #[error("Invalid sensor data format: {0}")]
    SensorFormat(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Dataset(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NoSensorData => StatusCode::NOT_FOUND,
            AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::SensorFormat(_) => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::Dataset(_) => "DATASET_ERROR",
            AppError::Prediction(_) => "PREDICTION_ERROR",
            AppError::NoSensorData => "NO_SENSOR_DATA",
            AppError::Transport(_) => "SENSOR_FETCH_FAILED",
            AppError::SensorFormat(_) => "INVALID_SENSOR_DATA",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        tracing::error!(
            error_code = error_code,
            status_code = status.as_u16(),
            message = %message,
            "Request error"
        );

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
                "status": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
