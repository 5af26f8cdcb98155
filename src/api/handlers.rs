use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::metrics::gather_metrics;
use crate::ml::ModelMetadata;
use crate::models::{PredictionRequest, PredictionResult, SensorPredictionResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Predict a crop from the temperature and humidity in the request body
pub async fn predict(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let result = state.service.predict_manual(&request)?;
    Ok(Json(result))
}

/// Predict a crop from the newest sensor reading
pub async fn sensor_data(State(state): State<AppState>) -> Result<Json<SensorPredictionResult>> {
    let result = state.service.predict_from_sensor().await?;
    Ok(Json(result))
}

/// Describe the model loaded at startup
pub async fn model_info(State(state): State<AppState>) -> Json<ModelMetadata> {
    Json(state.model.as_ref().clone())
}

/// Prometheus scrape endpoint
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        gather_metrics(),
    )
}
