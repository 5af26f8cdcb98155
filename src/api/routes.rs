use crate::api::{handlers, AppState};
use crate::metrics::track_metrics;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Build the main API router
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        .route("/health/live", get(handlers::health_check))
        // Predictions
        .route("/predict", post(handlers::predict))
        .route("/sensor-data", get(handlers::sensor_data))
        // Model introspection
        .route("/v1/model", get(handlers::model_info));

    if state.metrics_enabled {
        router = router
            .route("/metrics", get(handlers::metrics))
            .layer(middleware::from_fn(track_metrics));
    }

    router
        // Add state
        .with_state(state)
        // Add middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
}
