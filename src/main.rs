use crop_advisor::{
    api::{build_router, AppState},
    config::Config,
    integrations::TelemetryClient,
    metrics,
    ml::{self, Predictor},
    service::AdvisoryService,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("crop_advisor={},tower_http=info", config.observability.log_level).into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    if let Some(e) = config_error {
        tracing::warn!("Failed to load configuration: {}", e);
        tracing::warn!("Using default configuration");
    }

    tracing::info!(
        service = %config.observability.service_name,
        "Starting crop advisor v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Initialize Prometheus metrics
    if config.observability.prometheus_enabled {
        if let Err(e) = metrics::init_metrics() {
            tracing::warn!("Failed to initialize metrics: {}", e);
            tracing::warn!("Continuing without metrics");
        } else {
            tracing::info!("✅ Prometheus metrics initialized");
        }
    } else {
        tracing::info!("⚠️  Prometheus metrics disabled in configuration");
    }

    // Train the model before accepting any traffic
    tracing::info!(dataset = %config.model.dataset_path.display(), "Loading training dataset");
    let model = ml::train(&config.model).map_err(|e| {
        tracing::error!("Model training failed: {}", e);
        e
    })?;
    metrics::record_model(&model.metadata);
    tracing::info!(
        classes = model.metadata.classes.len(),
        samples = model.metadata.n_training_samples,
        "✅ Crop classifier ready"
    );

    let predictor = Arc::new(Predictor::new(model.classifier.clone()));

    // Initialize telemetry client
    let telemetry = if config.telemetry.enabled {
        let client = TelemetryClient::new(&config.telemetry)?;
        tracing::info!(feed = %client.feed_url(), "✅ Telemetry client initialized");
        Some(client)
    } else {
        tracing::info!("⚠️  Telemetry disabled in configuration; /sensor-data will fail");
        None
    };

    let service = Arc::new(AdvisoryService::new(predictor, telemetry));

    let mut app_state = AppState::new(service, Arc::new(model.metadata));
    if !config.observability.prometheus_enabled {
        app_state = app_state.without_metrics();
    }

    let app = build_router(app_state).layer(TimeoutLayer::new(Duration::from_secs(
        config.server.request_timeout_secs,
    )));

    // Start HTTP server
    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_addr).await?;

    tracing::info!("🚀 HTTP API server listening on http://{}", http_addr);
    tracing::info!("   Health check: http://{}/health", http_addr);
    tracing::info!("   Manual prediction: POST http://{}/predict", http_addr);
    tracing::info!("   Sensor prediction: GET http://{}/sensor-data", http_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(http_listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
