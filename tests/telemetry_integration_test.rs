/// Integration tests for the telemetry fetcher against a mock provider
///
/// These tests verify:
/// - The request shape (path, api_key, results=1)
/// - Mapping the newest entry to a sensor reading
/// - Pairing a sensor reading with a prediction from the same values
/// - Empty feeds, malformed entries, HTTP failures and unreachable hosts

use crop_advisor::{
    config::TelemetryConfig,
    error::AppError,
    integrations::TelemetryClient,
    ml::{train_on, ForestConfig, Predictor, TrainingRow, TrainingSet},
    service::AdvisoryService,
};
use mockito::{Matcher, Server, ServerGuard};
use std::sync::Arc;

const FEED_PATH: &str = "/channels/123/feeds.json";

fn client_for(server: &ServerGuard) -> TelemetryClient {
    let config = TelemetryConfig {
        base_url: server.url(),
        channel_id: "123".to_string(),
        read_api_key: "READKEY".to_string(),
        timeout_secs: 2,
        ..TelemetryConfig::default()
    };
    TelemetryClient::new(&config).unwrap()
}

fn feed_query() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("api_key".into(), "READKEY".into()),
        Matcher::UrlEncoded("results".into(), "1".into()),
    ])
}

fn predictor() -> Predictor {
    let mut rows = Vec::new();
    for i in 0..10 {
        let jitter = i as f64 * 0.5;
        rows.push(TrainingRow::new(22.0 + jitter * 0.2, 64.0 + jitter, "maize"));
        rows.push(TrainingRow::new(25.0 + jitter * 0.2, 82.0 + jitter, "rice"));
        rows.push(TrainingRow::new(18.0 + jitter * 0.2, 16.0 + jitter, "chickpea"));
    }
    let model = train_on(&TrainingSet::from_rows(rows), ForestConfig::default()).unwrap();
    Predictor::new(model.classifier)
}

#[tokio::test]
async fn test_fetch_latest_reading() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", FEED_PATH)
        .match_query(feed_query())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"channel":{"id":123,"field1":"Temperature","field2":"Humidity"},
                "feeds":[{"created_at":"2024-01-01T00:00:00Z","entry_id":1,"field1":"22.5","field2":"65.0"}]}"#,
        )
        .create_async()
        .await;

    let reading = client_for(&server).fetch_latest_reading().await.unwrap();

    assert_eq!(reading.timestamp, "2024-01-01T00:00:00Z");
    assert_eq!(reading.temperature, 22.5);
    assert_eq!(reading.humidity, 65.0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_sensor_prediction_uses_reading_values() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", FEED_PATH)
        .match_query(feed_query())
        .with_status(200)
        .with_body(
            r#"{"feeds":[{"created_at":"2024-01-01T00:00:00Z","field1":"22.5","field2":"65.0"}]}"#,
        )
        .create_async()
        .await;

    let predictor = Arc::new(predictor());
    let service = AdvisoryService::new(predictor.clone(), Some(client_for(&server)));

    let result = service.predict_from_sensor().await.unwrap();

    assert_eq!(result.latest_reading.temperature, 22.5);
    assert_eq!(result.latest_reading.humidity, 65.0);
    assert_eq!(result.predictions, predictor.predict(22.5, 65.0).unwrap());
    assert_eq!(result.predictions.predicted_crop, "maize");
}

#[tokio::test]
async fn test_empty_feed_is_no_data() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", FEED_PATH)
        .match_query(feed_query())
        .with_status(200)
        .with_body(r#"{"channel":{"id":123},"feeds":[]}"#)
        .create_async()
        .await;

    let err = client_for(&server).fetch_latest_reading().await.unwrap_err();

    assert!(matches!(err, AppError::NoSensorData));
    assert_eq!(err.to_string(), "No sensor data available");
}

#[tokio::test]
async fn test_missing_humidity_field_is_format_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", FEED_PATH)
        .match_query(feed_query())
        .with_status(200)
        .with_body(r#"{"feeds":[{"created_at":"2024-01-01T00:00:00Z","field1":"22.5"}]}"#)
        .create_async()
        .await;

    let err = client_for(&server).fetch_latest_reading().await.unwrap_err();

    assert!(matches!(err, AppError::SensorFormat(_)));
    assert!(err.to_string().starts_with("Invalid sensor data format"));
}

#[tokio::test]
async fn test_missing_temperature_field_is_format_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", FEED_PATH)
        .match_query(feed_query())
        .with_status(200)
        .with_body(r#"{"feeds":[{"created_at":"2024-01-01T00:00:00Z","field2":"65.0"}]}"#)
        .create_async()
        .await;

    let err = client_for(&server).fetch_latest_reading().await.unwrap_err();

    assert!(matches!(err, AppError::SensorFormat(ref msg) if msg.contains("field1")));
}

#[tokio::test]
async fn test_non_numeric_field_is_format_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", FEED_PATH)
        .match_query(feed_query())
        .with_status(200)
        .with_body(
            r#"{"feeds":[{"created_at":"2024-01-01T00:00:00Z","field1":"22.5","field2":"damp"}]}"#,
        )
        .create_async()
        .await;

    let err = client_for(&server).fetch_latest_reading().await.unwrap_err();

    assert!(matches!(err, AppError::SensorFormat(_)));
}

#[tokio::test]
async fn test_numeric_timestamp_is_format_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", FEED_PATH)
        .match_query(feed_query())
        .with_status(200)
        .with_body(r#"{"feeds":[{"created_at":1704067200,"field1":"22.5","field2":"65.0"}]}"#)
        .create_async()
        .await;

    let err = client_for(&server).fetch_latest_reading().await.unwrap_err();

    assert!(matches!(err, AppError::SensorFormat(_)));
}

#[tokio::test]
async fn test_null_entry_is_format_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", FEED_PATH)
        .match_query(feed_query())
        .with_status(200)
        .with_body(r#"{"feeds":[null]}"#)
        .create_async()
        .await;

    let err = client_for(&server).fetch_latest_reading().await.unwrap_err();

    assert!(matches!(err, AppError::SensorFormat(_)));
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", FEED_PATH)
        .match_query(feed_query())
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let err = client_for(&server).fetch_latest_reading().await.unwrap_err();

    assert!(matches!(err, AppError::Transport(ref msg) if msg.contains("500")));
    assert!(err.to_string().starts_with("Failed to fetch sensor data"));
}

#[tokio::test]
async fn test_undecodable_body_is_transport_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", FEED_PATH)
        .match_query(feed_query())
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = client_for(&server).fetch_latest_reading().await.unwrap_err();

    assert!(matches!(err, AppError::Transport(_)));
}

#[tokio::test]
async fn test_unreachable_provider_is_transport_error() {
    let config = TelemetryConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        channel_id: "123".to_string(),
        timeout_secs: 2,
        ..TelemetryConfig::default()
    };
    let client = TelemetryClient::new(&config).unwrap();

    let err = client.fetch_latest_reading().await.unwrap_err();

    assert!(matches!(err, AppError::Transport(_)));
}

#[tokio::test]
async fn test_unreachable_provider_error_omits_read_key() {
    let config = TelemetryConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        channel_id: "123".to_string(),
        read_api_key: "SECRETKEY123".to_string(),
        timeout_secs: 2,
        ..TelemetryConfig::default()
    };
    let client = TelemetryClient::new(&config).unwrap();

    let err = client.fetch_latest_reading().await.unwrap_err();

    assert!(matches!(err, AppError::Transport(_)));
    assert!(!err.to_string().contains("SECRETKEY123"));
}

#[tokio::test]
async fn test_sensor_failure_propagates_through_service() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", FEED_PATH)
        .match_query(feed_query())
        .with_status(200)
        .with_body(r#"{"feeds":[]}"#)
        .create_async()
        .await;

    let service = AdvisoryService::new(Arc::new(predictor()), Some(client_for(&server)));
    let err = service.predict_from_sensor().await.unwrap_err();

    assert!(matches!(err, AppError::NoSensorData));
}
