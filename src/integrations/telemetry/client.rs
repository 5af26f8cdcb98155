use crate::config::TelemetryConfig;
use crate::error::{AppError, Result};
use crate::integrations::telemetry::feed::{FeedDocument, FieldMapping};
use crate::metrics::{TELEMETRY_FETCHES_TOTAL, TELEMETRY_FETCH_DURATION_SECONDS};
use crate::models::SensorReading;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Reads the newest entry of a telemetry channel
///
/// One GET per call, bounded by the configured timeout. Failures are reported
/// on first occurrence; nothing is retried or cached.
#[derive(Clone)]
pub struct TelemetryClient {
    pub(crate) client: Client,
    base_url: String,
    channel_id: String,
    read_api_key: String,
    mapping: FieldMapping,
    pub(crate) timeout_secs: u64,
}

impl TelemetryClient {
    /// Create a new telemetry client
    pub fn new(config: &TelemetryConfig) -> Result<Self> {
        if config.channel_id.trim().is_empty() {
            return Err(AppError::Configuration(
                "telemetry.channel_id must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("crop-advisor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            channel_id: config.channel_id.clone(),
            read_api_key: config.read_api_key.clone(),
            mapping: FieldMapping {
                temperature: config.temperature_field.clone(),
                humidity: config.humidity_field.clone(),
            },
            timeout_secs: config.timeout_secs,
        })
    }

    /// Feed URL without the query string
    pub fn feed_url(&self) -> String {
        format!("{}/channels/{}/feeds.json", self.base_url, self.channel_id)
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Fetch, validate and map the most recent reading
    pub async fn fetch_latest_reading(&self) -> Result<SensorReading> {
        let timer = TELEMETRY_FETCH_DURATION_SECONDS.start_timer();
        let result = self.fetch_document().await.and_then(|doc| {
            debug!(channel = ?doc.channel, "Telemetry feed received");
            doc.latest_reading(&self.mapping)
        });
        timer.observe_duration();

        let outcome = match &result {
            Ok(_) => "success",
            Err(AppError::NoSensorData) => "no_data",
            Err(AppError::SensorFormat(_)) => "invalid_format",
            Err(_) => "transport_error",
        };
        TELEMETRY_FETCHES_TOTAL.with_label_values(&[outcome]).inc();

        match &result {
            Ok(reading) => info!(
                channel_id = %self.channel_id,
                timestamp = %reading.timestamp,
                temperature = reading.temperature,
                humidity = reading.humidity,
                "Fetched latest sensor reading"
            ),
            Err(e) => warn!(
                channel_id = %self.channel_id,
                outcome = outcome,
                error = %e,
                "Sensor reading unavailable"
            ),
        }

        result
    }

    async fn fetch_document(&self) -> Result<FeedDocument> {
        let url = self.feed_url();

        // reqwest errors carry the request URL, which includes the read key
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.read_api_key.as_str()), ("results", "1")])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Transport(format!(
                "telemetry provider returned status {}: {}",
                status,
                if body.is_empty() {
                    "No response body"
                } else {
                    &body
                }
            )));
        }

        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;

        serde_json::from_slice::<FeedDocument>(&body)
            .map_err(|e| AppError::Transport(format!("undecodable feed document: {}", e)))
    }

    fn transport_error(&self, e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::Transport(format!(
                "request timed out after {} seconds",
                self.timeout_secs
            ))
        } else if e.is_connect() {
            AppError::Transport(format!(
                "failed to connect to telemetry provider at {}: {}",
                self.base_url,
                e.without_url()
            ))
        } else {
            AppError::Transport(e.without_url().to_string())
        }
    }
}
