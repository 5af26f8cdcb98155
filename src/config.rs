use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Model training configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Telemetry feed configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: CROP_ADVISOR_)
            .add_source(
                config::Environment::with_prefix("CROP_ADVISOR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Dataset location and forest hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// CSV file with the labeled training rows
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    #[serde(default = "default_temperature_column")]
    pub temperature_column: String,

    #[serde(default = "default_humidity_column")]
    pub humidity_column: String,

    #[serde(default = "default_label_column")]
    pub label_column: String,

    /// Number of bootstrap trees in the forest
    #[serde(default = "default_n_trees")]
    pub n_trees: usize,

    /// Maximum depth of each tree
    #[serde(default = "default_max_depth")]
    pub max_depth: u16,

    /// Seed for bootstrap sampling
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            temperature_column: default_temperature_column(),
            humidity_column: default_humidity_column(),
            label_column: default_label_column(),
            n_trees: default_n_trees(),
            max_depth: default_max_depth(),
            seed: default_seed(),
        }
    }
}

/// ThingSpeak-style channel feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Enable the sensor-driven prediction path
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_telemetry_base_url")]
    pub base_url: String,

    #[serde(default = "default_channel_id")]
    pub channel_id: String,

    /// Read-only channel key, usually supplied via CROP_ADVISOR__TELEMETRY__READ_API_KEY
    #[serde(default)]
    pub read_api_key: String,

    /// Channel field holding the temperature value
    #[serde(default = "default_temperature_field")]
    pub temperature_field: String,

    /// Channel field holding the relative humidity value
    #[serde(default = "default_humidity_field")]
    pub humidity_field: String,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_telemetry_base_url(),
            channel_id: default_channel_id(),
            read_api_key: String::new(),
            temperature_field: default_temperature_field(),
            humidity_field: default_humidity_field(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Service name
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub prometheus_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            service_name: default_service_name(),
            prometheus_enabled: true,
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("data/crop_recommendation.csv")
}

fn default_temperature_column() -> String {
    "temperature".to_string()
}

fn default_humidity_column() -> String {
    "humidity".to_string()
}

fn default_label_column() -> String {
    "label".to_string()
}

fn default_n_trees() -> usize {
    100
}

fn default_max_depth() -> u16 {
    16
}

fn default_seed() -> u64 {
    42
}

fn default_telemetry_base_url() -> String {
    "https://api.thingspeak.com".to_string()
}

fn default_channel_id() -> String {
    "2716041".to_string()
}

fn default_temperature_field() -> String {
    "field1".to_string()
}

fn default_humidity_field() -> String {
    "field2".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "crop-advisor".to_string()
}

fn default_true() -> bool {
    true
}
