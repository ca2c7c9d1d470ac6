use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Model artifact configuration
    pub model: ModelConfig,

    /// Registration store configuration
    pub registry: RegistryConfig,

    /// Telemetry feed configuration
    #[serde(default)]
    pub feed: FeedConfig,

    /// Notification configuration
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Observability configuration
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
            // Override with environment variables (prefix: WILDFIRE_)
            .add_source(
                config::Environment::with_prefix("WILDFIRE")
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the persisted model artifact
    #[serde(default = "default_artifact_path")]
    pub artifact_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Path for the embedded registration database
    #[serde(default = "default_registry_path")]
    pub path: PathBuf,
}

/// Telemetry feed configuration (Adafruit-IO style REST feeds).
///
/// The API key is never stored in configuration; `key_env` names the
/// environment variable that holds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Enable live sensor readings
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the feed API
    #[serde(default)]
    pub base_url: String,

    /// Environment variable holding the feed API key
    pub key_env: Option<String>,

    /// Feed name for temperature readings
    #[serde(default = "default_temperature_feed")]
    pub temperature_feed: String,

    /// Feed name for humidity readings
    #[serde(default = "default_humidity_feed")]
    pub humidity_feed: String,

    /// Feed name for air-quality readings
    #[serde(default = "default_pollution_feed")]
    pub pollution_feed: String,

    /// Request timeout (seconds)
    #[serde(default = "default_feed_timeout")]
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: String::new(),
            key_env: None,
            temperature_feed: default_temperature_feed(),
            humidity_feed: default_humidity_feed(),
            pollution_feed: default_pollution_feed(),
            timeout_secs: default_feed_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Enable webhook notifications
    #[serde(default)]
    pub webhook_enabled: bool,

    /// Webhook URL for alert delivery
    pub webhook_url: Option<String>,

    /// Webhook timeout (seconds)
    #[serde(default = "default_webhook_timeout")]
    pub webhook_timeout_secs: u64,

    /// Destination identifier passed to the sender (group or channel name)
    #[serde(default = "default_destination")]
    pub destination: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            webhook_enabled: false,
            webhook_url: None,
            webhook_timeout_secs: default_webhook_timeout(),
            destination: default_destination(),
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
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from("data/wildfire_model.bin")
}

fn default_registry_path() -> PathBuf {
    PathBuf::from("data/registry")
}

fn default_temperature_feed() -> String {
    "temperature".to_string()
}

fn default_humidity_feed() -> String {
    "humidity".to_string()
}

fn default_pollution_feed() -> String {
    "outdoor-aqi".to_string()
}

fn default_feed_timeout() -> u64 {
    10
}

fn default_webhook_timeout() -> u64 {
    10
}

fn default_destination() -> String {
    "operations".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "wildfire-sentinel".to_string()
}
