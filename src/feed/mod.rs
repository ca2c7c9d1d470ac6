//! Client for an Adafruit-IO style telemetry feed: one latest value
//! per feed per reading type.

use crate::config::FeedConfig;
use crate::error::{AppError, Result};
use crate::models::Readings;
use reqwest::Client;
use std::time::Duration;

/// Telemetry feed client.
///
/// The API key comes from the environment variable named in the
/// configuration, never from source or config files.
#[derive(Debug)]
pub struct TelemetryFeed {
    client: Client,
    base_url: String,
    key: String,
    temperature_feed: String,
    humidity_feed: String,
    pollution_feed: String,
}

impl TelemetryFeed {
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let key_env = config.key_env.as_deref().ok_or_else(|| {
            AppError::Configuration("feed.key_env is not configured".to_string())
        })?;
        let key = std::env::var(key_env).map_err(|_| {
            AppError::Configuration(format!("environment variable {} is not set", key_env))
        })?;

        if config.base_url.is_empty() {
            return Err(AppError::Configuration(
                "feed.base_url is not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            key,
            temperature_feed: config.temperature_feed.clone(),
            humidity_feed: config.humidity_feed.clone(),
            pollution_feed: config.pollution_feed.clone(),
        })
    }

    /// Fetch the most recent value of one feed
    pub async fn latest(&self, feed_name: &str) -> Result<f64> {
        let url = format!("{}/feeds/{}/data/last", self.base_url, feed_name);

        let response = self
            .client
            .get(&url)
            .header("X-AIO-Key", &self.key)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Feed request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Network(format!(
                "Feed {} returned status {}",
                feed_name, status
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("Feed response was not JSON: {}", e)))?;

        // The feed reports values as strings; accept numbers too.
        let value = match &body["value"] {
            serde_json::Value::String(s) => s.parse::<f64>().ok(),
            serde_json::Value::Number(n) => n.as_f64(),
            _ => None,
        };

        value.ok_or_else(|| {
            AppError::Network(format!("Feed {} returned a non-numeric value", feed_name))
        })
    }

    /// Fetch all three readings. Any single feed failure fails the
    /// whole gather; the caller re-gathers rather than scoring with a
    /// partial set.
    pub async fn latest_readings(&self) -> Result<Readings> {
        let temperature = self.latest(&self.temperature_feed).await?;
        let humidity = self.latest(&self.humidity_feed).await?;
        let pollution = self.latest(&self.pollution_feed).await?;

        tracing::info!(temperature, humidity, pollution, "Fetched live readings");

        Ok(Readings {
            temperature,
            humidity,
            pollution,
        })
    }
}
