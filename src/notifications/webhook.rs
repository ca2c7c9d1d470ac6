use crate::error::{AppError, Result};
use crate::notifications::NotificationSender;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// Webhook notification sender
#[derive(Clone)]
pub struct WebhookSender {
    client: Client,
    url: String,
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    destination: &'a str,
    message: &'a str,
    timestamp: String,
}

impl WebhookSender {
    /// Create a new webhook sender
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl NotificationSender for WebhookSender {
    async fn send(&self, destination: &str, message: &str) -> Result<()> {
        let payload = WebhookPayload {
            destination,
            message,
            timestamp: Utc::now().to_rfc3339(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Webhook request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            info!(destination, status = status.as_u16(), "Alert notification delivered");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(
                destination,
                status = status.as_u16(),
                body = %body,
                "Alert notification rejected"
            );
            Err(AppError::Network(format!(
                "Webhook returned status {}",
                status
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .match_header("content-type", "application/json")
            .with_status(200)
            .create_async()
            .await;

        let sender = WebhookSender::new(format!("{}/hook", server.url()), 5).unwrap();
        sender.send("operations", "FIRE DANGER: 62.5%").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_failure_surfaces_network_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/hook")
            .with_status(503)
            .create_async()
            .await;

        let sender = WebhookSender::new(format!("{}/hook", server.url()), 5).unwrap();
        let err = sender.send("operations", "msg").await.unwrap_err();
        assert_eq!(err.error_code(), "NETWORK_ERROR");
    }
}
