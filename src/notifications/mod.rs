pub mod webhook;

pub use webhook::WebhookSender;

use crate::error::Result;
use async_trait::async_trait;

/// Capability for delivering an alert message to a named destination.
///
/// The concrete transport (webhook, message queue, external process)
/// is swappable without touching the scorer.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver `message` to `destination`
    async fn send(&self, destination: &str, message: &str) -> Result<()>;
}
