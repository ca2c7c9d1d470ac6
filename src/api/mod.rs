pub mod handlers;
pub mod routes;

pub use routes::build_router;

use crate::feed::TelemetryFeed;
use crate::models::SessionState;
use crate::notifications::NotificationSender;
use crate::registry::RegistrationStore;
use crate::scoring::RiskScorer;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state.
///
/// The scorer is loaded once at startup and frozen; sessions hold the
/// per-session cache of the latest assessment and contact fields.
#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<RiskScorer>,
    pub registry: Arc<dyn RegistrationStore>,
    pub notifier: Option<Arc<dyn NotificationSender>>,
    pub feed: Option<Arc<TelemetryFeed>>,
    pub sessions: Arc<DashMap<Uuid, SessionState>>,
    pub alert_destination: String,
}

impl AppState {
    pub fn new(scorer: Arc<RiskScorer>, registry: Arc<dyn RegistrationStore>) -> Self {
        Self {
            scorer,
            registry,
            notifier: None,
            feed: None,
            sessions: Arc::new(DashMap::new()),
            alert_destination: "operations".to_string(),
        }
    }

    /// Set the notification sender
    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSender>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Set the telemetry feed
    pub fn with_feed(mut self, feed: Arc<TelemetryFeed>) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Set the alert destination identifier
    pub fn with_alert_destination(mut self, destination: impl Into<String>) -> Self {
        self.alert_destination = destination.into();
        self
    }
}
