use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wildfire_sentinel::{
    api::{build_router, AppState},
    config::Config,
    feed::TelemetryFeed,
    notifications::{NotificationSender, WebhookSender},
    registry::SledRegistry,
    scoring::RiskScorer,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wildfire_sentinel=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;

    tracing::info!("Starting Wildfire Sentinel v{}", env!("CARGO_PKG_VERSION"));

    // Load the model artifact once and freeze it; every scoring call
    // shares the same immutable model.
    let scorer = Arc::new(RiskScorer::from_path(&config.model.artifact_path)?);
    tracing::info!(
        trained_at = %scorer.metadata().trained_at,
        n_training_samples = scorer.metadata().n_training_samples,
        "Model loaded"
    );

    // Registration store
    let registry = Arc::new(SledRegistry::new(&config.registry.path)?);
    tracing::info!("Registration store initialized");

    let mut state = AppState::new(scorer, registry)
        .with_alert_destination(config.notifications.destination.clone());

    // Telemetry feed (optional)
    if config.feed.enabled {
        match TelemetryFeed::new(&config.feed) {
            Ok(feed) => {
                state = state.with_feed(Arc::new(feed));
                tracing::info!("Telemetry feed enabled");
            }
            Err(e) => {
                tracing::warn!("Telemetry feed initialization failed: {}", e);
                tracing::warn!("Continuing with manual entry only");
            }
        }
    }

    // Notification sender (optional)
    if config.notifications.webhook_enabled {
        match config.notifications.webhook_url.as_deref() {
            Some(url) => {
                let sender =
                    WebhookSender::new(url, config.notifications.webhook_timeout_secs)?;
                let sender: Arc<dyn NotificationSender> = Arc::new(sender);
                state = state.with_notifier(sender);
                tracing::info!("Webhook notifications enabled");
            }
            None => {
                tracing::warn!("Webhook notifications enabled but no URL configured");
            }
        }
    } else {
        tracing::info!("Notifications disabled; alerts are reported in responses only");
    }

    // Serve the API
    let addr = format!("{}:{}", config.server.host, config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
