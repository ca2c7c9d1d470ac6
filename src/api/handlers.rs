use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::models::{Readings, Registration, RiskAssessment, SessionState};
use crate::ml::models::ModelMetadata;
use crate::scoring::ScoreInput;
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Phone format enforced at registration: +91 followed by 10 digits
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+91\d{10}$").unwrap());

/// Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Where the readings come from
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    #[default]
    Manual,
    Feed,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ScoreRequest {
    /// Manual entry (default) or live feed fetch
    #[serde(default)]
    pub source: InputSource,

    #[validate(range(min = -50.0, max = 100.0))]
    pub temperature: Option<f64>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity: Option<f64>,

    #[validate(range(min = 0.0, max = 500.0))]
    pub pollution: Option<f64>,

    /// Session to attach the assessment to; a new one is created if absent
    pub session_id: Option<Uuid>,
}

/// Outcome of the alert dispatch attempted for this assessment
#[derive(Debug, Serialize)]
pub struct NotificationOutcome {
    pub attempted: bool,
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub session_id: Uuid,
    pub assessment: RiskAssessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationOutcome>,
}

/// Score three environmental readings into a risk assessment.
///
/// Alert dispatch happens here, after scoring; a failed dispatch is
/// reported in the response but never erases the computed assessment.
pub async fn score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>> {
    request.validate()?;

    let input = match request.source {
        InputSource::Manual => ScoreInput {
            temperature: request.temperature,
            humidity: request.humidity,
            pollution: request.pollution,
        },
        InputSource::Feed => {
            let feed = state.feed.as_ref().ok_or_else(|| {
                AppError::Configuration("live feed is not configured".to_string())
            })?;
            let readings = feed.latest_readings().await?;
            ScoreInput {
                temperature: Some(readings.temperature),
                humidity: Some(readings.humidity),
                pollution: Some(readings.pollution),
            }
        }
    };

    let assessment = state.scorer.score(input)?;

    let notification = if assessment.alert {
        Some(dispatch_alert(&state, &assessment).await)
    } else {
        None
    };

    let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);
    {
        let mut session = state.sessions.entry(session_id).or_default();
        session.readings = Some(assessment.readings);
        session.assessment = Some(assessment.clone());
    }

    Ok(Json(ScoreResponse {
        session_id,
        assessment,
        notification,
    }))
}

async fn dispatch_alert(state: &AppState, assessment: &RiskAssessment) -> NotificationOutcome {
    let Some(notifier) = state.notifier.as_ref() else {
        tracing::warn!("Alert raised but no notification sender is configured");
        return NotificationOutcome {
            attempted: false,
            delivered: false,
            error: Some("no notification sender configured".to_string()),
        };
    };

    let message = format!(
        "FIRE DANGER: {:.1}% (tier {})",
        assessment.adjusted_probability, assessment.tier
    );

    match notifier.send(&state.alert_destination, &message).await {
        Ok(()) => NotificationOutcome {
            attempted: true,
            delivered: true,
            error: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Alert dispatch failed; assessment preserved");
            NotificationOutcome {
                attempted: true,
                delivered: false,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Fetch the current live readings without scoring them
pub async fn live_readings(State(state): State<AppState>) -> Result<Json<Readings>> {
    let feed = state
        .feed
        .as_ref()
        .ok_or_else(|| AppError::Configuration("live feed is not configured".to_string()))?;

    Ok(Json(feed.latest_readings().await?))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(regex(path = *PHONE_RE))]
    pub phone: String,

    #[validate(length(min = 1, max = 500))]
    pub location: String,

    /// Session whose latest assessment is attached to the record
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub registration_id: Uuid,
    pub message: String,
}

/// Register contact details for emergency alerts
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    request.validate()?;

    let latest_assessment = request.session_id.and_then(|id| {
        state.sessions.get(&id).and_then(|session| session.assessment.clone())
    });

    if let Some(session_id) = request.session_id {
        let mut session = state
            .sessions
            .entry(session_id)
            .or_insert_with(SessionState::default);
        session.name = Some(request.name.clone());
        session.phone = Some(request.phone.clone());
        session.location = Some(request.location.clone());
    }

    let mut registration =
        Registration::new(request.name, request.phone, request.location);
    if let Some(assessment) = latest_assessment {
        registration = registration.with_assessment(assessment);
    }
    let registration_id = registration.id;

    state.registry.save(registration).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            registration_id,
            message: "Registration stored".to_string(),
        }),
    ))
}

/// Metadata of the loaded model
pub async fn model_metadata(State(state): State<AppState>) -> Result<Json<ModelMetadata>> {
    Ok(Json(state.scorer.metadata().clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::build_training_set;
    use crate::ml::trainer::{train, TrainerConfig};
    use crate::models::RawEvent;
    use crate::notifications::NotificationSender;
    use crate::registry::InMemoryRegistry;
    use crate::scoring::RiskScorer;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct RecordingSender {
        sent: AtomicUsize,
        fail: bool,
    }

    impl RecordingSender {
        fn new(fail: bool) -> Self {
            Self {
                sent: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl NotificationSender for RecordingSender {
        async fn send(&self, _destination: &str, _message: &str) -> crate::error::Result<()> {
            if self.fail {
                return Err(AppError::Network("dispatch refused".to_string()));
            }
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn test_scorer() -> Arc<RiskScorer> {
        let mut events = Vec::new();
        for i in 0..12 {
            events.push(RawEvent {
                disaster_type: "Wildfire".to_string(),
                temperature: Some(41.0 + (i % 5) as f64),
                humidity: Some(12.0 + (i % 6) as f64),
                pollution: Some(290.0 + (i * 3 % 40) as f64),
            });
        }
        for i in 0..40 {
            events.push(RawEvent {
                disaster_type: "Flood".to_string(),
                temperature: Some(15.0 + (i % 9) as f64),
                humidity: Some(75.0 + (i % 15) as f64),
                pollution: Some(25.0 + (i * 2 % 50) as f64),
            });
        }
        let set = build_training_set(&events, 42).unwrap();
        let config = TrainerConfig {
            n_trees: 20,
            max_depth: 6,
            min_weight_split: 2.0,
            ..TrainerConfig::default()
        };
        let (artifact, _) = train(&set, &config).unwrap();
        Arc::new(RiskScorer::new(artifact))
    }

    fn test_state(notifier: Option<Arc<RecordingSender>>) -> AppState {
        let mut state = AppState::new(test_scorer(), Arc::new(InMemoryRegistry::new()));
        if let Some(notifier) = notifier {
            state = state.with_notifier(notifier);
        }
        state
    }

    fn manual_request(t: f64, h: f64, p: f64) -> ScoreRequest {
        ScoreRequest {
            source: InputSource::Manual,
            temperature: Some(t),
            humidity: Some(h),
            pollution: Some(p),
            session_id: None,
        }
    }

    #[tokio::test]
    async fn test_score_updates_session() {
        let state = test_state(None);

        let Json(response) = score(State(state.clone()), Json(manual_request(25.0, 80.0, 30.0)))
            .await
            .unwrap();

        let session = state.sessions.get(&response.session_id).unwrap();
        assert!(session.assessment.is_some());
        assert_eq!(
            session.assessment.as_ref().unwrap().adjusted_probability,
            response.assessment.adjusted_probability
        );
    }

    #[tokio::test]
    async fn test_score_missing_reading_rejected() {
        let state = test_state(None);
        let request = ScoreRequest {
            source: InputSource::Manual,
            temperature: Some(30.0),
            humidity: None,
            pollution: Some(60.0),
            session_id: None,
        };

        let err = score(State(state), Json(request)).await.unwrap_err();
        assert_eq!(err.error_code(), "MISSING_INPUT");
    }

    #[tokio::test]
    async fn test_alert_dispatches_notification() {
        let sender = Arc::new(RecordingSender::new(false));
        let state = test_state(Some(sender.clone()));

        // Hot, dry, polluted: firmly in the wildfire cluster, and above
        // 50°C the lowered threshold applies.
        let Json(response) = score(State(state), Json(manual_request(55.0, 10.0, 320.0)))
            .await
            .unwrap();

        assert!(response.assessment.alert);
        let outcome = response.notification.unwrap();
        assert!(outcome.attempted);
        assert!(outcome.delivered);
        assert_eq!(sender.sent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_dispatch_preserves_assessment() {
        let sender = Arc::new(RecordingSender::new(true));
        let state = test_state(Some(sender));

        let Json(response) = score(State(state), Json(manual_request(55.0, 10.0, 320.0)))
            .await
            .unwrap();

        // The assessment survives the failed dispatch.
        assert!(response.assessment.alert);
        assert!(response.assessment.adjusted_probability > 0.0);
        let outcome = response.notification.unwrap();
        assert!(outcome.attempted);
        assert!(!outcome.delivered);
        assert!(outcome.error.is_some());
    }

    #[tokio::test]
    async fn test_no_alert_no_dispatch() {
        let sender = Arc::new(RecordingSender::new(false));
        let state = test_state(Some(sender.clone()));

        let Json(response) = score(State(state), Json(manual_request(18.0, 85.0, 30.0)))
            .await
            .unwrap();

        assert!(!response.assessment.alert);
        assert!(response.notification.is_none());
        assert_eq!(sender.sent.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_register_attaches_session_assessment() {
        let state = test_state(None);

        let Json(score_response) =
            score(State(state.clone()), Json(manual_request(42.0, 15.0, 300.0)))
                .await
                .unwrap();

        let request = RegisterRequest {
            name: "Asha".to_string(),
            phone: "+919876543210".to_string(),
            location: "Jayanagar".to_string(),
            session_id: Some(score_response.session_id),
        };
        let (status, Json(response)) = register(State(state.clone()), Json(request))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let stored = state
            .registry
            .get("+919876543210")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, response.registration_id);
        let attached = stored.latest_assessment.unwrap();
        assert_eq!(
            attached.adjusted_probability,
            score_response.assessment.adjusted_probability
        );
    }

    #[tokio::test]
    async fn test_register_rejects_bad_phone() {
        let state = test_state(None);

        for phone in ["12345", "+9112345", "+9212345678901", "9876543210"] {
            let request = RegisterRequest {
                name: "Asha".to_string(),
                phone: phone.to_string(),
                location: "Jayanagar".to_string(),
                session_id: None,
            };
            let err = register(State(state.clone()), Json(request))
                .await
                .unwrap_err();
            assert_eq!(err.error_code(), "VALIDATION_ERROR", "phone {phone}");
        }
    }

    #[tokio::test]
    async fn test_live_readings_without_feed_is_configuration_error() {
        let state = test_state(None);
        let err = live_readings(State(state)).await.unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn test_model_metadata() {
        let state = test_state(None);
        let Json(metadata) = model_metadata(State(state)).await.unwrap();
        assert_eq!(metadata.n_features, 5);
        assert_eq!(metadata.name, "wildfire-balanced-forest");
    }
}
