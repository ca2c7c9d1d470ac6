//! Risk scoring: model inference, temperature scaling, tiering, and
//! the alert decision. Pure computation; callers own all I/O.

use crate::error::{AppError, Result};
use crate::ml::artifact::ModelArtifact;
use crate::ml::features;
use crate::ml::models::ModelMetadata;
use crate::models::{Readings, RiskAssessment, RiskTier};
use chrono::Utc;

/// Temperature above which the probability is scaled upward
const SCALING_TEMPERATURE: f64 = 35.0;

/// Scale factor slope per degree above the scaling temperature
const SCALING_SLOPE: f64 = 0.05;

/// Scale factor ceiling
const SCALING_CAP: f64 = 1.5;

/// Temperature above which the lowered alert threshold applies
const EXTREME_HEAT_TEMPERATURE: f64 = 50.0;

/// Alert threshold under extreme heat (adjusted probability, 0-100)
const EXTREME_HEAT_THRESHOLD: f64 = 15.0;

/// Default alert threshold (adjusted probability, 0-100)
const DEFAULT_THRESHOLD: f64 = 40.0;

/// Post-hoc temperature scale factor.
///
/// Heuristic compensation for under-representation of extreme-heat
/// cases in the training data, not a calibrated correction.
pub fn temperature_scale_factor(temperature: f64) -> f64 {
    if temperature > SCALING_TEMPERATURE {
        SCALING_CAP.min(1.0 + (temperature - SCALING_TEMPERATURE) * SCALING_SLOPE)
    } else {
        1.0
    }
}

/// Active alert threshold for the given temperature.
///
/// Note this and the scale factor both key off temperature, so extreme
/// heat inflates the score and lowers the alerting bar at once. The
/// behavior is preserved deliberately and covered by regression tests.
pub fn alert_threshold(temperature: f64) -> f64 {
    if temperature > EXTREME_HEAT_TEMPERATURE {
        EXTREME_HEAT_THRESHOLD
    } else {
        DEFAULT_THRESHOLD
    }
}

/// Optional scoring inputs as gathered by the caller (form or feed)
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreInput {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pollution: Option<f64>,
}

impl ScoreInput {
    /// Require all three readings, naming the first missing one
    fn complete(&self) -> Result<Readings> {
        let temperature = self
            .temperature
            .ok_or_else(|| AppError::MissingInput("temperature reading is required".to_string()))?;
        let humidity = self
            .humidity
            .ok_or_else(|| AppError::MissingInput("humidity reading is required".to_string()))?;
        let pollution = self
            .pollution
            .ok_or_else(|| AppError::MissingInput("pollution reading is required".to_string()))?;

        Ok(Readings {
            temperature,
            humidity,
            pollution,
        })
    }
}

/// Risk scorer over a frozen model artifact.
///
/// The artifact never mutates after load, so one scorer may be shared
/// behind an `Arc` across concurrent scoring calls.
pub struct RiskScorer {
    artifact: ModelArtifact,
}

impl RiskScorer {
    pub fn new(artifact: ModelArtifact) -> Self {
        Self { artifact }
    }

    /// Load the persisted model artifact and freeze it
    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        Ok(Self::new(ModelArtifact::load(path)?))
    }

    /// Metadata of the loaded model
    pub fn metadata(&self) -> &ModelMetadata {
        &self.artifact.metadata
    }

    /// Score three raw readings into a risk assessment.
    ///
    /// Fails with `MissingInput` if any reading is absent; no fallback
    /// is substituted and no partial assessment is produced.
    pub fn score(&self, input: ScoreInput) -> Result<RiskAssessment> {
        let readings = input.complete()?;

        let feature_row = features::feature_vector(&readings);
        let raw_probability = self.artifact.forest.predict_one(&feature_row)?;

        Ok(self.assess(readings, raw_probability))
    }

    /// Deterministic post-model pipeline: scaling, tiering, alerting.
    ///
    /// Split out from `score` so the adjustment rules are testable with
    /// a fixed raw probability.
    pub fn assess(&self, readings: Readings, raw_probability: f64) -> RiskAssessment {
        let scale_factor = temperature_scale_factor(readings.temperature);
        let adjusted_probability = (raw_probability * 100.0 * scale_factor).min(100.0);

        let threshold = alert_threshold(readings.temperature);
        let alert = adjusted_probability > threshold;

        let tier = RiskTier::from_adjusted(adjusted_probability);

        tracing::debug!(
            temperature = readings.temperature,
            raw_probability,
            adjusted_probability,
            scale_factor,
            threshold,
            %tier,
            alert,
            "Risk assessed"
        );

        RiskAssessment {
            readings,
            raw_probability,
            adjusted_probability,
            scale_factor,
            alert_threshold: threshold,
            tier,
            color: tier.color().to_string(),
            alert,
            assessed_at: Utc::now(),
        }
    }
}
