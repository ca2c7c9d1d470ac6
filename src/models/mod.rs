use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One historical disaster record from the raw multi-hazard table.
///
/// Readings may be missing; rows with any missing reading are excluded
/// from dataset construction. Column names follow the source table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    /// Disaster type label (free-form, e.g. "Wildfire", "Flood")
    #[serde(rename = "Disaster_Type")]
    pub disaster_type: String,

    /// Temperature reading (°C)
    #[serde(rename = "Temperature (°C)")]
    pub temperature: Option<f64>,

    /// Humidity reading (%)
    #[serde(rename = "Humidity Level (%)")]
    pub humidity: Option<f64>,

    /// Pollution reading (AQI)
    #[serde(rename = "Pollution Level (AQI)")]
    pub pollution: Option<f64>,
}

impl RawEvent {
    /// Extract the three readings if all are present
    pub fn readings(&self) -> Option<Readings> {
        match (self.temperature, self.humidity, self.pollution) {
            (Some(temperature), Some(humidity), Some(pollution)) => Some(Readings {
                temperature,
                humidity,
                pollution,
            }),
            _ => None,
        }
    }
}

/// The three base environmental readings, all present
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Readings {
    /// Temperature (°C)
    pub temperature: f64,

    /// Humidity (%)
    pub humidity: f64,

    /// Air quality index
    pub pollution: f64,
}

/// One labeled, feature-augmented training row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledSample {
    /// Base readings
    pub readings: Readings,

    /// Binary label: 1 = wildfire, 0 = non-wildfire
    pub label: usize,

    /// temperature * (100 - humidity)
    pub temp_humidity_interaction: f64,

    /// temperature * pollution
    pub temp_pollution_interaction: f64,
}

/// Coarse risk bucket over the adjusted probability.
///
/// Drives display color and nothing else; the alert decision uses the
/// temperature-dependent threshold, not the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Classify an adjusted probability on the 0-100 scale.
    ///
    /// High > 70, Medium > 40, Low otherwise. Boundaries inclusive on
    /// the lower tier, so every value maps to exactly one tier.
    pub fn from_adjusted(adjusted: f64) -> Self {
        if adjusted > 70.0 {
            RiskTier::High
        } else if adjusted > 40.0 {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    /// Display color for this tier
    pub fn color(&self) -> &'static str {
        match self {
            RiskTier::High => "#ff0000",
            RiskTier::Medium => "#ff9900",
            RiskTier::Low => "#00aa00",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "low"),
            RiskTier::Medium => write!(f, "medium"),
            RiskTier::High => write!(f, "high"),
        }
    }
}

/// One scoring result. Created fresh per request; the core never
/// persists it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Input readings
    pub readings: Readings,

    /// Model probability P(wildfire) in [0, 1]
    pub raw_probability: f64,

    /// Probability after temperature scaling, on a 0-100 scale
    pub adjusted_probability: f64,

    /// Temperature scale factor applied (1.0 below 35°C)
    pub scale_factor: f64,

    /// Active alert threshold (temperature-dependent)
    pub alert_threshold: f64,

    /// Risk tier for display
    pub tier: RiskTier,

    /// Display color derived from the tier
    pub color: String,

    /// Whether adjusted probability exceeds the active threshold
    pub alert: bool,

    /// Assessment timestamp
    pub assessed_at: DateTime<Utc>,
}

/// User contact record stored by the registration collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    /// Registration id
    pub id: Uuid,

    /// Full name
    pub name: String,

    /// Phone number (+91 followed by 10 digits)
    pub phone: String,

    /// Free-form location
    pub location: String,

    /// Latest assessment at registration time, if one was computed
    pub latest_assessment: Option<RiskAssessment>,

    /// Registration timestamp
    pub registered_at: DateTime<Utc>,
}

impl Registration {
    pub fn new(name: String, phone: String, location: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            phone,
            location,
            latest_assessment: None,
            registered_at: Utc::now(),
        }
    }

    pub fn with_assessment(mut self, assessment: RiskAssessment) -> Self {
        self.latest_assessment = Some(assessment);
        self
    }
}

/// Session-scoped cache of the latest assessment and contact fields.
///
/// Owned by the API state and passed by reference into handlers; there
/// is no process-wide singleton holding scoring results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Latest readings scored in this session
    pub readings: Option<Readings>,

    /// Latest assessment computed in this session
    pub assessment: Option<RiskAssessment>,

    /// Contact fields gathered so far
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}
