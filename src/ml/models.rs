use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-class evaluation metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// One point on the precision-recall curve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrPoint {
    pub threshold: f64,
    pub precision: f64,
    pub recall: f64,
}

/// Relative contribution of one feature to ensemble splits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub name: String,
    pub importance: f64,
}

/// Held-out evaluation results for a trained model.
///
/// Reported to a human reviewer; the scorer never reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Overall accuracy on the test partition
    pub accuracy: f64,

    /// Metrics keyed by class name ("wildfire", "non_wildfire")
    pub per_class: HashMap<String, ClassMetrics>,

    /// Precision-recall curve over the wildfire probability
    pub pr_curve: Vec<PrPoint>,

    /// Area under the precision-recall curve
    pub average_precision: f64,

    /// Per-feature importances; non-negative, summing to 1
    pub feature_importances: Vec<FeatureImportance>,

    /// Train partition size
    pub n_train: usize,

    /// Test partition size
    pub n_test: usize,
}

/// Model metadata persisted alongside the fitted classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model name
    pub name: String,

    /// Crate version that produced the artifact
    pub version: String,

    /// Training timestamp
    pub trained_at: chrono::DateTime<chrono::Utc>,

    /// Number of training samples
    pub n_training_samples: usize,

    /// Number of features
    pub n_features: usize,

    /// Hyperparameters, fixed and logged for reproducibility
    pub hyperparameters: HashMap<String, String>,

    /// Held-out evaluation from the training run
    pub evaluation: EvaluationReport,
}
