//! Feature engineering, classifier training, and model persistence.

pub mod artifact;
pub mod features;
pub mod forest;
pub mod models;
pub mod trainer;

pub use artifact::{ModelArtifact, ARTIFACT_VERSION};
pub use forest::{BalancedForest, ForestParams};
pub use models::{ClassMetrics, EvaluationReport, FeatureImportance, ModelMetadata, PrPoint};
pub use trainer::{train, TrainerConfig};
