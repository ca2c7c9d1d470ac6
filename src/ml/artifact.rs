use crate::error::{AppError, Result};
use crate::ml::forest::BalancedForest;
use crate::ml::models::ModelMetadata;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Artifact format version; bumped on any incompatible layout change
pub const ARTIFACT_VERSION: u32 = 1;

/// Serialized model artifact: the fitted classifier plus its metadata.
///
/// Written once by the trainer, read-only thereafter. Loading an
/// artifact reproduces identical predictions.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub metadata: ModelMetadata,
    pub forest: BalancedForest,
}

impl ModelArtifact {
    /// Persist the artifact to `path`, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Persistence(format!(
                        "Failed to create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let bytes = bincode::serialize(self).map_err(|e| {
            AppError::Persistence(format!("Failed to serialize model artifact: {}", e))
        })?;

        std::fs::write(path, bytes).map_err(|e| {
            AppError::Persistence(format!("Failed to write {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), "Model artifact saved");

        Ok(())
    }

    /// Load an artifact from `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let bytes = std::fs::read(path).map_err(|e| {
            AppError::Persistence(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let artifact: ModelArtifact = bincode::deserialize(&bytes).map_err(|e| {
            AppError::Persistence(format!("Failed to deserialize model artifact: {}", e))
        })?;

        if artifact.format_version != ARTIFACT_VERSION {
            return Err(AppError::Persistence(format!(
                "artifact format version {} is not supported (expected {})",
                artifact.format_version, ARTIFACT_VERSION
            )));
        }

        tracing::info!(
            path = %path.display(),
            trained_at = %artifact.metadata.trained_at,
            n_training_samples = artifact.metadata.n_training_samples,
            "Model artifact loaded"
        );

        Ok(artifact)
    }
}
