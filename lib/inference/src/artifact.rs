//! Persisted model artifact
//!
//! One JSON file with everything inference needs: the feature manifest,
//! the scaler parameters and the classifier.

use crate::classifier::ClassifierArtifact;
use crate::error::Result;
use crate::scaler::ScalerParams;
use hotspot_schema::FeatureManifest;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelArtifact {
    pub features: FeatureManifest,
    pub scaler: ScalerParams,
    pub classifier: ClassifierArtifact,
}

impl ModelArtifact {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read an artifact from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let artifact = Self::from_json(&json)?;
        info!(
            "Loaded model artifact {:?} ({} features)",
            path,
            artifact.features.feature_names.len()
        );
        Ok(artifact)
    }

    /// Write an artifact to disk
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;

        // Write to temporary file first, then rename
        let temp_file = path.with_extension("tmp");
        std::fs::write(&temp_file, json)?;
        std::fs::rename(&temp_file, path)?;
        Ok(())
    }
}
