//! Standardizing scaler
//!
//! `z = (x - mean) / scale`. A zero scale (constant training column) is
//! treated as 1.

use crate::error::Result;
use crate::model::{check_dim, Scaler};
use hotspot_core::FeatureVector;
use hotspot_schema::FeatureSchema;
use serde::{Deserialize, Serialize};

/// Persisted scaler parameters, one entry per schema column
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    feature_names: FeatureSchema,
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(feature_names: FeatureSchema, params: ScalerParams) -> Result<Self> {
        let n = feature_names.len();
        for (name, len) in [("mean", params.mean.len()), ("scale", params.scale.len())] {
            if len != n {
                return Err(hotspot_core::Error::InvalidConfig(format!(
                    "scaler {} has {} entries, schema has {} columns",
                    name, len, n
                ))
                .into());
            }
        }

        let scale = params
            .scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();

        Ok(Self {
            feature_names,
            mean: params.mean,
            scale,
        })
    }

    /// Scaler that leaves vectors unchanged
    pub fn identity(feature_names: FeatureSchema) -> Self {
        let n = feature_names.len();
        Self {
            feature_names,
            mean: vec![0.0; n],
            scale: vec![1.0; n],
        }
    }
}

impl Scaler for StandardScaler {
    fn feature_names(&self) -> &FeatureSchema {
        &self.feature_names
    }

    fn transform(&self, features: &FeatureVector) -> Result<FeatureVector> {
        check_dim(self.feature_names.len(), features)?;
        Ok(FeatureVector::new(
            features
                .as_slice()
                .iter()
                .zip(self.mean.iter().zip(&self.scale))
                .map(|(x, (m, s))| (x - m) / s)
                .collect(),
        ))
    }
}
