//! Seams to the fitted scaler and classifier
//!
//! Both are treated as black boxes: the scaler exposes the column manifest
//! it was fit on plus a transform, the classifier a predict.

use crate::error::Result;
use hotspot_core::FeatureVector;
use hotspot_schema::FeatureSchema;

/// Predicted class label (a reporting district)
pub type Label = String;

/// A fitted feature scaler
pub trait Scaler: Send + Sync + std::fmt::Debug {
    /// Columns the scaler was fit on, in order
    fn feature_names(&self) -> &FeatureSchema;

    /// Transform an aligned vector
    fn transform(&self, features: &FeatureVector) -> Result<FeatureVector>;
}

/// A fitted classifier
pub trait Classifier: Send + Sync + std::fmt::Debug {
    /// Input width the classifier was fit on
    fn n_features(&self) -> usize;

    fn classes(&self) -> &[Label];

    fn predict(&self, features: &FeatureVector) -> Result<Label>;
}

pub(crate) fn check_dim(expected: usize, features: &FeatureVector) -> Result<()> {
    if features.len() != expected {
        return Err(hotspot_core::Error::InvalidDimension {
            expected,
            actual: features.len(),
        }
        .into());
    }
    Ok(())
}
