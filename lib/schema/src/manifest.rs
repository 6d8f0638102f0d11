//! Feature manifest
//!
//! The feature side of a persisted model artifact: the column manifest the
//! scaler was fit on, the one-hot rules that produce its indicator columns
//! and the alignment policy. Loaded once at startup instead of scanning a
//! dataset's columns per request.

use crate::aligner::{AlignError, AlignPolicy, FeatureAligner};
use crate::expansion::CategoricalExpansions;
use crate::schema::{FeatureSchema, SchemaError};
use serde::{Deserialize, Serialize};

/// Current manifest format version
pub const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureManifest {
    /// Manifest version for future compatibility
    #[serde(default = "default_version")]
    pub version: u32,

    /// Ordered columns the scaler and model expect
    pub feature_names: FeatureSchema,

    /// One-hot rules keyed by raw field name
    #[serde(default)]
    pub expansions: CategoricalExpansions,

    #[serde(default)]
    pub policy: AlignPolicy,
}

fn default_version() -> u32 {
    MANIFEST_VERSION
}

impl FeatureManifest {
    pub fn new(feature_names: FeatureSchema, expansions: CategoricalExpansions) -> Self {
        Self {
            version: MANIFEST_VERSION,
            feature_names,
            expansions,
            policy: AlignPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: AlignPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Expansion rules with every deferred category list filled in
    pub fn resolved_expansions(&self) -> CategoricalExpansions {
        self.expansions.resolve(&self.feature_names)
    }

    /// Compile the aligner described by this manifest
    pub fn build_aligner(&self) -> Result<FeatureAligner, AlignError> {
        if self.version != MANIFEST_VERSION {
            return Err(SchemaError::UnsupportedVersion(self.version).into());
        }
        FeatureAligner::new(self.feature_names.clone(), &self.expansions, self.policy)
    }
}
