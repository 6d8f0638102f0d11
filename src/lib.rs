//! # hotspot
//!
//! Crime hotspot prediction over Los Angeles incident features.
//!
//! hotspot turns a raw record of date, time, location and category fields
//! into the exact column layout a fitted scaler and classifier expect, then
//! predicts a reporting district.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! hotspot serve --artifact artifacts/la_crime.json --http-port 8080
//! curl -X POST localhost:8080/predict -H 'content-type: application/json' -d \
//!   '{"date_rptd":"2024-03-02","date_occ":"2024-03-01","time_occ":1430,"area_name":"Hollywood","lat":34.098,"lon":-118.327}'
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use hotspot::prelude::*;
//!
//! let schema = FeatureSchema::new(["TIME_OCC", "LAT", "LON", "AREA_Central", "AREA_Hollywood"]).unwrap();
//! let expansions = CategoricalExpansions::new()
//!     .with_rule("area_name", OneHotRule::deferred("AREA_"));
//! let aligner = FeatureAligner::new(schema, &expansions, AlignPolicy::default()).unwrap();
//!
//! let raw = RawRecord::new()
//!     .with("TIME_OCC", 1430)
//!     .with("LAT", 34.05)
//!     .with("LON", -118.25)
//!     .with("area_name", "Hollywood");
//! let v = aligner.align(&raw).unwrap();
//! assert_eq!(v.as_slice(), &[1430.0, 34.05, -118.25, 0.0, 1.0]);
//! ```
//!
//! ## Crate Structure
//!
//! - `hotspot-core` - raw records, feature vectors, shared errors
//! - `hotspot-schema` - feature schema, one-hot rules, the aligner
//! - `hotspot-inference` - scaler/classifier seams, model artifact, inference context
//! - `hotspot-api` - REST API

// Re-export core types
pub use hotspot_core::{Error, FeatureVector, RawRecord, RawValue, Result};

// Re-export schema
pub use hotspot_schema::{
    align, AlignError, AlignPolicy, AlignmentReport, CategoricalExpansions, ExtraFieldPolicy,
    FeatureAligner, FeatureManifest, FeatureSchema, MissingColumnPolicy, OneHotRule,
    SchemaError, UnknownCategoryPolicy,
};

// Re-export inference
pub use hotspot_inference::{
    crime_expansions, Classifier, CrimeQuery, InferenceContext, InferenceError, Label,
    ModelArtifact, Prediction, Scaler, StandardScaler,
};

// Re-export API
pub use hotspot_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        align, AlignError, AlignPolicy, CategoricalExpansions, CrimeQuery, FeatureAligner,
        FeatureSchema, FeatureVector, InferenceContext, OneHotRule, RawRecord, RawValue,
        RestApi,
    };
}
