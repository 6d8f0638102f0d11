//! # hotspot Inference
//!
//! Runs aligned feature vectors through a fitted scaler and classifier.
//!
//! ## Features
//!
//! - **Explicit context**: [`InferenceContext`] is built once from a
//!   [`ModelArtifact`] and passed to each call; nothing is global
//! - **Black-box seams**: [`Scaler`] and [`Classifier`] traits, so tests can
//!   swap in mocks
//! - **Bundled models**: [`StandardScaler`], [`LinearClassifier`],
//!   [`NearestCentroidClassifier`]
//! - **Form queries**: [`CrimeQuery`] derives the model's date/time/location
//!   features
//!
//! ## Example
//!
//! ```rust,no_run
//! use hotspot_inference::{InferenceContext, CrimeQuery};
//! use chrono::NaiveDate;
//!
//! let context = InferenceContext::load("artifacts/la_crime.json").unwrap();
//! let query = CrimeQuery {
//!     date_rptd: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
//!     date_occ: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     time_occ: 1430,
//!     area_name: "Hollywood".to_string(),
//!     lat: 34.098,
//!     lon: -118.327,
//! };
//! let prediction = context.predict_query(&query).unwrap();
//! println!("Predicted Reporting District: {}", prediction.label);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ CrimeQuery  │────>│   Aligner   │────>│   Scaler    │────>│ Classifier  │
//! │ (form input)│     │  (schema)   │     │ (transform) │     │  (predict)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```

pub mod error;
pub mod model;
pub mod scaler;
pub mod classifier;
pub mod artifact;
pub mod query;
pub mod context;

// Re-export main types for convenience
pub use error::{InferenceError, Result};
pub use model::{Classifier, Label, Scaler};
pub use scaler::{ScalerParams, StandardScaler};
pub use classifier::{ClassifierArtifact, LinearClassifier, NearestCentroidClassifier};
pub use artifact::ModelArtifact;
pub use query::{crime_expansions, CrimeQuery, AREA_PREFIX, CRIME_CODE_PREFIX, MAX_TIME_OCC};
pub use context::{InferenceContext, Prediction};
