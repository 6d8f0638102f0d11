//! # hotspot Schema
//!
//! Schema-aligned feature assembly for tabular inference.
//!
//! ## Overview
//!
//! A fitted scaler or model expects its input columns in one exact order.
//! Raw records rarely match it: categorical fields have to become one-hot
//! indicator columns, some columns are never supplied, and callers send
//! fields the model never saw. The [`FeatureAligner`] closes that gap.
//!
//! **How it works:**
//! 1. The [`FeatureSchema`] (column manifest) and [`CategoricalExpansions`]
//!    are loaded once from a [`FeatureManifest`]
//! 2. The aligner compiles each [`OneHotRule`] to schema positions
//! 3. Each [`RawRecord`](hotspot_core::RawRecord) is expanded, zero-filled,
//!    filtered and laid out in schema order
//!
//! ## Example
//!
//! ```rust
//! use hotspot_schema::{align, FeatureSchema, CategoricalExpansions, OneHotRule};
//! use hotspot_core::RawRecord;
//!
//! let schema = FeatureSchema::new(["TIME_OCC", "LAT", "LON", "AREA_Central", "AREA_Hollywood"]).unwrap();
//! let expansions = CategoricalExpansions::new()
//!     .with_rule("area_name", OneHotRule::deferred("AREA_"));
//!
//! let raw = RawRecord::new()
//!     .with("TIME_OCC", 1430)
//!     .with("LAT", 34.05)
//!     .with("LON", -118.25)
//!     .with("area_name", "Hollywood");
//!
//! let v = align(&raw, &schema, &expansions).unwrap();
//! assert_eq!(v.as_slice(), &[1430.0, 34.05, -118.25, 0.0, 1.0]);
//! ```
//!
//! ## Alignment Flow
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  RawRecord  │────>│   Aligner   │────>│FeatureVector│
//! │  (fields)   │     │ (one-hot +  │     │(schema order│
//! └─────────────┘     │  zero-fill) │     └─────────────┘
//!                     └──────┬──────┘
//!                            │
//!                     ┌──────┴──────┐
//!                     │  Alignment  │
//!                     │   Report    │
//!                     └─────────────┘
//! ```

pub mod schema;
pub mod expansion;
pub mod aligner;
pub mod explain;
pub mod manifest;

// Re-export main types
pub use schema::{FeatureSchema, SchemaError};
pub use expansion::{CategoricalExpansions, OneHotRule};
pub use aligner::{
    align,
    AlignError,
    AlignPolicy,
    ExtraFieldPolicy,
    FeatureAligner,
    MissingColumnPolicy,
    UnknownCategoryPolicy,
};
pub use explain::{AlignmentReport, IgnoredCategory};
pub use manifest::{FeatureManifest, MANIFEST_VERSION};
