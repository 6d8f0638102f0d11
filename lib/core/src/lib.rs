//! # hotspot Core
//!
//! Value types shared by every hotspot crate.
//!
//! - [`RawValue`] / [`RawRecord`] - heterogeneous input fields as they arrive
//!   from a form or request body
//! - [`FeatureVector`] - the ordered numeric vector a scaler and classifier consume
//! - [`Error`] / [`Result`] - shared error type
//!
//! ## Example
//!
//! ```rust
//! use hotspot_core::{RawRecord, RawValue, FeatureVector};
//!
//! let record = RawRecord::new()
//!     .with("TIME OCC", 1430)
//!     .with("LAT", 34.05)
//!     .with("area_name", "Hollywood");
//! assert_eq!(record.get("LAT"), Some(&RawValue::Float(34.05)));
//!
//! let v = FeatureVector::new(vec![1430.0, 34.05]);
//! assert_eq!(v.len(), 2);
//! ```

pub mod error;
pub mod value;
pub mod vector;

pub use error::{Error, Result};
pub use value::{RawRecord, RawValue};
pub use vector::FeatureVector;
