//! # hotspot API
//!
//! REST surface over an [`InferenceContext`](hotspot_inference::InferenceContext):
//!
//! - `GET /health` - liveness
//! - `GET /schema` - feature names, one-hot families, classes and policy
//! - `POST /align` - raw record in, aligned feature vector and report out
//! - `POST /predict` - crime query in, predicted reporting district out

pub mod rest;

pub use rest::RestApi;
