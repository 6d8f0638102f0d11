use serde::{Deserialize, Serialize};
use std::ops::Index;

/// A fixed-length numeric feature vector
///
/// Position `i` always corresponds to column `i` of the schema it was
/// assembled against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct FeatureVector {
    data: Vec<f64>,
}

impl FeatureVector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.data.get(index).copied()
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.data
    }

    /// Dot product with a weight row of the same length
    #[inline]
    pub fn dot(&self, weights: &[f64]) -> f64 {
        if self.len() != weights.len() {
            return 0.0;
        }
        self.data.iter().zip(weights).map(|(x, w)| x * w).sum()
    }

    /// Squared Euclidean distance to a point of the same length
    #[inline]
    pub fn squared_distance(&self, other: &[f64]) -> f64 {
        if self.len() != other.len() {
            return f64::INFINITY;
        }
        self.data
            .iter()
            .zip(other)
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(data: Vec<f64>) -> Self {
        Self::new(data)
    }
}

impl Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.data[index]
    }
}
