//! Classifiers loadable from a model artifact

use crate::error::{InferenceError, Result};
use crate::model::{check_dim, Classifier, Label};
use hotspot_core::FeatureVector;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Linear one-vs-rest classifier: argmax of `W·x + b`
///
/// A two-class model may carry a single coefficient row, in which case a
/// positive score selects `classes[1]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinearClassifier {
    pub classes: Vec<Label>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LinearClassifier {
    pub fn new(classes: Vec<Label>, coefficients: Vec<Vec<f64>>, intercepts: Vec<f64>) -> Result<Self> {
        let model = Self {
            classes,
            coefficients,
            intercepts,
        };
        model.validate()?;
        Ok(model)
    }

    /// Check shapes after construction or deserialization
    pub fn validate(&self) -> Result<()> {
        if self.classes.len() < 2 {
            return Err(model_error("linear classifier needs at least two classes"));
        }
        let rows = self.coefficients.len();
        let binary = self.classes.len() == 2 && rows == 1;
        if !binary && rows != self.classes.len() {
            return Err(model_error(format!(
                "{} coefficient rows for {} classes",
                rows,
                self.classes.len()
            )));
        }
        if self.intercepts.len() != rows {
            return Err(model_error(format!(
                "{} intercepts for {} coefficient rows",
                self.intercepts.len(),
                rows
            )));
        }
        check_rows(&self.coefficients)
    }

    fn is_binary(&self) -> bool {
        self.coefficients.len() == 1
    }
}

impl Classifier for LinearClassifier {
    fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    fn classes(&self) -> &[Label] {
        &self.classes
    }

    fn predict(&self, features: &FeatureVector) -> Result<Label> {
        check_dim(self.n_features(), features)?;

        let scores = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, b)| features.dot(row) + b);

        let class = if self.is_binary() {
            let score = scores.sum::<f64>();
            usize::from(score > 0.0)
        } else {
            scores
                .enumerate()
                .max_by_key(|(_, s)| OrderedFloat(*s))
                .map(|(i, _)| i)
                .ok_or_else(|| model_error("linear classifier has no classes"))?
        };

        Ok(self.classes[class].clone())
    }
}

/// Nearest centroid classifier (Euclidean)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NearestCentroidClassifier {
    pub classes: Vec<Label>,
    pub centroids: Vec<Vec<f64>>,
}

impl NearestCentroidClassifier {
    pub fn new(classes: Vec<Label>, centroids: Vec<Vec<f64>>) -> Result<Self> {
        let model = Self { classes, centroids };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(model_error("nearest centroid classifier has no classes"));
        }
        if self.centroids.len() != self.classes.len() {
            return Err(model_error(format!(
                "{} centroids for {} classes",
                self.centroids.len(),
                self.classes.len()
            )));
        }
        check_rows(&self.centroids)
    }
}

impl Classifier for NearestCentroidClassifier {
    fn n_features(&self) -> usize {
        self.centroids.first().map_or(0, Vec::len)
    }

    fn classes(&self) -> &[Label] {
        &self.classes
    }

    fn predict(&self, features: &FeatureVector) -> Result<Label> {
        check_dim(self.n_features(), features)?;

        self.centroids
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| OrderedFloat(features.squared_distance(c)))
            .map(|(i, _)| self.classes[i].clone())
            .ok_or_else(|| model_error("nearest centroid classifier has no classes"))
    }
}

/// Classifier section of a model artifact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    Linear(LinearClassifier),
    NearestCentroid(NearestCentroidClassifier),
}

impl ClassifierArtifact {
    /// Validate and box the classifier
    pub fn into_classifier(self) -> Result<Arc<dyn Classifier>> {
        match self {
            ClassifierArtifact::Linear(model) => {
                model.validate()?;
                Ok(Arc::new(model))
            }
            ClassifierArtifact::NearestCentroid(model) => {
                model.validate()?;
                Ok(Arc::new(model))
            }
        }
    }
}

fn check_rows(rows: &[Vec<f64>]) -> Result<()> {
    let width = rows.first().map_or(0, Vec::len);
    if width == 0 {
        return Err(model_error("model rows are empty"));
    }
    if rows.iter().any(|r| r.len() != width) {
        return Err(model_error("model rows have different lengths"));
    }
    Ok(())
}

fn model_error(message: impl Into<String>) -> InferenceError {
    InferenceError::Model(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<Label> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_linear_multiclass() {
        let model = LinearClassifier::new(
            labels(&["0152", "0646", "1842"]),
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, -1.0]],
            vec![0.0, 0.0, 0.5],
        )
        .unwrap();

        assert_eq!(model.n_features(), 2);
        assert_eq!(model.predict(&FeatureVector::new(vec![2.0, 1.0])).unwrap(), "0152");
        assert_eq!(model.predict(&FeatureVector::new(vec![0.0, 3.0])).unwrap(), "0646");
        assert_eq!(model.predict(&FeatureVector::new(vec![-1.0, -1.0])).unwrap(), "1842");
    }

    #[test]
    fn test_linear_binary_single_row() {
        let model = LinearClassifier::new(labels(&["low", "high"]), vec![vec![1.0]], vec![-0.5]).unwrap();

        assert_eq!(model.predict(&FeatureVector::new(vec![1.0])).unwrap(), "high");
        assert_eq!(model.predict(&FeatureVector::new(vec![0.0])).unwrap(), "low");
    }

    #[test]
    fn test_linear_shape_validation() {
        assert!(LinearClassifier::new(labels(&["a", "b", "c"]), vec![vec![1.0]], vec![0.0]).is_err());
        assert!(LinearClassifier::new(labels(&["a", "b"]), vec![vec![1.0], vec![1.0, 2.0]], vec![0.0, 0.0]).is_err());
        assert!(LinearClassifier::new(labels(&["a", "b"]), vec![vec![1.0]], vec![]).is_err());
    }

    #[test]
    fn test_nearest_centroid() {
        let model = NearestCentroidClassifier::new(
            labels(&["0152", "0646"]),
            vec![vec![0.0, 0.0], vec![10.0, 10.0]],
        )
        .unwrap();

        assert_eq!(model.predict(&FeatureVector::new(vec![1.0, 2.0])).unwrap(), "0152");
        assert_eq!(model.predict(&FeatureVector::new(vec![8.0, 9.0])).unwrap(), "0646");
        assert!(model.predict(&FeatureVector::new(vec![1.0])).is_err());
    }

    #[test]
    fn test_artifact_json() {
        let artifact: ClassifierArtifact = serde_json::from_str(
            r#"{"kind": "nearest_centroid", "classes": ["a", "b"], "centroids": [[0.0], [1.0]]}"#,
        )
        .unwrap();
        let classifier = artifact.into_classifier().unwrap();

        assert_eq!(classifier.n_features(), 1);
        assert_eq!(classifier.classes(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_artifact_validated_on_load() {
        let artifact: ClassifierArtifact = serde_json::from_str(
            r#"{"kind": "linear", "classes": ["a", "b"], "coefficients": [[1.0]], "intercepts": [0.0, 1.0]}"#,
        )
        .unwrap();
        assert!(matches!(artifact.into_classifier(), Err(InferenceError::Model(_))));
    }
}
