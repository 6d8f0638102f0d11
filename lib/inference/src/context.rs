//! Inference context
//!
//! Built once at startup and handed to every prediction call. Holds the
//! compiled aligner next to the scaler and classifier it feeds, and checks
//! that their shapes agree before serving anything.

use crate::artifact::ModelArtifact;
use crate::error::{InferenceError, Result};
use crate::model::{Classifier, Label, Scaler};
use crate::query::CrimeQuery;
use crate::scaler::StandardScaler;
use hotspot_core::RawRecord;
use hotspot_schema::{
    AlignPolicy, AlignmentReport, CategoricalExpansions, FeatureAligner, FeatureSchema,
    SchemaError, MANIFEST_VERSION,
};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// A predicted label and how the input was aligned to get it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Prediction {
    pub label: Label,
    pub report: AlignmentReport,
}

#[derive(Debug, Clone)]
pub struct InferenceContext {
    aligner: FeatureAligner,
    scaler: Arc<dyn Scaler>,
    classifier: Arc<dyn Classifier>,
}

impl InferenceContext {
    /// Build a context; the schema is read from the scaler's feature names
    pub fn new(
        scaler: Arc<dyn Scaler>,
        classifier: Arc<dyn Classifier>,
        expansions: &CategoricalExpansions,
        policy: AlignPolicy,
    ) -> Result<Self> {
        let schema = scaler.feature_names().clone();
        if classifier.n_features() != schema.len() {
            return Err(hotspot_core::Error::InvalidConfig(format!(
                "classifier expects {} features, scaler was fit on {}",
                classifier.n_features(),
                schema.len()
            ))
            .into());
        }

        let aligner = FeatureAligner::new(schema, expansions, policy)?;
        info!(
            "Inference context ready: {} features, {} classes",
            aligner.dim(),
            classifier.classes().len()
        );

        Ok(Self {
            aligner,
            scaler,
            classifier,
        })
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        let manifest = artifact.features;
        if manifest.version != MANIFEST_VERSION {
            return Err(InferenceError::Align(
                SchemaError::UnsupportedVersion(manifest.version).into(),
            ));
        }

        let scaler = StandardScaler::new(manifest.feature_names, artifact.scaler)?;
        let classifier = artifact.classifier.into_classifier()?;
        Self::new(Arc::new(scaler), classifier, &manifest.expansions, manifest.policy)
    }

    /// Load an artifact from disk and build a context from it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_artifact(ModelArtifact::load(path)?)
    }

    pub fn aligner(&self) -> &FeatureAligner {
        &self.aligner
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.aligner.schema()
    }

    pub fn classes(&self) -> &[Label] {
        self.classifier.classes()
    }

    /// Align, scale and classify one record
    pub fn predict(&self, record: &RawRecord) -> Result<Prediction> {
        let (features, report) = self.aligner.align_explained(record)?;
        let scaled = self.scaler.transform(&features)?;
        let label = self.classifier.predict(&scaled)?;

        debug!(
            label = %label,
            activated = ?report.activated_columns,
            "prediction"
        );

        Ok(Prediction { label, report })
    }

    /// Validate a form query and predict its reporting district
    pub fn predict_query(&self, query: &CrimeQuery) -> Result<Prediction> {
        query.validate()?;
        self.predict(&query.to_record())
    }

    /// Predict a batch in parallel; fails if any record fails
    pub fn predict_batch(&self, records: &[RawRecord]) -> Result<Vec<Prediction>> {
        records.par_iter().map(|r| self.predict(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::NearestCentroidClassifier;
    use crate::query::crime_expansions;
    use chrono::NaiveDate;
    use hotspot_core::FeatureVector;
    use hotspot_schema::{AlignError, OneHotRule};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Passes vectors through and counts calls
    #[derive(Debug)]
    struct CountingScaler {
        schema: FeatureSchema,
        calls: AtomicUsize,
    }

    impl Scaler for CountingScaler {
        fn feature_names(&self) -> &FeatureSchema {
            &self.schema
        }

        fn transform(&self, features: &FeatureVector) -> Result<FeatureVector> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(features.clone())
        }
    }

    /// Returns the name of the first column set to 1
    #[derive(Debug)]
    struct HotColumnClassifier {
        schema: FeatureSchema,
        classes: Vec<Label>,
    }

    impl Classifier for HotColumnClassifier {
        fn n_features(&self) -> usize {
            self.schema.len()
        }

        fn classes(&self) -> &[Label] {
            &self.classes
        }

        fn predict(&self, features: &FeatureVector) -> Result<Label> {
            let hot = features.as_slice().iter().position(|&x| x == 1.0);
            Ok(hot
                .and_then(|i| self.schema.column(i))
                .unwrap_or("none")
                .to_string())
        }
    }

    fn schema() -> FeatureSchema {
        FeatureSchema::new([
            "TIME OCC",
            "LAT",
            "LON",
            "Rpt_Year",
            "Occ_Year",
            "Occ_Month",
            "Occ_Day",
            "AREA NAME_Central",
            "AREA NAME_Hollywood",
            "Crm Cd_510",
        ])
        .unwrap()
    }

    fn mock_context() -> (InferenceContext, Arc<CountingScaler>) {
        let scaler = Arc::new(CountingScaler {
            schema: schema(),
            calls: AtomicUsize::new(0),
        });
        let classifier = Arc::new(HotColumnClassifier {
            schema: schema(),
            classes: vec!["AREA NAME_Central".to_string(), "AREA NAME_Hollywood".to_string()],
        });
        let context = InferenceContext::new(
            scaler.clone(),
            classifier,
            &crime_expansions(),
            AlignPolicy::default(),
        )
        .unwrap();
        (context, scaler)
    }

    fn query(area: &str) -> CrimeQuery {
        CrimeQuery {
            date_rptd: NaiveDate::from_ymd_opt(2023, 2, 5).unwrap(),
            date_occ: NaiveDate::from_ymd_opt(2023, 2, 4).unwrap(),
            time_occ: 2200,
            area_name: area.to_string(),
            lat: 34.05,
            lon: -118.25,
        }
    }

    #[test]
    fn test_predict_query_with_mocks() {
        let (context, scaler) = mock_context();
        let prediction = context.predict_query(&query("Hollywood")).unwrap();

        assert_eq!(prediction.label, "AREA NAME_Hollywood");
        assert_eq!(prediction.report.activated_columns, vec!["AREA NAME_Hollywood"]);
        assert_eq!(prediction.report.defaulted_columns, vec!["Crm Cd_510"]);
        assert_eq!(scaler.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_query_never_reaches_scaler() {
        let (context, scaler) = mock_context();
        let result = context.predict_query(&CrimeQuery { time_occ: 2500, ..query("Central") });

        assert!(matches!(result, Err(ref e) if e.is_client_error()));
        assert_eq!(scaler.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unknown_area_surfaces_as_failed_prediction() {
        let (context, _) = mock_context();
        let result = context.predict_query(&query("Atlantis"));
        assert!(matches!(
            result,
            Err(InferenceError::Align(AlignError::UnknownCategory { .. }))
        ));
    }

    #[test]
    fn test_predict_batch() {
        let (context, scaler) = mock_context();
        let records = vec![query("Central").to_record(), query("Hollywood").to_record()];

        let predictions = context.predict_batch(&records).unwrap();
        let labels: Vec<_> = predictions.iter().map(|p| p.label.as_str()).collect();

        assert_eq!(labels, vec!["AREA NAME_Central", "AREA NAME_Hollywood"]);
        assert_eq!(scaler.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_classifier_width_mismatch_is_config_error() {
        let scaler = Arc::new(StandardScaler::identity(schema()));
        let classifier = Arc::new(
            NearestCentroidClassifier::new(vec!["a".to_string()], vec![vec![0.0; 3]]).unwrap(),
        );
        let result = InferenceContext::new(
            scaler,
            classifier,
            &CategoricalExpansions::new(),
            AlignPolicy::default(),
        );

        assert!(matches!(
            result,
            Err(InferenceError::Core(hotspot_core::Error::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_expansion_conflict_fails_at_startup() {
        let (_, scaler) = mock_context();
        let classifier = Arc::new(HotColumnClassifier {
            schema: schema(),
            classes: vec![],
        });
        let expansions =
            CategoricalExpansions::new().with_rule("LAT", OneHotRule::deferred("AREA NAME_"));
        let result = InferenceContext::new(scaler, classifier, &expansions, AlignPolicy::default());

        assert!(matches!(
            result,
            Err(InferenceError::Align(AlignError::SchemaConflict { .. }))
        ));
    }
}
