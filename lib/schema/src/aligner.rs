//! Schema-aligned feature assembly
//!
//! Turns a [`RawRecord`] into a [`FeatureVector`] whose positions match a
//! [`FeatureSchema`] exactly:
//!
//! 1. Categorical fields are expanded into their whole one-hot family
//!    (activated column 1, the rest 0)
//! 2. Schema columns the record does not produce are filled with 0
//! 3. Fields outside the schema are dropped or rejected per [`AlignPolicy`]
//! 4. Values are laid out strictly in schema order
//!
//! Rules are compiled against the schema once in [`FeatureAligner::new`];
//! aligning a record is a pure function of the record.

use crate::expansion::CategoricalExpansions;
use crate::explain::{AlignmentReport, IgnoredCategory};
use crate::schema::{FeatureSchema, SchemaError};
use ahash::AHashMap;
use hotspot_core::{FeatureVector, RawRecord, RawValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// What to do with a category value that has no indicator column
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCategoryPolicy {
    /// Fail with [`AlignError::UnknownCategory`]
    #[default]
    Reject,
    /// Leave the family all-zero and log a warning
    Ignore,
}

/// What to do with a raw field that is not in the schema
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExtraFieldPolicy {
    /// Log a warning and drop the field
    #[default]
    WarnAndDrop,
    /// Fail with [`AlignError::UnexpectedField`]
    Reject,
}

/// What to do with a plain schema column the record does not supply
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingColumnPolicy {
    /// Fill with 0
    #[default]
    Zero,
    /// Fail with [`AlignError::MissingSchemaColumn`]
    Reject,
}

/// Alignment policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct AlignPolicy {
    pub unknown_category: UnknownCategoryPolicy,
    pub extra_fields: ExtraFieldPolicy,
    pub missing_columns: MissingColumnPolicy,
}

impl AlignPolicy {
    /// Reject anything that is not an exact fit
    pub fn strict() -> Self {
        Self {
            unknown_category: UnknownCategoryPolicy::Reject,
            extra_fields: ExtraFieldPolicy::Reject,
            missing_columns: MissingColumnPolicy::Reject,
        }
    }

    /// Zero-fill gaps, drop extra fields and leave unknown categories at zero
    pub fn lenient() -> Self {
        Self {
            unknown_category: UnknownCategoryPolicy::Ignore,
            extra_fields: ExtraFieldPolicy::WarnAndDrop,
            missing_columns: MissingColumnPolicy::Zero,
        }
    }
}

/// Errors raised while aligning a record
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlignError {
    #[error("Schema column '{0}' is not produced by the record or any expansion rule")]
    MissingSchemaColumn(String),

    #[error("Unknown category '{value}' for field '{field}'")]
    UnknownCategory { field: String, value: String },

    #[error("Field '{field}' conflicts with schema column '{column}': {reason}")]
    SchemaConflict {
        field: String,
        column: String,
        reason: String,
    },

    #[error("Field '{0}' is not part of the schema")]
    UnexpectedField(String),

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A one-hot family resolved to schema positions
#[derive(Debug, Clone)]
struct CompiledFamily {
    field: String,
    /// category -> schema position
    categories: AHashMap<String, usize>,
    /// every position of the family, in schema order
    positions: Vec<usize>,
}

/// Aligns raw records to a fixed feature schema
#[derive(Debug, Clone)]
pub struct FeatureAligner {
    schema: FeatureSchema,
    families: Vec<CompiledFamily>,
    by_field: AHashMap<String, usize>,
    /// schema position -> owning family
    owner: Vec<Option<usize>>,
    policy: AlignPolicy,
}

impl FeatureAligner {
    /// Compile expansion rules against a schema
    ///
    /// Deferred rules are resolved here. Fails with
    /// [`AlignError::SchemaConflict`] when a categorical field is itself a
    /// schema column or when two families claim the same column.
    pub fn new(
        schema: FeatureSchema,
        expansions: &CategoricalExpansions,
        policy: AlignPolicy,
    ) -> Result<Self, AlignError> {
        let mut families = Vec::with_capacity(expansions.len());
        let mut by_field = AHashMap::with_capacity(expansions.len());
        let mut owner: Vec<Option<usize>> = vec![None; schema.len()];

        for (field, rule) in expansions.sorted() {
            if schema.contains(field) {
                return Err(AlignError::SchemaConflict {
                    field: field.clone(),
                    column: field.clone(),
                    reason: "categorical field shares its name with a schema column".to_string(),
                });
            }

            let rule = rule.resolve(&schema);
            let family_index = families.len();
            let mut categories = AHashMap::with_capacity(rule.categories.len());
            let mut positions = Vec::with_capacity(rule.categories.len());

            for (category, column) in rule.family() {
                let Some(position) = schema.position(&column) else {
                    warn!(field = %field, column = %column, "one-hot column not in schema, dropping it from the family");
                    continue;
                };
                if let Some(other) = owner[position] {
                    if other == family_index {
                        warn!(field = %field, category = %category, "duplicate category in one-hot rule, keeping the first");
                        continue;
                    }
                    let other: &CompiledFamily = &families[other];
                    return Err(AlignError::SchemaConflict {
                        field: field.clone(),
                        column,
                        reason: format!("column already belongs to the one-hot family of '{}'", other.field),
                    });
                }
                owner[position] = Some(family_index);
                categories.insert(category.to_string(), position);
                positions.push(position);
            }

            if positions.is_empty() {
                warn!(field = %field, prefix = %rule.prefix, "one-hot family has no columns in schema");
            }
            positions.sort_unstable();

            by_field.insert(field.clone(), family_index);
            families.push(CompiledFamily {
                field: field.clone(),
                categories,
                positions,
            });
        }

        debug!(
            columns = schema.len(),
            families = families.len(),
            "compiled feature aligner"
        );

        Ok(Self {
            schema,
            families,
            by_field,
            owner,
            policy,
        })
    }

    /// Get a reference to the schema
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Policy the aligner was compiled with
    pub fn policy(&self) -> AlignPolicy {
        self.policy
    }

    /// Output dimension, always the schema length
    pub fn dim(&self) -> usize {
        self.schema.len()
    }

    /// Categorical field -> indicator columns it can set, in schema order
    pub fn family_columns(&self) -> BTreeMap<&str, Vec<&str>> {
        self.families
            .iter()
            .map(|family| {
                let columns = family
                    .positions
                    .iter()
                    .filter_map(|&p| self.schema.column(p))
                    .collect();
                (family.field.as_str(), columns)
            })
            .collect()
    }

    /// Align a record to the schema
    pub fn align(&self, raw: &RawRecord) -> Result<FeatureVector, AlignError> {
        self.align_explained(raw).map(|(vector, _)| vector)
    }

    /// Align a batch of records; fails on the first bad record
    pub fn align_batch(&self, records: &[RawRecord]) -> Result<Vec<FeatureVector>, AlignError> {
        records.iter().map(|r| self.align(r)).collect()
    }

    /// Align a record and report defaulted, dropped and ignored inputs
    pub fn align_explained(
        &self,
        raw: &RawRecord,
    ) -> Result<(FeatureVector, AlignmentReport), AlignError> {
        let n = self.schema.len();
        let mut values = vec![0.0; n];
        let mut produced = vec![false; n];
        let mut report = AlignmentReport::default();

        // Sorted so errors and reports do not depend on hash order
        let mut fields: Vec<(&String, &RawValue)> = raw.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));

        for (name, value) in fields {
            if let Some(&family_index) = self.by_field.get(name.as_str()) {
                self.expand(family_index, name, value, &mut values, &mut produced, &mut report)?;
            } else if let Some(position) = self.schema.position(name) {
                if let Some(family_index) = self.owner[position] {
                    return Err(AlignError::SchemaConflict {
                        field: name.clone(),
                        column: name.clone(),
                        reason: format!(
                            "column belongs to the one-hot family of '{}'",
                            self.families[family_index].field
                        ),
                    });
                }
                let Some(x) = value.as_f64() else {
                    return Err(AlignError::SchemaConflict {
                        field: name.clone(),
                        column: name.clone(),
                        reason: format!("category label '{}' supplied for a numeric column", value),
                    });
                };
                if !x.is_finite() {
                    return Err(AlignError::InvalidValue {
                        field: name.clone(),
                        reason: format!("non-finite number {}", x),
                    });
                }
                values[position] = x;
                produced[position] = true;
            } else {
                match self.policy.extra_fields {
                    ExtraFieldPolicy::Reject => {
                        return Err(AlignError::UnexpectedField(name.clone()));
                    }
                    ExtraFieldPolicy::WarnAndDrop => {
                        warn!(field = %name, "dropping field not present in schema");
                        report.dropped_fields.push(name.clone());
                    }
                }
            }
        }

        for position in 0..n {
            if produced[position] {
                continue;
            }
            let column = &self.schema.columns()[position];
            // Family columns are always producible by their rule
            if self.owner[position].is_none()
                && self.policy.missing_columns == MissingColumnPolicy::Reject
            {
                return Err(AlignError::MissingSchemaColumn(column.clone()));
            }
            report.defaulted_columns.push(column.clone());
        }

        debug!(
            columns = n,
            defaulted = report.defaulted_columns.len(),
            dropped = report.dropped_fields.len(),
            "aligned record"
        );

        Ok((FeatureVector::new(values), report))
    }

    fn expand(
        &self,
        family_index: usize,
        field: &str,
        value: &RawValue,
        values: &mut [f64],
        produced: &mut [bool],
        report: &mut AlignmentReport,
    ) -> Result<(), AlignError> {
        let family = &self.families[family_index];
        let Some(label) = value.as_label() else {
            return Err(AlignError::InvalidValue {
                field: field.to_string(),
                reason: format!("number {} cannot select a category", value),
            });
        };

        // The whole family is produced, zeros included
        for &position in &family.positions {
            produced[position] = true;
        }

        match family.categories.get(&*label) {
            Some(&position) => {
                values[position] = 1.0;
                report
                    .activated_columns
                    .push(self.schema.columns()[position].clone());
            }
            None => match self.policy.unknown_category {
                UnknownCategoryPolicy::Reject => {
                    return Err(AlignError::UnknownCategory {
                        field: field.to_string(),
                        value: label.into_owned(),
                    });
                }
                UnknownCategoryPolicy::Ignore => {
                    warn!(field = %field, value = %label, "unknown category, leaving one-hot family at zero");
                    report.ignored_categories.push(IgnoredCategory {
                        field: field.to_string(),
                        value: label.into_owned(),
                    });
                }
            },
        }

        Ok(())
    }
}

/// Align a record with the default policy
///
/// Convenience over [`FeatureAligner`] for one-off calls; compile an
/// aligner once when aligning many records.
pub fn align(
    raw: &RawRecord,
    schema: &FeatureSchema,
    expansions: &CategoricalExpansions,
) -> Result<FeatureVector, AlignError> {
    FeatureAligner::new(schema.clone(), expansions, AlignPolicy::default())?.align(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expansion::OneHotRule;

    fn la_schema() -> FeatureSchema {
        FeatureSchema::new(["TIME_OCC", "LAT", "LON", "AREA_Central", "AREA_Hollywood"]).unwrap()
    }

    fn area_expansions() -> CategoricalExpansions {
        CategoricalExpansions::new().with_rule("area_name", OneHotRule::deferred("AREA_"))
    }

    fn hollywood_record() -> RawRecord {
        RawRecord::new()
            .with("TIME_OCC", 1430)
            .with("LAT", 34.05)
            .with("LON", -118.25)
            .with("area_name", "Hollywood")
    }

    fn aligner(policy: AlignPolicy) -> FeatureAligner {
        FeatureAligner::new(la_schema(), &area_expansions(), policy).unwrap()
    }

    #[test]
    fn test_hollywood_scenario() {
        let v = align(&hollywood_record(), &la_schema(), &area_expansions()).unwrap();
        assert_eq!(v.as_slice(), &[1430.0, 34.05, -118.25, 0.0, 1.0]);
    }

    #[test]
    fn test_unknown_area_rejected_by_default() {
        let raw = hollywood_record().with("area_name", "Unknown");
        let err = align(&raw, &la_schema(), &area_expansions()).unwrap_err();
        assert_eq!(
            err,
            AlignError::UnknownCategory {
                field: "area_name".to_string(),
                value: "Unknown".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_area_ignored_gives_zero_family() {
        let raw = hollywood_record().with("area_name", "Unknown");
        let (v, report) = aligner(AlignPolicy::lenient()).align_explained(&raw).unwrap();

        assert_eq!(v.as_slice(), &[1430.0, 34.05, -118.25, 0.0, 0.0]);
        assert_eq!(report.ignored_categories.len(), 1);
        assert_eq!(report.ignored_categories[0].value, "Unknown");
    }

    #[test]
    fn test_missing_column_defaults_to_zero() {
        let raw = RawRecord::new().with("LAT", 34.05).with("area_name", "Central");
        let (v, report) = aligner(AlignPolicy::default()).align_explained(&raw).unwrap();

        assert_eq!(v.as_slice(), &[0.0, 34.05, 0.0, 1.0, 0.0]);
        assert_eq!(report.defaulted_columns, vec!["TIME_OCC", "LON"]);
    }

    #[test]
    fn test_missing_column_rejected_when_strict() {
        let raw = RawRecord::new().with("LAT", 34.05).with("area_name", "Central");
        let err = aligner(AlignPolicy::strict()).align(&raw).unwrap_err();
        assert_eq!(err, AlignError::MissingSchemaColumn("TIME_OCC".to_string()));
    }

    #[test]
    fn test_absent_family_is_zero_even_when_strict() {
        let raw = RawRecord::new()
            .with("TIME_OCC", 5)
            .with("LAT", 1.0)
            .with("LON", 2.0);
        let (v, report) = aligner(AlignPolicy::strict()).align_explained(&raw).unwrap();

        assert_eq!(v.as_slice(), &[5.0, 1.0, 2.0, 0.0, 0.0]);
        assert_eq!(report.defaulted_columns, vec!["AREA_Central", "AREA_Hollywood"]);
    }

    #[test]
    fn test_extra_field_dropped_with_report() {
        let raw = hollywood_record().with("weapon", "knife");
        let (v, report) = aligner(AlignPolicy::default()).align_explained(&raw).unwrap();

        assert_eq!(v.len(), 5);
        assert_eq!(report.dropped_fields, vec!["weapon"]);
        assert!(!report.is_lossless());
    }

    #[test]
    fn test_extra_field_rejected_when_strict() {
        let raw = hollywood_record().with("weapon", "knife");
        let err = aligner(AlignPolicy::strict()).align(&raw).unwrap_err();
        assert_eq!(err, AlignError::UnexpectedField("weapon".to_string()));
    }

    #[test]
    fn test_raw_field_colliding_with_family_column() {
        let raw = hollywood_record().with("AREA_Central", 1);
        let err = aligner(AlignPolicy::default()).align(&raw).unwrap_err();
        assert!(matches!(err, AlignError::SchemaConflict { ref column, .. } if column == "AREA_Central"));
    }

    #[test]
    fn test_category_label_for_numeric_column() {
        let raw = hollywood_record().with("LAT", "north");
        let err = aligner(AlignPolicy::default()).align(&raw).unwrap_err();
        assert!(matches!(err, AlignError::SchemaConflict { ref column, .. } if column == "LAT"));
    }

    #[test]
    fn test_categorical_field_named_like_schema_column() {
        let expansions =
            CategoricalExpansions::new().with_rule("LAT", OneHotRule::deferred("AREA_"));
        let err = FeatureAligner::new(la_schema(), &expansions, AlignPolicy::default()).unwrap_err();
        assert!(matches!(err, AlignError::SchemaConflict { ref field, .. } if field == "LAT"));
    }

    #[test]
    fn test_overlapping_families_conflict() {
        let expansions = CategoricalExpansions::new()
            .with_rule("area_name", OneHotRule::new("AREA_", ["Central"]))
            .with_rule("division", OneHotRule::new("AREA_", ["Central"]));
        let err = FeatureAligner::new(la_schema(), &expansions, AlignPolicy::default()).unwrap_err();
        assert!(matches!(err, AlignError::SchemaConflict { ref column, .. } if column == "AREA_Central"));
    }

    #[test]
    fn test_duplicate_category_in_rule_is_collapsed() {
        let expansions = CategoricalExpansions::new()
            .with_rule("area_name", OneHotRule::new("AREA_", ["Central", "Central", "Hollywood"]));
        let aligner = FeatureAligner::new(la_schema(), &expansions, AlignPolicy::default()).unwrap();

        assert_eq!(
            aligner.family_columns()["area_name"],
            vec!["AREA_Central", "AREA_Hollywood"]
        );
        let raw = hollywood_record().with("area_name", "Central");
        assert_eq!(
            aligner.align(&raw).unwrap().as_slice(),
            &[1430.0, 34.05, -118.25, 1.0, 0.0]
        );
    }

    #[test]
    fn test_family_column_outside_schema_is_not_activated() {
        let expansions = CategoricalExpansions::new()
            .with_rule("area_name", OneHotRule::new("AREA_", ["Central", "Hollywood", "Mission"]));
        let aligner = FeatureAligner::new(la_schema(), &expansions, AlignPolicy::default()).unwrap();

        assert_eq!(
            aligner.family_columns()["area_name"],
            vec!["AREA_Central", "AREA_Hollywood"]
        );
        let raw = hollywood_record().with("area_name", "Mission");
        assert!(matches!(aligner.align(&raw), Err(AlignError::UnknownCategory { .. })));
    }

    #[test]
    fn test_integer_codes_select_category() {
        let schema = FeatureSchema::new(["LAT", "Crm Cd_510", "Crm Cd_624"]).unwrap();
        let expansions =
            CategoricalExpansions::new().with_rule("crm_cd", OneHotRule::deferred("Crm Cd_"));
        let raw = RawRecord::new().with("LAT", 34.0).with("crm_cd", 624);

        let v = align(&raw, &schema, &expansions).unwrap();
        assert_eq!(v.as_slice(), &[34.0, 0.0, 1.0]);
    }

    #[test]
    fn test_float_category_rejected() {
        let raw = hollywood_record().with("area_name", 1.5);
        let err = aligner(AlignPolicy::default()).align(&raw).unwrap_err();
        assert!(matches!(err, AlignError::InvalidValue { ref field, .. } if field == "area_name"));
    }

    #[test]
    fn test_non_finite_rejected() {
        let raw = hollywood_record().with("LAT", f64::NAN);
        let err = aligner(AlignPolicy::default()).align(&raw).unwrap_err();
        assert!(matches!(err, AlignError::InvalidValue { ref field, .. } if field == "LAT"));
    }

    #[test]
    fn test_same_input_same_output() {
        let aligner = aligner(AlignPolicy::default());
        let v1 = aligner.align(&hollywood_record()).unwrap();
        let v2 = aligner.align(&hollywood_record()).unwrap();
        assert_eq!(v1, v2);
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let aligner = aligner(AlignPolicy::default());
        let good = hollywood_record();
        let bad = hollywood_record().with("area_name", "Unknown");

        assert_eq!(aligner.align_batch(&[good.clone(), good.clone()]).unwrap().len(), 2);
        assert!(aligner.align_batch(&[good, bad]).is_err());
    }

    #[test]
    fn test_policy_json() {
        let policy: AlignPolicy =
            serde_json::from_str(r#"{"unknown_category": "ignore"}"#).unwrap();
        assert_eq!(policy.unknown_category, UnknownCategoryPolicy::Ignore);
        assert_eq!(policy.extra_fields, ExtraFieldPolicy::WarnAndDrop);
        assert_eq!(policy.missing_columns, MissingColumnPolicy::Zero);
    }
}
