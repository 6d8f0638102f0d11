//! Feature schema definitions
//!
//! A feature schema is the ordered column manifest a scaler and model were
//! fit against. Column `i` of every aligned vector corresponds to
//! `columns[i]`.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Ordered, duplicate-free list of feature column names
///
/// Only constructible through validation, so every instance is non-empty
/// and has unique, non-empty column names. Serializes as a plain JSON array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSchema {
    columns: Vec<String>,
    index: AHashMap<String, usize>,
}

impl FeatureSchema {
    /// Create a schema from ordered column names
    pub fn new<I, S>(columns: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(SchemaError::EmptySchema);
        }

        let mut index = AHashMap::with_capacity(columns.len());
        for (position, name) in columns.iter().enumerate() {
            if name.is_empty() {
                return Err(SchemaError::EmptyColumnName(position));
            }
            if index.insert(name.clone(), position).is_some() {
                return Err(SchemaError::DuplicateColumn(name.clone()));
            }
        }

        Ok(Self { columns, index })
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false for a validated schema
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in schema order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Column name at a position
    pub fn column(&self, position: usize) -> Option<&str> {
        self.columns.get(position).map(String::as_str)
    }

    /// Position of a column name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Columns starting with `prefix`, in schema order
    pub fn columns_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(move |c| c.starts_with(prefix))
    }
}

impl PartialEq for FeatureSchema {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

impl TryFrom<Vec<String>> for FeatureSchema {
    type Error = SchemaError;

    fn try_from(columns: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(columns)
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(schema: FeatureSchema) -> Self {
        schema.columns
    }
}

/// Errors that can occur during schema validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema cannot be empty")]
    EmptySchema,

    #[error("Column '{0}' appears more than once in schema")]
    DuplicateColumn(String),

    #[error("Column at position {0} has an empty name")]
    EmptyColumnName(usize),

    #[error("Unsupported manifest version {0}")]
    UnsupportedVersion(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_creation() {
        let schema = FeatureSchema::new(["TIME OCC", "LAT", "LON"]).unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.position("LAT"), Some(1));
        assert_eq!(schema.column(2), Some("LON"));
        assert!(!schema.contains("AREA NAME_Central"));
    }

    #[test]
    fn test_empty_schema_error() {
        assert!(matches!(
            FeatureSchema::new(Vec::<String>::new()),
            Err(SchemaError::EmptySchema)
        ));
    }

    #[test]
    fn test_duplicate_column_error() {
        assert_eq!(
            FeatureSchema::new(["LAT", "LON", "LAT"]),
            Err(SchemaError::DuplicateColumn("LAT".to_string()))
        );
    }

    #[test]
    fn test_empty_column_name_error() {
        assert_eq!(
            FeatureSchema::new(["LAT", ""]),
            Err(SchemaError::EmptyColumnName(1))
        );
    }

    #[test]
    fn test_prefix_scan_keeps_order() {
        let schema =
            FeatureSchema::new(["AREA_Wilshire", "LAT", "AREA_Central", "Crm Cd_510"]).unwrap();
        let areas: Vec<_> = schema.columns_with_prefix("AREA_").collect();
        assert_eq!(areas, vec!["AREA_Wilshire", "AREA_Central"]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let schema = FeatureSchema::new(["LAT", "LON"]).unwrap();
        let json = serde_json::to_string(&schema).unwrap();
        assert_eq!(json, r#"["LAT","LON"]"#);

        let parsed: FeatureSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, parsed);
        assert_eq!(parsed.position("LON"), Some(1));
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let parsed: Result<FeatureSchema, _> = serde_json::from_str(r#"["LAT","LAT"]"#);
        assert!(parsed.is_err());
    }
}
