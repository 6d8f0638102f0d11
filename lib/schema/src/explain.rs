//! Explainability for feature alignment
//!
//! Records what the aligner did to a record beyond copying values:
//! which indicator columns fired, which columns fell back to zero and
//! which fields were thrown away.

use serde::Serialize;

/// Per-record account of an alignment
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AlignmentReport {
    /// One-hot columns set to 1
    pub activated_columns: Vec<String>,
    /// Schema columns the record did not supply, filled with 0
    pub defaulted_columns: Vec<String>,
    /// Raw fields absent from the schema that were dropped
    pub dropped_fields: Vec<String>,
    /// Category values with no indicator column, left as an all-zero family
    pub ignored_categories: Vec<IgnoredCategory>,
}

/// A category value that matched no column of its family
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IgnoredCategory {
    pub field: String,
    pub value: String,
}

impl AlignmentReport {
    /// True when nothing was dropped or ignored
    pub fn is_lossless(&self) -> bool {
        self.dropped_fields.is_empty() && self.ignored_categories.is_empty()
    }
}
