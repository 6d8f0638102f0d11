//! One-hot expansion rules
//!
//! A rule turns one categorical raw field into a family of indicator
//! columns named `prefix + category`.

use crate::schema::FeatureSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One-hot rule for a single categorical field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OneHotRule {
    /// Column name prefix, e.g. `AREA NAME_`
    pub prefix: String,

    /// Known categories. Empty means "discover from the schema by prefix".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl OneHotRule {
    /// Create a rule with an explicit category list
    pub fn new<I, S>(prefix: impl Into<String>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefix: prefix.into(),
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a rule whose categories are read from the schema at load time
    pub fn deferred(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            categories: Vec::new(),
        }
    }

    /// Derive the categories from the schema columns carrying `prefix`
    pub fn discover(prefix: impl Into<String>, schema: &FeatureSchema) -> Self {
        let prefix = prefix.into();
        let categories = schema
            .columns_with_prefix(&prefix)
            .map(|c| c[prefix.len()..].to_string())
            .collect();
        Self { prefix, categories }
    }

    /// True when the category list still has to be discovered
    pub fn is_deferred(&self) -> bool {
        self.categories.is_empty()
    }

    /// Resolve a deferred rule against a schema; explicit rules are returned as-is
    pub fn resolve(&self, schema: &FeatureSchema) -> Self {
        if self.is_deferred() {
            Self::discover(self.prefix.clone(), schema)
        } else {
            self.clone()
        }
    }

    /// Indicator column activated by `category`
    pub fn column_name(&self, category: &str) -> String {
        format!("{}{}", self.prefix, category)
    }

    /// All indicator columns of the family
    pub fn family(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.categories
            .iter()
            .map(move |c| (c.as_str(), self.column_name(c)))
    }
}

/// Expansion rules keyed by raw field name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct CategoricalExpansions {
    rules: HashMap<String, OneHotRule>,
}

impl CategoricalExpansions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with_rule(mut self, field: impl Into<String>, rule: OneHotRule) -> Self {
        self.insert(field, rule);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, rule: OneHotRule) -> Option<OneHotRule> {
        self.rules.insert(field.into(), rule)
    }

    pub fn get(&self, field: &str) -> Option<&OneHotRule> {
        self.rules.get(field)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in field-name order
    pub fn sorted(&self) -> Vec<(&String, &OneHotRule)> {
        let mut rules: Vec<_> = self.rules.iter().collect();
        rules.sort_by(|a, b| a.0.cmp(b.0));
        rules
    }

    /// Resolve every deferred rule against the schema
    pub fn resolve(&self, schema: &FeatureSchema) -> Self {
        Self {
            rules: self
                .rules
                .iter()
                .map(|(field, rule)| (field.clone(), rule.resolve(schema)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_schema() -> FeatureSchema {
        FeatureSchema::new([
            "TIME OCC",
            "AREA NAME_Central",
            "LAT",
            "AREA NAME_Hollywood",
            "Crm Cd_510",
        ])
        .unwrap()
    }

    #[test]
    fn test_discover_from_schema() {
        let rule = OneHotRule::discover("AREA NAME_", &test_schema());
        assert_eq!(rule.categories, vec!["Central", "Hollywood"]);
        assert_eq!(rule.column_name("Central"), "AREA NAME_Central");
    }

    #[test]
    fn test_resolve_keeps_explicit_categories() {
        let rule = OneHotRule::new("AREA NAME_", ["Mission"]);
        assert_eq!(rule.resolve(&test_schema()), rule);

        let deferred = OneHotRule::deferred("Crm Cd_");
        assert!(deferred.is_deferred());
        assert_eq!(deferred.resolve(&test_schema()).categories, vec!["510"]);
    }

    #[test]
    fn test_family_columns() {
        let rule = OneHotRule::new("AREA_", ["Central", "Hollywood"]);
        let family: Vec<_> = rule.family().map(|(_, col)| col).collect();
        assert_eq!(family, vec!["AREA_Central", "AREA_Hollywood"]);
    }

    #[test]
    fn test_expansions_json_shape() {
        let expansions: CategoricalExpansions = serde_json::from_str(
            r#"{"area_name": {"prefix": "AREA NAME_"}, "crm_cd": {"prefix": "Crm Cd_", "categories": ["510"]}}"#,
        )
        .unwrap();

        assert_eq!(expansions.len(), 2);
        assert!(expansions.get("area_name").unwrap().is_deferred());
        let sorted: Vec<_> = expansions.sorted().into_iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(sorted, vec!["area_name", "crm_cd"]);
    }
}
