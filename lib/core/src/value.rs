use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::hash_map;
use std::collections::HashMap;

/// A scalar field value in a raw record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawValue {
    Integer(i64),
    Float(f64),
    /// Category label, expanded to one-hot columns before inference
    Category(String),
}

impl RawValue {
    /// Numeric view of the value; `None` for category labels
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Integer(i) => Some(*i as f64),
            RawValue::Float(f) => Some(*f),
            RawValue::Category(_) => None,
        }
    }

    /// Label view of the value, used for one-hot lookups
    ///
    /// Integers render as their decimal form so that numeric codes
    /// (`510` -> `Crm Cd_510`) can drive an expansion. Floats have no
    /// stable label.
    pub fn as_label(&self) -> Option<Cow<'_, str>> {
        match self {
            RawValue::Category(s) => Some(Cow::Borrowed(s.as_str())),
            RawValue::Integer(i) => Some(Cow::Owned(i.to_string())),
            RawValue::Float(_) => None,
        }
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawValue::Integer(i) => write!(f, "{}", i),
            RawValue::Float(v) => write!(f, "{}", v),
            RawValue::Category(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Integer(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Integer(i64::from(v))
    }
}

impl From<u32> for RawValue {
    fn from(v: u32) -> Self {
        RawValue::Integer(i64::from(v))
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Category(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Category(v)
    }
}

/// A raw input record: field name to scalar value
///
/// Key order carries no meaning; alignment orders columns by the schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct RawRecord {
    fields: HashMap<String, RawValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, returning the previous value if the name was taken
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Option<RawValue> {
        self.fields.insert(name.into(), value.into())
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, RawValue> {
        self.fields.iter()
    }

    /// Field names in sorted order, for deterministic logging
    pub fn sorted_field_names(&self) -> Vec<&String> {
        let mut names: Vec<_> = self.fields.keys().collect();
        names.sort();
        names
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RawRecord {
    type Item = (&'a String, &'a RawValue);
    type IntoIter = hash_map::Iter<'a, String, RawValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
