use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Read access to a record's fields by name.
///
/// The engine never needs more than this, so anything that can answer a field lookup can be
/// filtered and aggregated. A field that is absent or not text returns `None`.
pub trait FieldLookup {
    fn field(&self, name: &str) -> Option<&str>;

    /// Field value if it holds something other than whitespace.
    fn populated(&self, name: &str) -> Option<&str> {
        self.field(name).filter(|v| !crate::catalog::is_blank(v))
    }
}

impl<T: FieldLookup + ?Sized> FieldLookup for &T {
    fn field(&self, name: &str) -> Option<&str> {
        (**self).field(name)
    }
}

impl FieldLookup for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl FieldLookup for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// JSON objects: only string values count; numbers, booleans, nulls and nested values are
/// treated as missing.
impl FieldLookup for serde_json::Map<String, serde_json::Value> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(serde_json::Value::as_str)
    }
}

/// One loaded row. Missing cells are simply not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FieldLookup for Record {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_lookup_and_blank_detection() {
        let record = Record::new()
            .with_field("GENDER", "F")
            .with_field("JOB_TITLE", "   ");
        assert_eq!(record.field("GENDER"), Some("F"));
        assert_eq!(record.field("JOB_TITLE"), Some("   "));
        assert_eq!(record.populated("JOB_TITLE"), None);
        assert_eq!(record.populated("MISSING"), None);
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn json_non_strings_are_missing() {
        let value = json!({"GENDER": "M", "AGE_RANGE": 34, "MARRIED": null, "CHILDREN": true});
        let object = value.as_object().unwrap();
        assert_eq!(object.field("GENDER"), Some("M"));
        assert_eq!(object.field("AGE_RANGE"), None);
        assert_eq!(object.field("MARRIED"), None);
        assert_eq!(object.field("CHILDREN"), None);
    }

    #[test]
    fn references_and_maps_implement_lookup() {
        let mut map = HashMap::new();
        map.insert("GENDER".to_string(), "F".to_string());
        let by_ref: &HashMap<String, String> = &map;
        assert_eq!(by_ref.field("GENDER"), Some("F"));

        let record: Record = [("MARRIED", "Y")].into_iter().collect();
        assert_eq!(record.field("MARRIED"), Some("Y"));
    }
}
