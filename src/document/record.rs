//! Record - an open-ended field map with a store-assigned `id`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved field holding the store-assigned identifier.
pub const ID_FIELD: &str = "id";

/// A single record. Fields beyond `id` are caller-supplied and unconstrained.
///
/// Values are `serde_json::Value`, a closed set of variants
/// (string, number, bool, null, array, object).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a record from a request body. Anything other than a JSON object
    /// yields an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }

    /// The canonical integer id of this record, if it has one.
    ///
    /// Numeric ids and numeric strings both normalize to the same value, so
    /// a hand-edited `"id": "3"` still matches a lookup for `3`.
    pub fn id(&self) -> Option<u64> {
        self.0.get(ID_FIELD).and_then(canonical_id)
    }

    pub fn set_id(&mut self, id: u64) {
        self.0.insert(ID_FIELD.to_string(), Value::from(id));
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.0.insert(field.to_string(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Copy `field` from `source`, or drop it here when `source` lacks it.
    pub fn copy_field(&mut self, source: &Record, field: &str) {
        match source.get(field) {
            Some(value) => self.set(field, value.clone()),
            None => {
                self.remove(field);
            }
        }
    }

    /// Shallow merge: every field in `patch` overwrites the same-named field
    /// here; fields absent from `patch` are kept.
    pub fn merge(&mut self, patch: &Record) {
        for (field, value) in &patch.0 {
            self.0.insert(field.clone(), value.clone());
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Parse a path id. Anything that is not a plain positive integer is `None`.
pub fn parse_id(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u64>().ok().filter(|id| *id > 0)
}

fn canonical_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => parse_id(s.trim()),
        _ => None,
    }
}
