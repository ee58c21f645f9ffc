//! Document - the whole persisted dataset as one unit.
//!
//! A document maps collection names to ordered sequences of records. Keys
//! that are absent read as empty collections, never as errors. Any key whose
//! value is not a list of JSON objects (unknown keys, a stray `null` inside a
//! list, a collection written as an object) is kept verbatim and written
//! back untouched, so one odd key never costs the rest of the file.
//!
//! ```ignore
//! use hotel_records::{Collection, Document, Record};
//!
//! let mut doc = Document::new();
//! let id = doc.next_id(Collection::Alerts)?;
//! let mut alert = Record::new();
//! alert.set_id(id);
//! doc.records_mut(Collection::Alerts)?.push(alert);
//! assert!(doc.find(Collection::Alerts, id).is_some());
//! ```

mod collection;
mod record;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

pub use collection::{Collection, UnknownCollection};
pub use record::{parse_id, Record, ID_FIELD};

/// The value stored under one document key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum Entry {
    Records(Vec<Record>),
    /// Anything that is not a list of objects, preserved as-is.
    Raw(Value),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    entries: BTreeMap<String, Entry>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records of a collection in insertion order; empty when the key is
    /// absent or does not hold a list of records.
    pub fn records(&self, collection: Collection) -> &[Record] {
        match self.entries.get(collection.as_str()) {
            Some(Entry::Records(records)) => records,
            _ => &[],
        }
    }

    /// Mutable access to a collection, creating the key if it is absent.
    ///
    /// Fails when the key holds something other than a list of records;
    /// writing would otherwise replace that data.
    pub fn records_mut(&mut self, collection: Collection) -> Result<&mut Vec<Record>, StoreError> {
        let entry = self
            .entries
            .entry(collection.as_str().to_string())
            .or_insert_with(|| Entry::Records(Vec::new()));
        match entry {
            Entry::Records(records) => Ok(records),
            Entry::Raw(_) => Err(StoreError::MalformedCollection(collection)),
        }
    }

    /// Next id for a collection: `max(existing ids ∪ {0}) + 1`.
    ///
    /// Records without a usable integer id do not take part. Fails rather
    /// than reuse an id once `u64::MAX` is taken.
    pub fn next_id(&self, collection: Collection) -> Result<u64, StoreError> {
        self.records(collection)
            .iter()
            .filter_map(Record::id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted(collection))
    }

    /// Index of the first record whose id equals `id`.
    pub fn position(&self, collection: Collection, id: u64) -> Option<usize> {
        self.records(collection)
            .iter()
            .position(|record| record.id() == Some(id))
    }

    pub fn find(&self, collection: Collection, id: u64) -> Option<&Record> {
        self.records(collection)
            .iter()
            .find(|record| record.id() == Some(id))
    }

    pub fn find_mut(&mut self, collection: Collection, id: u64) -> Option<&mut Record> {
        match self.entries.get_mut(collection.as_str())? {
            Entry::Records(records) => records.iter_mut().find(|record| record.id() == Some(id)),
            Entry::Raw(_) => None,
        }
    }

    /// Keys present in the document, including unknown and raw ones.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
