//! Records - per-collection operations over the shared document.
//!
//! `RecordService<S>` is stateless apart from the store it owns. Every
//! mutating call is one serialized load-mutate-save cycle through
//! [`LockedStore`]; reads load the current document and never fail.
//!
//! ## Quick Start
//!
//! ```ignore
//! use hotel_records::{Collection, InMemoryStore, Record, RecordService};
//! use serde_json::json;
//!
//! let service = RecordService::new(InMemoryStore::new());
//! let ticket = service.create(
//!     Collection::ServiceTickets,
//!     Record::from_value(json!({ "guest_room": "204", "issue": "AC not cooling" })),
//! )?;
//! assert_eq!(ticket.id(), Some(1));
//!
//! // HTTP transport (requires "http" feature)
//! // hotel_records::records::serve(Arc::new(service), "0.0.0.0:3000").await?;
//! ```

mod alerts;
mod error;
#[cfg(feature = "http")]
mod http;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};

use crate::document::{parse_id, Collection, Record, ID_FIELD};
use crate::store::{DocumentStore, LockedStore};

pub use alerts::{AlertStatus, DEFAULT_ASSIGNEE, DEFAULT_ESCALATION_REASON, DEFAULT_PRIORITY};
pub use error::{Operation, RecordError};
#[cfg(feature = "http")]
pub use http::{banner, router, serve};

use error::CycleError;

/// Current time in the stored timestamp format: RFC 3339, UTC, milliseconds.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub struct RecordService<S> {
    store: LockedStore<S>,
}

impl<S: DocumentStore> RecordService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: LockedStore::new(store),
        }
    }

    /// Retry each failed save up to `retries` extra times.
    pub fn with_save_retries(self, retries: u32) -> Self {
        Self {
            store: self.store.with_save_retries(retries),
        }
    }

    pub fn store(&self) -> &S {
        self.store.inner()
    }

    /// Full ordered sequence of a collection, empty when absent.
    pub fn list(&self, collection: Collection) -> Vec<Record> {
        self.store.view(|doc| doc.records(collection).to_vec())
    }

    /// First record whose id matches `id`. Non-numeric ids are never found.
    pub fn get(&self, collection: Collection, id: &str) -> Result<Record, RecordError> {
        let id = parse_id(id).ok_or(RecordError::NotFound(collection))?;
        self.store
            .view(|doc| doc.find(collection, id).cloned())
            .ok_or(RecordError::NotFound(collection))
    }

    /// Append a new record built from `body`.
    ///
    /// The store assigns `id` (any `id` in the body is ignored) and stamps the
    /// collection's creation field with the current time.
    pub fn create(&self, collection: Collection, body: Record) -> Result<Record, RecordError> {
        let stamp = timestamp();
        let created = self
            .store
            .update(|doc| {
                let mut record = Record::new();
                record.set_id(doc.next_id(collection)?);
                for (field, value) in body.fields() {
                    if field != ID_FIELD {
                        record.set(field, value.clone());
                    }
                }
                record.set(collection.created_field(), stamp);
                doc.records_mut(collection)?.push(record.clone());
                Ok::<_, CycleError>(record)
            })
            .map_err(|e| e.into_record_error(Operation::Create, collection))?;

        info!(collection = %collection, id = ?created.id(), "record created");
        Ok(created)
    }

    /// Shallow-merge `patch` over the stored record and return the result.
    /// The stored `id` is kept even when the patch names one.
    pub fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Record,
    ) -> Result<Record, RecordError> {
        self.modify(collection, id, Operation::Update, |record| {
            let stored = record.get(ID_FIELD).cloned();
            record.merge(&patch);
            if let Some(stored) = stored {
                record.set(ID_FIELD, stored);
            }
        })
    }

    /// Remove the record and return it. Remaining records keep their order.
    pub fn delete(&self, collection: Collection, id: &str) -> Result<Record, RecordError> {
        let id = parse_id(id).ok_or(RecordError::NotFound(collection))?;
        let deleted = self
            .store
            .update(|doc| {
                let index = doc.position(collection, id).ok_or(CycleError::NotFound)?;
                Ok::<_, CycleError>(doc.records_mut(collection)?.remove(index))
            })
            .map_err(|e| e.into_record_error(Operation::Delete, collection))?;

        info!(collection = %collection, id, "record deleted");
        Ok(deleted)
    }

    /// Apply `change` in place to the record with `id` and persist.
    fn modify(
        &self,
        collection: Collection,
        id: &str,
        operation: Operation,
        change: impl FnOnce(&mut Record),
    ) -> Result<Record, RecordError> {
        let id = parse_id(id).ok_or(RecordError::NotFound(collection))?;
        let updated = self
            .store
            .update(|doc| {
                let record = doc.find_mut(collection, id).ok_or(CycleError::NotFound)?;
                change(record);
                Ok::<_, CycleError>(record.clone())
            })
            .map_err(|e| e.into_record_error(operation, collection))?;

        debug!(collection = %collection, id, operation = %operation, "record modified");
        Ok(updated)
    }
}
