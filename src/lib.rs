pub mod config;
mod document;
mod error;
pub mod records;
mod store;

pub use document::{parse_id, Collection, Document, Record, UnknownCollection, ID_FIELD};
pub use error::StoreError;
pub use records::{AlertStatus, Operation, RecordError, RecordService};
pub use store::{DocumentStore, FileStore, InMemoryStore, LockedStore};
