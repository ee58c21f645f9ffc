//! Error types for record operations.

use std::fmt;

use thiserror::Error;

use crate::document::Collection;
use crate::error::StoreError;

/// The mutating operation that failed to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
    Assign,
    Resolve,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Assign => "assign",
            Operation::Resolve => "resolve",
        })
    }
}

#[derive(Debug, Error)]
pub enum RecordError {
    /// No record with the requested id in the collection.
    #[error("{} not found", .0.entity())]
    NotFound(Collection),

    /// The document could not be saved. The message stays generic; the
    /// store error is kept as the source for logging.
    #[error("failed to {operation} {}", .collection.entity())]
    Persistence {
        operation: Operation,
        collection: Collection,
        #[source]
        source: StoreError,
    },
}

impl RecordError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            RecordError::NotFound(_) => 404,
            RecordError::Persistence { .. } => 500,
        }
    }
}

/// Error inside a single load-mutate-save cycle, before the operation
/// context is attached.
#[derive(Debug)]
pub(crate) enum CycleError {
    NotFound,
    Store(StoreError),
}

impl From<StoreError> for CycleError {
    fn from(err: StoreError) -> Self {
        CycleError::Store(err)
    }
}

impl CycleError {
    pub(crate) fn into_record_error(
        self,
        operation: Operation,
        collection: Collection,
    ) -> RecordError {
        match self {
            CycleError::NotFound => RecordError::NotFound(collection),
            CycleError::Store(source) => RecordError::Persistence {
                operation,
                collection,
                source,
            },
        }
    }
}
