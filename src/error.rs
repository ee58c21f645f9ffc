use std::path::PathBuf;

use thiserror::Error;

use crate::document::Collection;

/// Failures reading or writing the persisted document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("collection {0} is not a list of records")]
    MalformedCollection(Collection),

    #[error("no ids left in collection {0}")]
    IdsExhausted(Collection),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
