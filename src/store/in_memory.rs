//! InMemoryStore - document held in memory for tests and embedding.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use super::DocumentStore;
use crate::document::Document;
use crate::error::StoreError;

/// In-memory document store. Clone-friendly via Arc; clones share state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    document: Arc<RwLock<Document>>,
    reject_saves: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: Document) -> Self {
        Self {
            document: Arc::new(RwLock::new(document)),
            reject_saves: Arc::default(),
        }
    }

    /// Make every subsequent save fail (or succeed again) until toggled back.
    pub fn reject_saves(&self, reject: bool) {
        self.reject_saves.store(reject, Ordering::SeqCst);
    }
}

impl DocumentStore for InMemoryStore {
    fn read(&self) -> Result<Document, StoreError> {
        let document = self
            .document
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(document.clone())
    }

    fn save(&self, document: &Document) -> Result<(), StoreError> {
        if self.reject_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("saves rejected".into()));
        }
        let mut stored = self
            .document
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        *stored = document.clone();
        Ok(())
    }
}
