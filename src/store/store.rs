//! DocumentStore - abstract whole-document persistence.

use tracing::warn;

use crate::document::Document;
use crate::error::StoreError;

pub trait DocumentStore: Send + Sync {
    /// Read the persisted document. A document that was never written is
    /// `Ok` and empty; only real read or decode failures are errors.
    fn read(&self) -> Result<Document, StoreError>;

    /// Replace the persisted document. A subsequent `read` sees either the
    /// previous document or this one in full, never a mix.
    fn save(&self, document: &Document) -> Result<(), StoreError>;

    /// Read the document, absorbing failures as an empty document.
    fn load(&self) -> Document {
        match self.read() {
            Ok(document) => document,
            Err(error) => {
                warn!(error = %error, "failed to read document, using empty document");
                Document::new()
            }
        }
    }
}

impl<S: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<S> {
    fn read(&self) -> Result<Document, StoreError> {
        (**self).read()
    }

    fn save(&self, document: &Document) -> Result<(), StoreError> {
        (**self).save(document)
    }
}
