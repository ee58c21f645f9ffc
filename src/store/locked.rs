//! LockedStore - serialized load-mutate-save cycles over any DocumentStore.

use std::sync::{Mutex, PoisonError};

use tracing::{error, warn};

use super::DocumentStore;
use crate::document::Document;
use crate::error::StoreError;

/// Wraps a [`DocumentStore`] with one global mutex around each
/// read-modify-write cycle.
///
/// Without it two requests that both load before either saves would race,
/// and the second save would discard the first one's change. Reads go
/// straight to the inner store; saves are atomic so a reader never sees a
/// partially written document.
pub struct LockedStore<S> {
    inner: S,
    gate: Mutex<()>,
    save_retries: u32,
}

impl<S: DocumentStore> LockedStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            gate: Mutex::new(()),
            save_retries: 0,
        }
    }

    /// Retry a failed save up to `retries` extra times before giving up.
    pub fn with_save_retries(mut self, retries: u32) -> Self {
        self.save_retries = retries;
        self
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Run `f` against a freshly loaded document.
    pub fn view<T>(&self, f: impl FnOnce(&Document) -> T) -> T {
        f(&self.inner.load())
    }

    /// Load, mutate and save as one serialized step.
    ///
    /// When `f` fails nothing is saved. When the save fails the mutation is
    /// discarded and the store error is returned.
    pub fn update<T, E>(&self, f: impl FnOnce(&mut Document) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        // The mutex guards no data; a panic in another cycle leaves nothing
        // half-updated because every cycle reloads the document.
        let _guard = self.gate.lock().unwrap_or_else(PoisonError::into_inner);

        let mut document = self.inner.load();
        let value = f(&mut document)?;
        self.save(&document)?;
        Ok(value)
    }

    fn save(&self, document: &Document) -> Result<(), StoreError> {
        let mut attempt = 0;
        loop {
            match self.inner.save(document) {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.save_retries => {
                    attempt += 1;
                    warn!(error = %e, attempt, "save failed, retrying");
                }
                Err(e) => {
                    error!(error = %e, "failed to save document");
                    return Err(e);
                }
            }
        }
    }
}
