//! Cursus document storage.
//!
//! The catalog's whole state is one flat JSON document. This crate defines
//! that document's model, the [`DocumentStore`] port it is loaded and saved
//! through, and the two store implementations: [`JsonFileStore`] for disk
//! and [`MemoryStore`] for tests and embedding.
//!
//! # Example
//!
//! ```
//! use cursus_store::{MemoryStore, StoreHandle};
//!
//! # async fn demo() {
//! let store = StoreHandle::new(MemoryStore::new());
//! let document = store.load().await;
//! assert!(document.cours.is_empty());
//! # }
//! ```

pub mod document;
pub mod file;
pub mod memory;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard};

pub use document::{
    Course, CoursePatch, Document, Module, Session, SessionPatch, PLACEHOLDER_MODULE_ID,
    PLACEHOLDER_MODULE_TITLE,
};
pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Errors produced while persisting the document.
///
/// Loads never produce errors; see [`DocumentStore::load`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to serialize the document to JSON.
    #[error("Failed to serialize document: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to write the document to the backing store.
    #[error("Failed to write document: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Port over the document's persistence.
///
/// `load` is total: a store that cannot produce its document returns the
/// default empty catalog instead of failing. `save` replaces the stored
/// document as a whole; there are no partial writes at this interface.
#[async_trait]
pub trait DocumentStore: fmt::Debug + Send + Sync {
    /// The current document, or the default document when the backing data
    /// is missing or unusable.
    async fn load(&self) -> Document;

    /// Replaces the stored document with `document`.
    async fn save(&self, document: &Document) -> Result<()>;
}

/// Cloneable handle sharing one [`DocumentStore`] between repositories.
///
/// The handle carries the write mutex that serializes mutating
/// load-modify-save cycles: callers about to mutate hold the guard from
/// [`Self::begin_write`] until their save returns, so concurrent writers
/// cannot interleave and lose updates. Plain reads skip the lock and see
/// whichever complete document the store holds.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    backend: Arc<dyn DocumentStore>,
    write_lock: Arc<Mutex<()>>,
}

impl StoreHandle {
    /// Wraps a store in a shareable handle.
    #[must_use]
    pub fn new<S>(backend: S) -> Self
    where
        S: DocumentStore + 'static,
    {
        Self {
            backend: Arc::new(backend),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Loads the current document.
    pub async fn load(&self) -> Document {
        self.backend.load().await
    }

    /// Persists `document` to the backing store.
    pub async fn save(&self, document: &Document) -> Result<()> {
        self.backend.save(document).await
    }

    /// Acquires the write lock for a load-modify-save cycle.
    pub async fn begin_write(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }
}
