//! In-memory document store.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::document::Document;
use crate::{DocumentStore, Result};

/// Keeps the document in memory.
///
/// Drop-in substitute for [`crate::JsonFileStore`] in tests and for
/// embedders that want the catalog without a file on disk. Loads hand out
/// snapshots: mutating a loaded document changes nothing until it is saved
/// back.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Document>,
}

impl MemoryStore {
    /// Creates a store holding the empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `document`.
    #[must_use]
    pub fn with_document(document: Document) -> Self {
        Self {
            document: Mutex::new(document),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load(&self) -> Document {
        self.document.lock().await.clone()
    }

    async fn save(&self, document: &Document) -> Result<()> {
        *self.document.lock().await = document.clone();
        Ok(())
    }
}
