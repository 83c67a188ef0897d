//! File-backed document store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::document::Document;
use crate::{DocumentStore, Result};

/// Stores the document as pretty-printed JSON in a single file.
///
/// Reads never fail: a missing file yields the empty catalog (the normal
/// first-run case), and an unreadable or unparseable file is recovered the
/// same way after a warning. A broken data file costs the stored content
/// but never takes the service down.
///
/// Saves replace the file through a temporary sibling and a rename, so a
/// load that races a save observes either the previous document or the new
/// one, never a torn write.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file itself is only created by the first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self) -> Document {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Data file not found, starting empty");
                return Document::default();
            }
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    error = %error,
                    "Data file unreadable, starting empty"
                );
                return Document::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(document) => document,
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    error = %error,
                    "Data file is not valid JSON, starting empty"
                );
                Document::default()
            }
        }
    }

    async fn save(&self, document: &Document) -> Result<()> {
        let json = serde_json::to_string_pretty(document)?;
        let staging = self.staging_path();
        tokio::fs::write(&staging, json.as_bytes()).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        debug!(path = %self.path.display(), bytes = json.len(), "Document saved");
        Ok(())
    }
}
