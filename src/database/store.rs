//! JSON document store
//!
//! The whole bot state lives in one JSON file. Every operation loads the
//! file, works on the in-memory [`Document`] and saves it back, all while
//! holding one process-wide lock, so load/save cycles never interleave.
//! Saves go through a temporary file and a rename so a crash cannot leave a
//! half-written document behind.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::models::Document;
use crate::utils::errors::Result;
use crate::utils::logging::log_store_operation;

#[derive(Debug)]
struct StoreInner {
    path: PathBuf,
    lock: Mutex<()>,
}

/// Handle to the shared document; clones share the same lock
#[derive(Debug, Clone)]
pub struct DocumentStore {
    inner: Arc<StoreInner>,
}

impl DocumentStore {
    /// Create a store handle without touching the file system
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                path: path.into(),
                lock: Mutex::new(()),
            }),
        }
    }

    /// Create a store, making sure its directory exists and the document is readable
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(path);
        if let Some(parent) = store.path().parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let document = store.read().await?;
        info!(path = %store.path().display(), users = document.users.len(), "Document store opened");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Load the current document
    pub async fn read(&self) -> Result<Document> {
        let _guard = self.inner.lock.lock().await;
        self.load_locked().await
    }

    /// Run `apply` against the current document and persist the result
    ///
    /// The document is written only when `apply` actually changed it.
    pub async fn update<T, F>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut Document) -> T,
    {
        let _guard = self.inner.lock.lock().await;
        let mut document = self.load_locked().await?;
        let before = document.clone();

        let output = apply(&mut document);

        if document != before {
            self.save_locked(&document).await?;
        } else {
            debug!("Document unchanged, skipping save");
        }
        Ok(output)
    }

    /// Wait for any in-flight write to finish
    ///
    /// Every write is durable once `update` returns, so this only has to
    /// drain the lock before the process exits.
    pub async fn shutdown(&self) {
        let _guard = self.inner.lock.lock().await;
        info!(path = %self.path().display(), "Document store flushed");
    }

    async fn load_locked(&self) -> Result<Document> {
        let started = Instant::now();
        let raw = match tokio::fs::read_to_string(self.path()).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path().display(), "No document on disk, starting empty");
                return Ok(Document::new());
            }
            Err(e) => {
                log_store_operation("load", started.elapsed().as_millis() as u64, false);
                return Err(e.into());
            }
        };

        let document = match serde_json::from_str::<Document>(&raw) {
            Ok(document) => document,
            Err(e) => {
                warn!(path = %self.path().display(), error = %e, "Document is unreadable, treating it as empty");
                Document::new()
            }
        };

        log_store_operation("load", started.elapsed().as_millis() as u64, true);
        Ok(document)
    }

    async fn save_locked(&self, document: &Document) -> Result<()> {
        let started = Instant::now();
        let serialized = serde_json::to_string_pretty(document)?;
        let tmp_path = self.tmp_path();

        let result = async {
            let mut file = tokio::fs::File::create(&tmp_path).await?;
            file.write_all(serialized.as_bytes()).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&tmp_path, self.path()).await
        }
        .await;

        let elapsed = started.elapsed().as_millis() as u64;
        match result {
            Ok(()) => {
                log_store_operation("save", elapsed, true);
                Ok(())
            }
            Err(e) => {
                log_store_operation("save", elapsed, false);
                let _ = tokio::fs::remove_file(&tmp_path).await;
                Err(e.into())
            }
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp: OsString = self.path().as_os_str().to_owned();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}
