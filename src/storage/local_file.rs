//! Local persisted listing store
//!
//! The whole collection lives in one JSON blob on disk. Every mutation is a
//! read-modify-write of the full blob, serialized through an internal mutex,
//! with an atomic temp-file rename so a crash never leaves a half-written
//! collection behind.
//!
//! An optional byte quota bounds the blob: a write that would push it past
//! the limit fails with `StoreError::QuotaExceeded` and leaves the previous
//! contents untouched.
//!
//! File I/O is synchronous and wrapped in `tokio::task::spawn_blocking` for
//! async compatibility.

use crate::core::error::{StoreError, SwapError, SwapResult};
use crate::core::listing::Listing;
use crate::core::service::ListingStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

const BACKEND: &str = "local";

/// JSON-file-backed implementation of `ListingStore`.
#[derive(Clone)]
pub struct LocalFileStore {
    path: PathBuf,
    quota_bytes: Option<u64>,
    // Serializes read-modify-write cycles; the file itself is the only state.
    guard: Arc<Mutex<()>>,
}

impl LocalFileStore {
    /// Use (or create on first write) the JSON blob at `path`.
    pub fn new(path: impl AsRef<Path>, quota_bytes: Option<u64>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            quota_bytes,
            guard: Arc::new(Mutex::new(())),
        }
    }

    async fn load(&self) -> SwapResult<Vec<Listing>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_blob(&path))
            .await
            .map_err(join_error)?
    }

    async fn save(&self, listings: Vec<Listing>) -> SwapResult<()> {
        let path = self.path.clone();
        let quota = self.quota_bytes;
        tokio::task::spawn_blocking(move || write_blob(&path, &listings, quota))
            .await
            .map_err(join_error)?
    }
}

fn join_error(e: tokio::task::JoinError) -> SwapError {
    StoreError::Io {
        backend: BACKEND,
        message: format!("blocking task failed: {}", e),
    }
    .into()
}

fn io_error(e: std::io::Error) -> SwapError {
    StoreError::Io {
        backend: BACKEND,
        message: e.to_string(),
    }
    .into()
}

fn read_blob(path: &Path) -> SwapResult<Vec<Listing>> {
    let content = match std::fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_error(e)),
    };
    if content.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_slice(&content).map_err(|e| {
        StoreError::Serialization {
            backend: BACKEND,
            message: e.to_string(),
        }
        .into()
    })
}

fn write_blob(path: &Path, listings: &[Listing], quota_bytes: Option<u64>) -> SwapResult<()> {
    let encoded = serde_json::to_vec(listings).map_err(|e| {
        SwapError::from(StoreError::Serialization {
            backend: BACKEND,
            message: e.to_string(),
        })
    })?;

    if let Some(quota) = quota_bytes {
        if encoded.len() as u64 > quota {
            return Err(StoreError::QuotaExceeded {
                backend: BACKEND,
                needed: encoded.len() as u64,
                quota,
            }
            .into());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }

    // Write-then-rename so readers never observe a torn blob.
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &encoded).map_err(io_error)?;
    std::fs::rename(&tmp, path).map_err(io_error)?;

    debug!(bytes = encoded.len(), records = listings.len(), "persisted blob");
    Ok(())
}

#[async_trait]
impl ListingStore for LocalFileStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn insert(&self, listing: Listing) -> SwapResult<()> {
        let _guard = self.guard.lock().await;
        let mut listings = self.load().await?;
        listings.retain(|l| l.id != listing.id);
        listings.push(listing);
        self.save(listings).await
    }

    async fn get(&self, id: &Uuid) -> SwapResult<Option<Listing>> {
        let _guard = self.guard.lock().await;
        let listings = self.load().await?;
        Ok(listings.into_iter().find(|l| l.id == *id))
    }

    async fn list(&self) -> SwapResult<Vec<Listing>> {
        let _guard = self.guard.lock().await;
        self.load().await
    }

    async fn replace(&self, id: &Uuid, listing: Listing) -> SwapResult<()> {
        let _guard = self.guard.lock().await;
        let mut listings = self.load().await?;
        let slot = listings
            .iter_mut()
            .find(|l| l.id == *id)
            .ok_or(SwapError::NotFound { id: *id })?;
        *slot = listing;
        self.save(listings).await
    }

    async fn remove(&self, id: &Uuid) -> SwapResult<()> {
        let _guard = self.guard.lock().await;
        let mut listings = self.load().await?;
        let before = listings.len();
        listings.retain(|l| l.id != *id);
        if listings.len() == before {
            return Err(SwapError::NotFound { id: *id });
        }
        self.save(listings).await
    }
}
