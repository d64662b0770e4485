//! Integration tests for the local JSON-blob store.
//!
//! Each test gets a fresh temporary directory via `tempfile::TempDir` so the
//! blobs are fully isolated. On top of the shared contract suite this file
//! covers what only the local backend has: persistence across reopen, the
//! byte quota, and tolerance of a missing or empty blob.

#[macro_use]
mod store_harness;

use bookswap::prelude::*;
use std::path::PathBuf;
use store_harness::*;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Factory helpers (fresh temp dir per test for isolation)
// ---------------------------------------------------------------------------

fn fresh_blob_path() -> PathBuf {
    let dir = TempDir::new().expect("failed to create temp dir");
    // Leak the TempDir so it lives for the duration of the test
    // (otherwise it would be dropped immediately, deleting the blob)
    let path = dir.path().join("books.json");
    std::mem::forget(dir);
    path
}

fn fresh_local_store() -> LocalFileStore {
    LocalFileStore::new(fresh_blob_path(), None)
}

// ---------------------------------------------------------------------------
// Shared contract suite
// ---------------------------------------------------------------------------

listing_store_tests!(fresh_local_store());

// ---------------------------------------------------------------------------
// Local-only behavior
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_data_survives_reopen() {
    let path = fresh_blob_path();
    let listing = sample_listing("Dune");

    {
        let store = LocalFileStore::new(&path, None);
        store.insert(listing.clone()).await.unwrap();
    }

    let reopened = LocalFileStore::new(&path, None);
    let retrieved = reopened.get(&listing.id).await.unwrap();
    assert_eq!(retrieved, Some(listing));
}

#[tokio::test]
async fn test_missing_blob_reads_as_empty() {
    let store = LocalFileStore::new(fresh_blob_path(), None);
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_blob_reads_as_empty() {
    let path = fresh_blob_path();
    std::fs::write(&path, b"").unwrap();

    let store = LocalFileStore::new(&path, None);
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_corrupt_blob_is_a_store_error() {
    let path = fresh_blob_path();
    std::fs::write(&path, b"{not json").unwrap();

    let store = LocalFileStore::new(&path, None);
    let err = store.list().await.unwrap_err();
    assert_eq!(err.error_code(), "STORE_ERROR");
}

#[tokio::test]
async fn test_quota_exceeded_keeps_previous_contents() {
    let path = fresh_blob_path();
    let store = LocalFileStore::new(&path, Some(4_096));

    let small = sample_listing("Dune");
    store.insert(small.clone()).await.unwrap();

    // One big inline image pushes the blob past the quota.
    let mut oversized = sample_listing("Atlas");
    oversized.images[0].data = "A".repeat(8_192);

    let err = store.insert(oversized).await.unwrap_err();
    assert_eq!(err.error_code(), "STORE_ERROR");
    assert!(err.to_string().contains("quota"));

    // The earlier record is still there, untouched.
    let all = store.list().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, small.id);
}
