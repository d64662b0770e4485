//! End-to-end tests for the store adapter: the sell-form flow from draft to
//! subscription snapshot, the failure taxonomy, and the retry wrapper.

#[macro_use]
mod store_harness;

use async_trait::async_trait;
use bookswap::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use store_harness::*;

async fn memory_adapter() -> StoreAdapter {
    StoreAdapter::connect(
        Arc::new(InMemoryStore::new()),
        ImagePolicy::default(),
        RetryPolicy::default(),
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_appears_in_next_snapshot() {
    let adapter = memory_adapter().await;
    let updates = adapter.subscribe();
    assert!(updates.borrow().is_empty());

    let draft = ListingDraft {
        title: "Intro to Algorithms".to_string(),
        price: 250.0,
        ..sample_draft("")
    };
    let id = adapter
        .create(draft.clone(), &[png_file("cover.png", 50 * 1024)])
        .await
        .unwrap();

    let snapshot = updates.borrow().clone();
    assert_eq!(snapshot.len(), 1);

    let record = &snapshot[0];
    assert_eq!(record.id, id);
    assert_eq!(record.title, "Intro to Algorithms");
    assert_eq!(record.author, draft.author);
    assert_eq!(record.price, 250.0);
    assert_eq!(record.owner, draft.owner);
    assert_eq!(record.images.len(), 1);
    assert_eq!(record.images[0].byte_len, 50 * 1024);
    assert_eq!(record.created_at, record.updated_at);
}

#[tokio::test]
async fn test_create_normalizes_draft() {
    let adapter = memory_adapter().await;
    let draft = ListingDraft {
        title: "  Dune  ".to_string(),
        phone: "+351 912 345 678 99".to_string(),
        ..sample_draft("")
    };

    let id = adapter.create(draft, &[png_file("c.png", 64)]).await.unwrap();

    let record = adapter.get(id).await.unwrap().unwrap();
    assert_eq!(record.title, "Dune");
    assert_eq!(record.phone, "3519123456");
}

#[tokio::test]
async fn test_bad_price_is_rejected_without_store_mutation() {
    let adapter = memory_adapter().await;

    for price in [0.0, -10.0, f64::NAN] {
        let draft = ListingDraft { price, ..sample_draft("Dune") };
        let err = adapter
            .create(draft, &[png_file("c.png", 64)])
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    assert!(adapter.current().is_empty());
}

#[tokio::test]
async fn test_create_without_images_is_rejected() {
    let adapter = memory_adapter().await;
    let err = adapter.create(sample_draft("Dune"), &[]).await.unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert!(adapter.current().is_empty());
}

#[tokio::test]
async fn test_oversized_image_is_rejected_before_any_store_call() {
    let adapter = StoreAdapter::connect(
        Arc::new(InMemoryStore::new()),
        ImagePolicy {
            max_bytes: 2 * 1024 * 1024,
            ..ImagePolicy::default()
        },
        RetryPolicy::default(),
    )
    .await
    .unwrap();

    let err = adapter
        .create(sample_draft("Atlas"), &[png_file("big.png", 3 * 1024 * 1024)])
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "SIZE_LIMIT_ERROR");
    assert!(adapter.current().is_empty());
}

#[tokio::test]
async fn test_snapshot_is_ordered_newest_first() {
    let adapter = memory_adapter().await;
    for title in ["First", "Second", "Third"] {
        adapter
            .create(sample_draft(title), &[png_file("c.png", 64)])
            .await
            .unwrap();
    }

    let titles: Vec<String> = adapter.current().iter().map(|l| l.title.clone()).collect();
    assert_eq!(titles, ["Third", "Second", "First"]);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_update_without_files_preserves_images_exactly() {
    let adapter = memory_adapter().await;
    let files = [png_file("a.png", 100), png_file("b.png", 200)];
    let id = adapter.create(sample_draft("Dune"), &files).await.unwrap();
    let before = adapter.get(id).await.unwrap().unwrap();

    let edited = ListingDraft {
        price: 80.0,
        ..sample_draft("Dune (worn)")
    };
    let after = adapter.update(id, edited, &[]).await.unwrap();

    assert_eq!(after.title, "Dune (worn)");
    assert_eq!(after.price, 80.0);
    assert_eq!(after.images, before.images);
}

#[tokio::test]
async fn test_update_with_files_replaces_images_capped_at_five() {
    let adapter = memory_adapter().await;
    let id = adapter
        .create(sample_draft("Dune"), &[png_file("old.png", 100)])
        .await
        .unwrap();

    let new_files: Vec<ImageFile> = (0..7).map(|i| png_file(&format!("n{i}.png"), 64)).collect();
    let after = adapter.update(id, sample_draft("Dune"), &new_files).await.unwrap();

    assert_eq!(after.images.len(), 5);
    // Wholesale replacement: nothing from the old set survives.
    assert!(after.images.iter().all(|i| i.byte_len == 64));
}

#[tokio::test]
async fn test_update_preserves_created_at_and_refreshes_updated_at() {
    let adapter = memory_adapter().await;
    let id = adapter
        .create(sample_draft("Dune"), &[png_file("c.png", 64)])
        .await
        .unwrap();
    let before = adapter.get(id).await.unwrap().unwrap();

    let after = adapter.update(id, sample_draft("Dune"), &[]).await.unwrap();

    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at >= before.updated_at);
    assert!(after.updated_at > after.created_at);
}

#[tokio::test]
async fn test_update_missing_id_is_not_found() {
    let adapter = memory_adapter().await;
    let err = adapter
        .update(Uuid::new_v4(), sample_draft("Dune"), &[])
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_delete_removes_from_next_snapshot() {
    let adapter = memory_adapter().await;
    let keep = adapter
        .create(sample_draft("Keep"), &[png_file("c.png", 64)])
        .await
        .unwrap();
    let gone = adapter
        .create(sample_draft("Gone"), &[png_file("c.png", 64)])
        .await
        .unwrap();

    adapter.delete(gone).await.unwrap();

    let snapshot = adapter.current();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, keep);
}

#[tokio::test]
async fn test_delete_missing_id_is_not_found() {
    let adapter = memory_adapter().await;
    let err = adapter.delete(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Events and the view flow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_mutations_publish_events() {
    let adapter = memory_adapter().await;
    let mut events = adapter.events();

    let id = adapter
        .create(sample_draft("Dune"), &[png_file("c.png", 64)])
        .await
        .unwrap();
    adapter
        .update(id, sample_draft("Dune Messiah"), &[])
        .await
        .unwrap();
    adapter.delete(id).await.unwrap();

    let created = events.recv().await.unwrap();
    assert_eq!(created.event.action(), "created");
    assert_eq!(created.event.listing_id(), id);

    let updated = events.recv().await.unwrap();
    assert_eq!(updated.event.action(), "updated");
    assert_eq!(updated.event.listing_id(), id);
    match &updated.event {
        ListingEvent::Updated { listing, .. } => assert_eq!(listing.title, "Dune Messiah"),
        other => panic!("expected updated event, got {}", other.action()),
    }

    let deleted = events.recv().await.unwrap();
    assert_eq!(deleted.event.action(), "deleted");
    assert_eq!(deleted.event.listing_id(), id);
}

#[tokio::test]
async fn test_create_then_render_with_highlight() {
    let adapter = memory_adapter().await;
    let updates = adapter.subscribe();

    let mut view = ViewController::new(SessionIdentity::named("ana"));
    view.begin_loading();

    let id = adapter
        .create(sample_draft("Dune"), &[png_file("c.png", 64)])
        .await
        .unwrap();

    view.apply_snapshot(updates.borrow().clone());
    view.highlight(id);
    assert_eq!(view.phase(), Phase::Rendered);

    let cards = view.cards();
    assert_eq!(cards.len(), 1);
    assert!(cards[0].highlighted);
    assert!(cards[0].editable); // draft owner is "ana"

    // Highlight is one-shot.
    assert!(!view.cards()[0].highlighted);
}

#[tokio::test]
async fn test_subscription_as_a_stream() {
    use futures::StreamExt;

    let adapter = memory_adapter().await;
    let mut stream = adapter.subscribe_stream();

    // The stream yields the current snapshot first.
    let initial = stream.next().await.unwrap();
    assert!(initial.is_empty());

    adapter
        .create(sample_draft("Dune"), &[png_file("c.png", 64)])
        .await
        .unwrap();

    let next = stream.next().await.unwrap();
    assert_eq!(next.len(), 1);
    assert_eq!(next[0].title, "Dune");
}

// ---------------------------------------------------------------------------
// Retry
// ---------------------------------------------------------------------------

/// Delegates to an in-memory store but fails the first `failures` inserts
/// with a transport error.
struct FlakyStore {
    inner: InMemoryStore,
    failures: AtomicUsize,
}

impl FlakyStore {
    fn new(failures: usize) -> Self {
        Self {
            inner: InMemoryStore::new(),
            failures: AtomicUsize::new(failures),
        }
    }
}

#[async_trait]
impl ListingStore for FlakyStore {
    fn backend_name(&self) -> &'static str {
        "flaky"
    }

    async fn insert(&self, listing: Listing) -> SwapResult<()> {
        if self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StoreError::Transport {
                backend: "flaky",
                message: "connection reset".to_string(),
            }
            .into());
        }
        self.inner.insert(listing).await
    }

    async fn get(&self, id: &Uuid) -> SwapResult<Option<Listing>> {
        self.inner.get(id).await
    }

    async fn list(&self) -> SwapResult<Vec<Listing>> {
        self.inner.list().await
    }

    async fn replace(&self, id: &Uuid, listing: Listing) -> SwapResult<()> {
        self.inner.replace(id, listing).await
    }

    async fn remove(&self, id: &Uuid) -> SwapResult<()> {
        self.inner.remove(id).await
    }
}

#[tokio::test]
async fn test_transient_store_failures_are_retried() {
    let adapter = StoreAdapter::connect(
        Arc::new(FlakyStore::new(2)),
        ImagePolicy::default(),
        RetryPolicy {
            attempts: 3,
            base_delay_ms: 1,
        },
    )
    .await
    .unwrap();

    let id = adapter
        .create(sample_draft("Dune"), &[png_file("c.png", 64)])
        .await
        .unwrap();
    assert!(adapter.get(id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_retry_budget_exhausted_surfaces_store_error() {
    let adapter = StoreAdapter::connect(
        Arc::new(FlakyStore::new(5)),
        ImagePolicy::default(),
        RetryPolicy {
            attempts: 3,
            base_delay_ms: 1,
        },
    )
    .await
    .unwrap();

    let err = adapter
        .create(sample_draft("Dune"), &[png_file("c.png", 64)])
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "STORE_ERROR");
    assert!(adapter.current().is_empty());
}

#[tokio::test]
async fn test_not_found_is_never_retried() {
    let adapter = StoreAdapter::connect(
        Arc::new(InMemoryStore::new()),
        ImagePolicy::default(),
        RetryPolicy {
            attempts: 3,
            base_delay_ms: 1,
        },
    )
    .await
    .unwrap();

    let start = std::time::Instant::now();
    let err = adapter.delete(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
    // No backoff sleeps happened.
    assert!(start.elapsed() < std::time::Duration::from_millis(50));
}
