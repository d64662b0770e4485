//! The listing store adapter
//!
//! Front door for every mutation. The adapter owns all policy the backends
//! deliberately lack:
//!
//! - draft normalization and validation (no partial writes: everything is
//!   checked before the first backend call)
//! - the image intake pipeline and its size/count limits
//! - id assignment and timestamp handling (`created_at` preserved across
//!   edits, `updated_at` refreshed)
//! - bounded retry with exponential backoff around backend calls
//! - change notification: a `watch` channel carrying the full current list,
//!   descending by creation time, plus a broadcast [`EventBus`] with
//!   per-mutation events
//!
//! Backends that support no push notification still satisfy the subscription
//! contract: the snapshot is seeded once at startup and refreshed after every
//! local mutation.

use crate::core::error::{SwapError, SwapResult};
use crate::core::events::{EventBus, EventEnvelope, ListingEvent};
use crate::core::listing::{Listing, ListingDraft};
use crate::core::service::ListingStore;
use crate::core::validation::validate_draft;
use crate::images::{ImageFile, ImagePolicy, process_images};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Bounded retry with exponential backoff for transient store failures.
///
/// Only errors marked retryable ([`SwapError::is_retryable`]) are tried
/// again; a missing id or a rejected draft fails immediately.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first. 1 disables retry.
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    /// Delay before the second attempt; doubles each retry, capped at 1s.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    50
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt following `failed_attempt` (1-based).
    pub fn delay(&self, failed_attempt: u32) -> Duration {
        let factor = 1u64 << failed_attempt.saturating_sub(1).min(16);
        Duration::from_millis((self.base_delay_ms.saturating_mul(factor)).min(1_000))
    }
}

/// The public facade over whichever backend is configured.
pub struct StoreAdapter {
    store: Arc<dyn ListingStore>,
    image_policy: ImagePolicy,
    retry: RetryPolicy,
    bus: EventBus,
    snapshot: watch::Sender<Vec<Listing>>,
}

impl std::fmt::Debug for StoreAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreAdapter")
            .field("image_policy", &self.image_policy)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl StoreAdapter {
    /// Wire up a backend and seed the snapshot with its current contents.
    pub async fn connect(
        store: Arc<dyn ListingStore>,
        image_policy: ImagePolicy,
        retry: RetryPolicy,
    ) -> SwapResult<Self> {
        let (snapshot, _) = watch::channel(Vec::new());
        let adapter = Self {
            store,
            image_policy,
            retry,
            bus: EventBus::default(),
            snapshot,
        };
        adapter.refresh_snapshot().await?;
        info!(backend = adapter.store.backend_name(), "store adapter connected");
        Ok(adapter)
    }

    /// The backend this adapter fronts.
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Validate and persist a new listing; returns the assigned id.
    ///
    /// At least one image file is required on this path.
    pub async fn create(&self, draft: ListingDraft, files: &[ImageFile]) -> SwapResult<Uuid> {
        let draft = draft.normalize();
        validate_draft(&draft, files.len(), true)?;
        let images = process_images(files, &self.image_policy)?;

        let now = Utc::now();
        let listing = Listing {
            id: Uuid::new_v4(),
            owner: draft.owner,
            title: draft.title,
            author: draft.author,
            price: draft.price,
            condition: draft.condition,
            location: draft.location,
            coordinates: draft.coordinates,
            phone: draft.phone,
            images,
            created_at: now,
            updated_at: now,
        };

        let id = listing.id;
        self.retrying("insert", || {
            let store = Arc::clone(&self.store);
            let listing = listing.clone();
            async move { store.insert(listing).await }
        })
        .await?;

        info!(%id, title = %listing.title, "listing created");
        self.bus.publish(ListingEvent::Created { id, listing });
        self.refresh_after_mutation().await;
        Ok(id)
    }

    /// Fetch one listing, e.g. to prefill the edit form.
    pub async fn get(&self, id: Uuid) -> SwapResult<Option<Listing>> {
        self.retrying("get", || {
            let store = Arc::clone(&self.store);
            async move { store.get(&id).await }
        })
        .await
    }

    /// Overwrite an existing listing's fields.
    ///
    /// When `files` is empty the previous image set is preserved exactly;
    /// when at least one file is supplied the new set replaces the old one
    /// wholesale (capped by the image policy). `created_at` is preserved so
    /// an edit keeps its place in the list; `updated_at` is refreshed.
    pub async fn update(
        &self,
        id: Uuid,
        draft: ListingDraft,
        files: &[ImageFile],
    ) -> SwapResult<Listing> {
        let draft = draft.normalize();
        validate_draft(&draft, files.len(), false)?;

        let existing = self.get(id).await?.ok_or(SwapError::NotFound { id })?;

        let images = if files.is_empty() {
            existing.images
        } else {
            process_images(files, &self.image_policy)?
        };

        let listing = Listing {
            id,
            owner: draft.owner,
            title: draft.title,
            author: draft.author,
            price: draft.price,
            condition: draft.condition,
            location: draft.location,
            coordinates: draft.coordinates,
            phone: draft.phone,
            images,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        self.retrying("replace", || {
            let store = Arc::clone(&self.store);
            let listing = listing.clone();
            async move { store.replace(&id, listing).await }
        })
        .await?;

        info!(%id, "listing updated");
        self.bus.publish(ListingEvent::Updated {
            id,
            listing: listing.clone(),
        });
        self.refresh_after_mutation().await;
        Ok(listing)
    }

    /// Remove a listing unconditionally.
    ///
    /// No ownership check happens here; ownership is advisory and enforced
    /// only by the view layer hiding controls (see
    /// [`SessionIdentity`](crate::core::identity::SessionIdentity)).
    pub async fn delete(&self, id: Uuid) -> SwapResult<()> {
        self.retrying("remove", || {
            let store = Arc::clone(&self.store);
            async move { store.remove(&id).await }
        })
        .await?;

        info!(%id, "listing deleted");
        self.bus.publish(ListingEvent::Deleted { id });
        self.refresh_after_mutation().await;
        Ok(())
    }

    /// Subscribe to the full listing set.
    ///
    /// The receiver always holds the current list, descending by creation
    /// time: the snapshot present at subscription covers the "called once at
    /// startup" degradation, and every mutation pushes a fresh one.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Listing>> {
        self.snapshot.subscribe()
    }

    /// The subscription as an async stream.
    pub fn subscribe_stream(&self) -> WatchStream<Vec<Listing>> {
        WatchStream::new(self.subscribe())
    }

    /// Granular per-mutation events; drives "highlight newly created".
    pub fn events(&self) -> broadcast::Receiver<EventEnvelope> {
        self.bus.subscribe()
    }

    /// The snapshot as of now.
    pub fn current(&self) -> Vec<Listing> {
        self.snapshot.borrow().clone()
    }

    async fn refresh_snapshot(&self) -> SwapResult<()> {
        let mut listings = self
            .retrying("list", || {
                let store = Arc::clone(&self.store);
                async move { store.list().await }
            })
            .await?;
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(records = listings.len(), "snapshot refreshed");
        self.snapshot.send_replace(listings);
        Ok(())
    }

    /// A failed refresh after a successful write keeps the stale snapshot
    /// rather than failing the mutation that already landed.
    async fn refresh_after_mutation(&self) {
        if let Err(e) = self.refresh_snapshot().await {
            warn!(error = %e, "snapshot refresh failed after mutation");
        }
    }

    async fn retrying<T, F, Fut>(&self, op: &'static str, mut call: F) -> SwapResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = SwapResult<T>>,
    {
        let mut attempt = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.retry.attempts => {
                    warn!(op, attempt, error = %e, "store call failed, retrying");
                    tokio::time::sleep(self.retry.delay(attempt)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
