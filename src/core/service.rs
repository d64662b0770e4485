//! Storage service trait for listing persistence

use crate::core::error::SwapResult;
use crate::core::listing::Listing;
use async_trait::async_trait;
use uuid::Uuid;

/// Contract every storage backend implements.
///
/// Backends are deliberately dumb: no validation, no id assignment, no
/// ordering guarantees. All policy (draft validation, image limits, timestamp
/// handling, retry, snapshot ordering) lives in
/// [`crate::adapter::StoreAdapter`], so swapping backends never changes
/// behavior.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Short name used in log lines and error messages.
    fn backend_name(&self) -> &'static str;

    /// Persist a new record under its id.
    async fn insert(&self, listing: Listing) -> SwapResult<()>;

    /// Fetch one record.
    async fn get(&self, id: &Uuid) -> SwapResult<Option<Listing>>;

    /// Fetch every record, in no particular order.
    async fn list(&self) -> SwapResult<Vec<Listing>>;

    /// Overwrite an existing record. Fails with `NotFound` if the id is absent.
    async fn replace(&self, id: &Uuid, listing: Listing) -> SwapResult<()>;

    /// Remove a record. Fails with `NotFound` if the id is absent.
    async fn remove(&self, id: &Uuid) -> SwapResult<()>;
}
