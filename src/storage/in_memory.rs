//! In-memory listing store for tests and volatile sessions
//!
//! Holds the collection in process memory: everything is gone when the
//! process exits. Uses RwLock for thread-safe access.

use crate::core::error::{StoreError, SwapError, SwapResult};
use crate::core::listing::Listing;
use crate::core::service::ListingStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

const BACKEND: &str = "memory";

/// In-memory listing store implementation
#[derive(Clone)]
pub struct InMemoryStore {
    listings: Arc<RwLock<HashMap<Uuid, Listing>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            listings: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(e: impl std::fmt::Display) -> SwapError {
    StoreError::Io {
        backend: BACKEND,
        message: format!("failed to acquire lock: {}", e),
    }
    .into()
}

#[async_trait]
impl ListingStore for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn insert(&self, listing: Listing) -> SwapResult<()> {
        let mut listings = self.listings.write().map_err(lock_error)?;
        listings.insert(listing.id, listing);
        Ok(())
    }

    async fn get(&self, id: &Uuid) -> SwapResult<Option<Listing>> {
        let listings = self.listings.read().map_err(lock_error)?;
        Ok(listings.get(id).cloned())
    }

    async fn list(&self) -> SwapResult<Vec<Listing>> {
        let listings = self.listings.read().map_err(lock_error)?;
        Ok(listings.values().cloned().collect())
    }

    async fn replace(&self, id: &Uuid, listing: Listing) -> SwapResult<()> {
        let mut listings = self.listings.write().map_err(lock_error)?;
        if !listings.contains_key(id) {
            return Err(SwapError::NotFound { id: *id });
        }
        listings.insert(*id, listing);
        Ok(())
    }

    async fn remove(&self, id: &Uuid) -> SwapResult<()> {
        let mut listings = self.listings.write().map_err(lock_error)?;
        if listings.remove(id).is_none() {
            return Err(SwapError::NotFound { id: *id });
        }
        Ok(())
    }
}
