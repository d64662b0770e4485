//! Remote document-collection listing store
//!
//! Talks to a Firebase-style JSON REST collection: each record lives at
//! `{base}/books/{id}.json` and the whole collection at `{base}/books.json`
//! (an object keyed by id, or `null` when empty). The backend performs no
//! push; change notification is the adapter's snapshot refresh after each
//! local mutation, which is exactly the degradation the subscription
//! contract allows for stores without push support.
//!
//! Enable with `--features remote`. Requires the `reqwest` crate.

use crate::core::error::{StoreError, SwapError, SwapResult};
use crate::core::listing::Listing;
use crate::core::service::ListingStore;
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

const BACKEND: &str = "remote";

/// HTTP implementation of `ListingStore` against a JSON document collection.
#[derive(Clone)]
pub struct RemoteStore {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteStore {
    /// Point at a collection root, e.g. `https://example.firebaseio.com`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn record_url(&self, id: &Uuid) -> String {
        format!("{}/books/{}.json", self.base_url, id)
    }

    fn collection_url(&self) -> String {
        format!("{}/books.json", self.base_url)
    }
}

fn transport_error(e: reqwest::Error) -> SwapError {
    StoreError::Transport {
        backend: BACKEND,
        message: e.to_string(),
    }
    .into()
}

#[async_trait]
impl ListingStore for RemoteStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn insert(&self, listing: Listing) -> SwapResult<()> {
        self.client
            .put(self.record_url(&listing.id))
            .json(&listing)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(transport_error)?;
        Ok(())
    }

    async fn get(&self, id: &Uuid) -> SwapResult<Option<Listing>> {
        let response = self
            .client
            .get(self.record_url(id))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(transport_error)?;

        // The collection answers `null` for absent documents.
        let listing: Option<Listing> = response.json().await.map_err(transport_error)?;
        Ok(listing)
    }

    async fn list(&self) -> SwapResult<Vec<Listing>> {
        let response = self
            .client
            .get(self.collection_url())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(transport_error)?;

        let records: Option<HashMap<String, Listing>> =
            response.json().await.map_err(transport_error)?;
        Ok(records.map(|m| m.into_values().collect()).unwrap_or_default())
    }

    async fn replace(&self, id: &Uuid, listing: Listing) -> SwapResult<()> {
        if self.get(id).await?.is_none() {
            return Err(SwapError::NotFound { id: *id });
        }
        self.insert(listing).await
    }

    async fn remove(&self, id: &Uuid) -> SwapResult<()> {
        if self.get(id).await?.is_none() {
            return Err(SwapError::NotFound { id: *id });
        }
        self.client
            .delete(self.record_url(id))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(transport_error)?;
        Ok(())
    }
}
