//! # bookswap
//!
//! Listing persistence and synchronization for a small book-swap marketplace.
//!
//! Two cooperating pieces:
//!
//! - **[`StoreAdapter`](adapter::StoreAdapter)** — fronts whichever backing
//!   store is configured (in-memory session, local JSON blob, remote document
//!   collection) behind create/update/delete/subscribe. Owns validation, the
//!   image intake pipeline, id/timestamp assignment, and bounded retry.
//! - **[`ViewController`](view::ViewController)** — holds the latest listing
//!   snapshot and produces the render projection: search filter, optional
//!   proximity sort, ownership-gated controls, one-shot highlight.
//!
//! Data flows one way for reads (store → adapter snapshot → controller →
//! cards) and one way for writes (form submission → adapter → store, which
//! produces the next snapshot).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bookswap::prelude::*;
//!
//! let config = SwapConfig::default(); // in-memory backend
//! let adapter = build_adapter(&config).await?;
//!
//! let mut updates = adapter.subscribe();
//! let id = adapter
//!     .create(draft, &[ImageFile::new("cover.png", bytes)])
//!     .await?;
//!
//! let mut view = ViewController::new(SessionIdentity::named("ana"));
//! view.apply_snapshot(updates.borrow_and_update().clone());
//! view.highlight(id);
//! for card in view.cards() {
//!     println!("{} — {}", card.title, card.price);
//! }
//! ```
//!
//! ## Features
//!
//! - `remote` — REST document-collection backend over `reqwest`
//! - `geocoding` — Nominatim forward/reverse geocoder for proximity sort

pub mod adapter;
pub mod config;
pub mod core;
pub mod images;
pub mod storage;
pub mod view;

/// Re-exports of commonly used types
pub mod prelude {
    pub use crate::adapter::{RetryPolicy, StoreAdapter};
    pub use crate::config::{BackendConfig, SwapConfig, build_adapter};
    pub use crate::core::error::{
        ConfigError, ImageError, StoreError, SwapError, SwapResult, ValidationError,
    };
    pub use crate::core::events::{EventBus, EventEnvelope, ListingEvent};
    pub use crate::core::identity::SessionIdentity;
    pub use crate::core::listing::{Coordinates, Listing, ListingDraft, ListingImage};
    pub use crate::core::service::ListingStore;
    pub use crate::images::{ImageFile, ImagePolicy};
    pub use crate::storage::{InMemoryStore, LocalFileStore};
    #[cfg(feature = "remote")]
    pub use crate::storage::RemoteStore;
    pub use crate::view::geo::{CachingGeocoder, Geocoder, haversine_km};
    #[cfg(feature = "geocoding")]
    pub use crate::view::geo::NominatimGeocoder;
    pub use crate::view::{ListingCard, Phase, ViewController};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
