//! Core module containing the data model, errors, events, and the store trait

pub mod error;
pub mod events;
pub mod identity;
pub mod listing;
pub mod service;
pub mod validation;

pub use error::{SwapError, SwapResult};
pub use events::{EventBus, ListingEvent};
pub use identity::SessionIdentity;
pub use listing::{Coordinates, Listing, ListingDraft, ListingImage};
pub use service::ListingStore;
