//! Internal event system for real-time notifications
//!
//! The EventBus decouples mutations (adapter create/update/delete) from
//! notifications (view highlight, embedding pages). It uses
//! `tokio::sync::broadcast`, so publishing is fire-and-forget and every
//! subscriber sees every event.
//!
//! The full-list snapshot that drives re-rendering travels separately on a
//! `watch` channel (see [`crate::adapter::StoreAdapter::subscribe`]); the bus
//! carries the granular per-mutation events.

use crate::core::listing::Listing;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// A mutation applied to the listing collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ListingEvent {
    /// A listing was created.
    Created { id: Uuid, listing: Listing },
    /// A listing was updated in place.
    Updated { id: Uuid, listing: Listing },
    /// A listing was deleted.
    Deleted { id: Uuid },
}

impl ListingEvent {
    /// The listing id this event concerns.
    pub fn listing_id(&self) -> Uuid {
        match self {
            ListingEvent::Created { id, .. }
            | ListingEvent::Updated { id, .. }
            | ListingEvent::Deleted { id } => *id,
        }
    }

    /// The action name (created, updated, deleted).
    pub fn action(&self) -> &'static str {
        match self {
            ListingEvent::Created { .. } => "created",
            ListingEvent::Updated { .. } => "updated",
            ListingEvent::Deleted { .. } => "deleted",
        }
    }
}

/// Envelope wrapping an event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The actual event.
    pub event: ListingEvent,
}

impl EventEnvelope {
    pub fn new(event: ListingEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone (Arc internally). If there are no subscribers an event is
/// simply dropped; lagging subscribers get a `Lagged` error on their next
/// `recv()` rather than blocking the publisher.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers. Returns the receiver count.
    pub fn publish(&self, event: ListingEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        // send() errs only when there are no receivers, which is fine
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Current number of active subscribers.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
