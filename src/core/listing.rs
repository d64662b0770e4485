//! The listing data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Geographic position attached to a listing or a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// An inline, self-contained image payload.
///
/// Images are stored by value (base64 body), never by reference, so a listing
/// record is complete on its own regardless of which backend holds it.
/// Instances are produced by the image intake pipeline in [`crate::images`];
/// the pipeline is the only place size and count limits are enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingImage {
    /// MIME type sniffed from the file's magic bytes.
    pub content_type: String,
    /// Base64-encoded file body.
    pub data: String,
    /// Size of the original file in bytes.
    pub byte_len: usize,
}

impl ListingImage {
    /// Render as a `data:` URI suitable for an `<img src>` attribute.
    pub fn as_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, self.data)
    }
}

/// One book-for-sale record.
///
/// `id` is assigned by the store adapter on creation and never changes.
/// `created_at` is preserved across edits; `updated_at` is refreshed on every
/// save. Subscription ordering keys on `created_at` descending, so editing a
/// listing does not reshuffle the visible list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    /// Self-reported display name or generated anonymous identity.
    ///
    /// Used only for client-side "is this mine" gating. Nothing at the store
    /// layer enforces it; any caller can update or delete any id.
    pub owner: String,
    pub title: String,
    pub author: String,
    pub price: f64,
    pub condition: String,
    pub location: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    /// Digits only, at most 10.
    pub phone: String,
    /// Always 1..=5 entries once persisted.
    pub images: Vec<ListingImage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The sell-form payload: everything the user supplies for a create or edit.
///
/// Image files travel separately through the intake pipeline; see
/// [`crate::adapter::StoreAdapter::create`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingDraft {
    pub owner: String,
    pub title: String,
    pub author: String,
    pub price: f64,
    pub condition: String,
    pub location: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    pub phone: String,
}

impl ListingDraft {
    /// Trim free-text fields and strip the phone number down to at most
    /// 10 digits. Called by the adapter before validation so that
    /// whitespace-only input fails the presence checks.
    pub fn normalize(mut self) -> Self {
        self.owner = self.owner.trim().to_string();
        self.title = self.title.trim().to_string();
        self.author = self.author.trim().to_string();
        self.condition = self.condition.trim().to_string();
        self.location = self.location.trim().to_string();
        self.phone = self.phone.chars().filter(|c| c.is_ascii_digit()).take(10).collect();
        self
    }
}
