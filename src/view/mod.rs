//! The listing view controller
//!
//! Holds the latest snapshot delivered by the adapter subscription and turns
//! it into a render projection: a search filter over title/author, an
//! optional proximity order, ownership-gated controls, and a one-shot
//! highlight for a freshly created listing.
//!
//! The controller never talks to the store. Reads flow store → adapter →
//! [`apply_snapshot`](ViewController::apply_snapshot) → [`cards`](ViewController::cards);
//! writes go through the adapter, whose subscription then produces the next
//! snapshot. Re-rendering is total — `cards()` rebuilds the whole projection,
//! no incremental diffing.

pub mod geo;

use crate::core::identity::SessionIdentity;
use crate::core::listing::{Coordinates, Listing};
use self::geo::haversine_km;
use std::cmp::Ordering;
use uuid::Uuid;

/// Penalty added when the viewer's city is known but absent from a listing's
/// free-text location. Keeps textual-locality matches ahead of
/// coordinate-only matches — a heuristic, not a guarantee.
pub const CITY_MISMATCH_PENALTY_KM: f64 = 1_000.0;

/// Render lifecycle per page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing requested yet.
    Idle,
    /// Subscription pending, nothing to show.
    Loading,
    /// At least one snapshot applied; stays here for every re-render.
    Rendered,
}

/// Current ordering of the projection.
#[derive(Debug, Clone, PartialEq)]
enum Order {
    /// Creation time, newest first (the adapter's snapshot order).
    Newest,
    /// Distance from the viewer, closest first.
    Proximity {
        user: Coordinates,
        user_city: Option<String>,
    },
}

/// One entry of the render projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingCard {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub price: f64,
    pub condition: String,
    pub location: String,
    pub owner: String,
    pub phone: String,
    /// `data:` URI of the first image, for the card thumbnail.
    pub cover: Option<String>,
    pub image_count: usize,
    /// Great-circle distance from the viewer, when both sides have
    /// coordinates and proximity order is active. Excludes the city penalty.
    pub distance_km: Option<f64>,
    /// Whether edit/delete controls are rendered. Display-only gate; the
    /// store enforces nothing.
    pub editable: bool,
    /// One-shot emphasis after a successful create.
    pub highlighted: bool,
}

/// Maintains the visible list and its transient projections.
pub struct ViewController {
    identity: SessionIdentity,
    listings: Vec<Listing>,
    search: String,
    order: Order,
    highlight: Option<Uuid>,
    phase: Phase,
}

impl ViewController {
    /// The session identity is injected here, once, and never read from
    /// ambient globals.
    pub fn new(identity: SessionIdentity) -> Self {
        Self {
            identity,
            listings: Vec::new(),
            search: String::new(),
            order: Order::Newest,
            highlight: None,
            phase: Phase::Idle,
        }
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Mark the subscription as pending.
    pub fn begin_loading(&mut self) {
        if self.phase == Phase::Idle {
            self.phase = Phase::Loading;
        }
    }

    /// Replace the held set with the latest subscription snapshot.
    pub fn apply_snapshot(&mut self, listings: Vec<Listing>) {
        self.listings = listings;
        self.phase = Phase::Rendered;
    }

    /// Set the search term. Empty or whitespace-only clears the filter.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into().trim().to_string();
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    /// Order by distance from `user`. When the viewer's city is known,
    /// listings whose location text does not mention it are pushed back by
    /// [`CITY_MISMATCH_PENALTY_KM`].
    pub fn set_proximity(&mut self, user: Coordinates, user_city: Option<String>) {
        self.order = Order::Proximity { user, user_city };
    }

    /// Back to newest-first.
    pub fn clear_proximity(&mut self) {
        self.order = Order::Newest;
    }

    /// Emphasize `id` on the next render only.
    pub fn highlight(&mut self, id: Uuid) {
        self.highlight = Some(id);
    }

    /// Lazy, restartable, case-insensitive substring filter over title and
    /// author. An empty term yields the unfiltered set.
    fn filtered(&self) -> impl Iterator<Item = &Listing> {
        let term = self.search.to_lowercase();
        self.listings.iter().filter(move |listing| {
            term.is_empty()
                || listing.title.to_lowercase().contains(&term)
                || listing.author.to_lowercase().contains(&term)
        })
    }

    /// Build the full render projection.
    ///
    /// Consumes the pending highlight: the emphasized card appears once and
    /// subsequent renders are plain.
    pub fn cards(&mut self) -> Vec<ListingCard> {
        let highlight = self.highlight.take();

        // rank: sort key including the penalty; distance: what the card shows
        let mut ranked: Vec<(&Listing, f64, Option<f64>)> = self
            .filtered()
            .map(|listing| match &self.order {
                Order::Newest => (listing, 0.0, None),
                Order::Proximity { user, user_city } => {
                    let distance = listing.coordinates.map(|c| haversine_km(*user, c));
                    let mut rank = distance.unwrap_or(f64::INFINITY);
                    if let Some(city) = user_city {
                        let matches_city = listing
                            .location
                            .to_lowercase()
                            .contains(&city.to_lowercase());
                        if !matches_city {
                            rank += CITY_MISMATCH_PENALTY_KM;
                        }
                    }
                    (listing, rank, distance)
                }
            })
            .collect();

        if matches!(self.order, Order::Proximity { .. }) {
            ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        }

        ranked
            .into_iter()
            .map(|(listing, _, distance_km)| ListingCard {
                id: listing.id,
                title: listing.title.clone(),
                author: listing.author.clone(),
                price: listing.price,
                condition: listing.condition.clone(),
                location: listing.location.clone(),
                owner: listing.owner.clone(),
                phone: listing.phone.clone(),
                cover: listing.images.first().map(|i| i.as_data_uri()),
                image_count: listing.images.len(),
                distance_km,
                editable: self.identity.owns(listing),
                highlighted: highlight == Some(listing.id),
            })
            .collect()
    }
}
