//! Geocoding boundary and distance math
//!
//! Everything here is best-effort: a failed lookup degrades to "no
//! coordinates" / "no city" and never aborts rendering.

use crate::core::listing::Coordinates;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometres.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Forward and reverse geocoding against some external service.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Location text to coordinates. `None` on miss or failure.
    async fn forward(&self, location: &str) -> Option<Coordinates>;

    /// Coordinates to a city name. `None` on miss or failure.
    async fn reverse(&self, coords: Coordinates) -> Option<String>;
}

/// Caches forward lookups by raw location string.
///
/// The cache is unbounded and lives for the page's lifetime — the key space
/// is whatever users type into the location field, which stays tiny in
/// practice. Misses are cached too, so a bad location string costs one
/// lookup, not one per render.
pub struct CachingGeocoder<G: Geocoder> {
    inner: G,
    forward_cache: Mutex<HashMap<String, Option<Coordinates>>>,
}

impl<G: Geocoder> CachingGeocoder<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            forward_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached forward lookups (hits and misses).
    pub async fn cached_locations(&self) -> usize {
        self.forward_cache.lock().await.len()
    }
}

#[async_trait]
impl<G: Geocoder> Geocoder for CachingGeocoder<G> {
    async fn forward(&self, location: &str) -> Option<Coordinates> {
        {
            let cache = self.forward_cache.lock().await;
            if let Some(cached) = cache.get(location) {
                return *cached;
            }
        }
        let resolved = self.inner.forward(location).await;
        self.forward_cache
            .lock()
            .await
            .insert(location.to_string(), resolved);
        resolved
    }

    async fn reverse(&self, coords: Coordinates) -> Option<String> {
        self.inner.reverse(coords).await
    }
}

/// Nominatim-backed geocoder.
///
/// Enable with `--features geocoding`. Requires the `reqwest` crate.
#[cfg(feature = "geocoding")]
pub use nominatim::NominatimGeocoder;

#[cfg(feature = "geocoding")]
mod nominatim {
    use super::*;
    use serde::Deserialize;

    const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org";

    #[derive(Debug, Deserialize)]
    struct SearchHit {
        lat: String,
        lon: String,
    }

    #[derive(Debug, Deserialize)]
    struct ReverseResponse {
        #[serde(default)]
        address: Address,
    }

    #[derive(Debug, Default, Deserialize)]
    struct Address {
        city: Option<String>,
        town: Option<String>,
        village: Option<String>,
    }

    /// HTTP geocoder against the Nominatim API.
    pub struct NominatimGeocoder {
        client: reqwest::Client,
        endpoint: String,
    }

    impl NominatimGeocoder {
        pub fn new() -> Self {
            Self::with_endpoint(DEFAULT_ENDPOINT)
        }

        /// Point at a self-hosted instance, or a stub in tests.
        pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
            Self {
                // Nominatim's usage policy requires an identifying agent.
                client: reqwest::Client::builder()
                    .user_agent(concat!("bookswap/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .unwrap_or_default(),
                endpoint: endpoint.into().trim_end_matches('/').to_string(),
            }
        }
    }

    impl Default for NominatimGeocoder {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl Geocoder for NominatimGeocoder {
        async fn forward(&self, location: &str) -> Option<Coordinates> {
            let url = format!("{}/search", self.endpoint);
            let result = self
                .client
                .get(url)
                .query(&[("format", "json"), ("limit", "1"), ("q", location)])
                .send()
                .await
                .and_then(|r| r.error_for_status());

            let hits: Vec<SearchHit> = match result {
                Ok(response) => match response.json().await {
                    Ok(hits) => hits,
                    Err(e) => {
                        debug!(location, error = %e, "forward geocode parse failed");
                        return None;
                    }
                },
                Err(e) => {
                    debug!(location, error = %e, "forward geocode failed");
                    return None;
                }
            };

            let hit = hits.first()?;
            match (hit.lat.parse(), hit.lon.parse()) {
                (Ok(lat), Ok(lon)) => Some(Coordinates { lat, lon }),
                _ => None,
            }
        }

        async fn reverse(&self, coords: Coordinates) -> Option<String> {
            let url = format!("{}/reverse", self.endpoint);
            let lat = coords.lat.to_string();
            let lon = coords.lon.to_string();
            let result = self
                .client
                .get(url)
                .query(&[("format", "json"), ("lat", lat.as_str()), ("lon", lon.as_str())])
                .send()
                .await
                .and_then(|r| r.error_for_status());

            let parsed: ReverseResponse = match result {
                Ok(response) => match response.json().await {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        debug!(error = %e, "reverse geocode parse failed");
                        return None;
                    }
                },
                Err(e) => {
                    debug!(error = %e, "reverse geocode failed");
                    return None;
                }
            };

            parsed
                .address
                .city
                .or(parsed.address.town)
                .or(parsed.address.village)
        }
    }
}
