use std::collections::HashMap;

use crate::foundation::error::PhotostripResult;

/// Latitude/longitude in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinates {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl Coordinates {
    /// Construct from decimal degrees.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Coordinates rounded to four decimals (about 11 m), used as the cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CoordinateKey {
    lat_e4: i64,
    lng_e4: i64,
}

impl From<Coordinates> for CoordinateKey {
    fn from(c: Coordinates) -> Self {
        Self {
            lat_e4: (c.lat * 1e4).round() as i64,
            lng_e4: (c.lng * 1e4).round() as i64,
        }
    }
}

impl std::fmt::Display for CoordinateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.4},{:.4}",
            self.lat_e4 as f64 / 1e4,
            self.lng_e4 as f64 / 1e4
        )
    }
}

/// Reverse-geocoded place names.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Place {
    /// City, town, village or county.
    pub city: Option<String>,
    /// Country.
    pub country: Option<String>,
}

impl Place {
    /// `"City, Country"`, or whichever part is known.
    pub fn label(&self) -> Option<String> {
        let city = self.city.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let country = self
            .country
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        match (city, country) {
            (Some(city), Some(country)) => Some(format!("{city}, {country}")),
            (Some(one), None) | (None, Some(one)) => Some(one.to_string()),
            (None, None) => None,
        }
    }
}

/// Host-provided reverse geocoding service.
pub trait ReverseGeocoder {
    /// Look up `coords`; `Ok(None)` when nothing is known there.
    fn reverse(&mut self, coords: Coordinates) -> PhotostripResult<Option<Place>>;
}

/// Owned map of resolved location labels.
#[derive(Clone, Debug, Default)]
pub struct LocationCache {
    entries: HashMap<CoordinateKey, String>,
}

impl LocationCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached label for `coords`.
    pub fn get(&self, coords: Coordinates) -> Option<&str> {
        self.entries.get(&coords.into()).map(String::as_str)
    }

    /// Store a label.
    pub fn insert(&mut self, coords: Coordinates, label: String) {
        self.entries.insert(coords.into(), label);
    }

    /// Number of cached labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Reverse geocoder fronted by a [`LocationCache`].
#[derive(Debug)]
pub struct LocationResolver<G> {
    geocoder: G,
    cache: LocationCache,
}

impl<G: ReverseGeocoder> LocationResolver<G> {
    /// Resolver with an empty cache.
    pub fn new(geocoder: G) -> Self {
        Self::with_cache(geocoder, LocationCache::new())
    }

    /// Resolver reusing an existing cache.
    pub fn with_cache(geocoder: G, cache: LocationCache) -> Self {
        Self { geocoder, cache }
    }

    /// The cache.
    pub fn cache(&self) -> &LocationCache {
        &self.cache
    }

    /// Mutable access to the cache, e.g. to clear it.
    pub fn cache_mut(&mut self) -> &mut LocationCache {
        &mut self.cache
    }

    /// Label for `coords`, suitable as `RenderOptions::location_text`.
    ///
    /// Only successful lookups are cached; failures are logged and retried next time.
    pub fn resolve(&mut self, coords: Coordinates) -> Option<String> {
        if let Some(hit) = self.cache.get(coords) {
            return Some(hit.to_string());
        }
        let label = match self.geocoder.reverse(coords) {
            Ok(place) => place.and_then(|p| p.label()),
            Err(err) => {
                tracing::warn!(
                    key = %CoordinateKey::from(coords),
                    error = %err,
                    "reverse geocoding failed"
                );
                None
            }
        }?;
        self.cache.insert(coords, label.clone());
        Some(label)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/location/cache.rs"]
mod tests;
