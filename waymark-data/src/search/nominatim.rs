//! Nominatim API response types for the search endpoint.
//!
//! This module provides deserialisation types for the `jsonv2` response
//! format and the conversion into domain [`Place`] values. Coordinates
//! arrive as strings and are decoded defensively; identities are derived
//! from the OSM key where one is present because it is stable across
//! repeated searches, unlike `place_id`.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Search/>

use serde::Deserialize;
use waymark_core::{Place, PlaceId, SearchError};

/// One record of a Nominatim `jsonv2` search response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    /// Nominatim's internal identifier; not stable across re-imports, used
    /// as the identity only when the OSM key is absent.
    pub place_id: u64,
    /// OSM element type (`node`, `way`, or `relation`), when known.
    pub osm_type: Option<String>,
    /// OSM element identifier, when known.
    pub osm_id: Option<u64>,
    /// Latitude as a decimal string.
    pub lat: String,
    /// Longitude as a decimal string.
    pub lon: String,
    /// Short display name, when provided.
    #[serde(default)]
    pub name: Option<String>,
    /// Full formatted address line.
    pub display_name: String,
}

impl SearchResult {
    /// Derive the stable identity for this record.
    ///
    /// `"{osm_type}/{osm_id}"` when both halves are present, otherwise
    /// `"place:{place_id}"`.
    #[must_use]
    pub fn identity(&self) -> PlaceId {
        match (&self.osm_type, self.osm_id) {
            (Some(osm_type), Some(osm_id)) => PlaceId::new(format!("{osm_type}/{osm_id}")),
            _ => PlaceId::new(format!("place:{}", self.place_id)),
        }
    }

    /// Convert the record into a domain [`Place`].
    ///
    /// A blank `name` falls back to the first comma-separated segment of
    /// `display_name`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Parse`] when a coordinate string does not
    /// decode to a finite number.
    pub fn into_place(self) -> Result<Place, SearchError> {
        let latitude = parse_coordinate(&self.lat, "latitude", self.place_id)?;
        let longitude = parse_coordinate(&self.lon, "longitude", self.place_id)?;
        let id = self.identity();
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| leading_segment(&self.display_name), str::to_owned);
        Ok(Place::new(
            id,
            name,
            geo::Coord {
                x: longitude,
                y: latitude,
            },
            self.display_name,
        ))
    }
}

fn parse_coordinate(raw: &str, axis: &str, place_id: u64) -> Result<f64, SearchError> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| SearchError::Parse {
            message: format!("invalid {axis} {raw:?} in search result {place_id}"),
        })
}

fn leading_segment(display_name: &str) -> String {
    display_name
        .split(',')
        .next()
        .unwrap_or(display_name)
        .trim()
        .to_owned()
}
