//! Place identity and attributes.
//!
//! Coordinates are WGS84 with `x = longitude` and `y = latitude`. Identity is
//! assigned once when a place is first observed (by the search provider, or
//! synthesised locally for ad-hoc pins) and never changes afterwards.

use std::fmt;

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identity distinguishing one place from another across searches.
///
/// Providers derive identities from their own stable keys (for OSM-backed
/// providers: `"{osm_type}/{osm_id}"`); ad-hoc pins synthesise one from their
/// coordinate via [`PlaceId::pin`].
///
/// # Examples
/// ```
/// use waymark_core::PlaceId;
///
/// let id = PlaceId::new("node/42");
/// assert_eq!(id.as_str(), "node/42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PlaceId(String);

impl PlaceId {
    /// Wrap an identity string supplied by a search source.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Synthesise an identity for an ad-hoc pin at the given coordinate.
    ///
    /// # Examples
    /// ```
    /// use waymark_core::PlaceId;
    ///
    /// let id = PlaceId::pin(37.7749, -122.4194);
    /// assert_eq!(id.as_str(), "pin:37.7749,-122.4194");
    /// ```
    #[must_use]
    pub fn pin(latitude: f64, longitude: f64) -> Self {
        Self(format!("pin:{latitude},{longitude}"))
    }

    /// View the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PlaceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PlaceId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// A named, geolocated point of interest with a stable identity.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waymark_core::{Place, PlaceId};
///
/// let place = Place::new(
///     PlaceId::new("node/42"),
///     "Central Library",
///     Coord { x: -122.4194, y: 37.7749 },
///     "100 Larkin St, San Francisco",
/// );
/// assert_eq!(place.name, "Central Library");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Place {
    /// Stable identity assigned at first observation.
    pub id: PlaceId,
    /// Display name.
    pub name: String,
    /// Geographic position (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
    /// Formatted postal address.
    pub address: String,
}

impl Place {
    /// Construct a `Place` from its attributes.
    #[must_use]
    pub fn new(
        id: PlaceId,
        name: impl Into<String>,
        location: Coord<f64>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            address: address.into(),
        }
    }
}

/// A place paired with its visited annotation.
///
/// The annotation is keyed by the place's identity and independent of its
/// other attributes: attributes may refresh on every search while the flag
/// carries over.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnnotatedPlace {
    /// The place attributes as of the most recent observation.
    pub place: Place,
    /// Whether the user has marked this identity as visited.
    pub visited: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_ids_embed_the_coordinate() {
        let id = PlaceId::pin(37.5, -121.25);
        assert_eq!(id.as_str(), "pin:37.5,-121.25");
    }

    #[test]
    fn place_ids_compare_by_value() {
        assert_eq!(PlaceId::new("node/1"), PlaceId::from("node/1"));
        assert_ne!(PlaceId::new("node/1"), PlaceId::new("way/1"));
    }
}
