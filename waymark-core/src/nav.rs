//! Hand-off descriptors for external navigation applications.
//!
//! The caller passes these URLs to whichever map application the user
//! chooses; no response ever comes back. The formats match what the
//! external applications accept, so they are fixed strings rather than
//! configurable templates.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use geo::Coord;

use crate::Place;

/// Travel mode requested from the external navigation application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TravelMode {
    /// Directions by car.
    #[default]
    Driving,
    /// Directions on foot.
    Walking,
    /// Directions by public transport.
    Transit,
}

impl TravelMode {
    /// Mode string used by Google Maps URLs.
    #[must_use]
    pub const fn google_mode(self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Transit => "transit",
        }
    }

    /// `dirflg` value used by Apple Maps URLs.
    #[must_use]
    pub const fn apple_dirflg(self) -> char {
        match self {
            Self::Driving => 'd',
            Self::Walking => 'w',
            Self::Transit => 'r',
        }
    }
}

/// A navigation target: a coordinate with a human-readable label.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waymark_core::{Destination, TravelMode};
///
/// let destination = Destination::new("Central Library", Coord { x: -122.4, y: 37.8 });
/// assert_eq!(
///     destination.google_maps_app_url(TravelMode::Driving),
///     "comgooglemaps://?daddr=37.8,-122.4&directionsmode=driving",
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Destination {
    /// Label shown by the external application.
    pub label: String,
    /// Target coordinate (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
}

impl Destination {
    /// Construct a destination from a label and coordinate.
    #[must_use]
    pub fn new(label: impl Into<String>, location: Coord<f64>) -> Self {
        Self {
            label: label.into(),
            location,
        }
    }

    /// Build the destination for a known place.
    #[must_use]
    pub fn from_place(place: &Place) -> Self {
        Self::new(place.name.clone(), place.location)
    }

    /// URL opening the Google Maps application with directions.
    #[must_use]
    pub fn google_maps_app_url(&self, mode: TravelMode) -> String {
        format!(
            "comgooglemaps://?daddr={},{}&directionsmode={}",
            self.location.y,
            self.location.x,
            mode.google_mode(),
        )
    }

    /// Web fallback when the Google Maps application is not installed.
    #[must_use]
    pub fn google_maps_web_url(&self, mode: TravelMode) -> String {
        format!(
            "https://www.google.com/maps/dir/?api=1&destination={},{}&travelmode={}",
            self.location.y,
            self.location.x,
            mode.google_mode(),
        )
    }

    /// URL opening Apple Maps with directions.
    #[must_use]
    pub fn apple_maps_url(&self, mode: TravelMode) -> String {
        format!(
            "https://maps.apple.com/?daddr={},{}&dirflg={}",
            self.location.y,
            self.location.x,
            mode.apple_dirflg(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn destination() -> Destination {
        Destination::new("Central Library", Coord { x: -122.4194, y: 37.7749 })
    }

    #[rstest]
    #[case(TravelMode::Driving, "driving")]
    #[case(TravelMode::Walking, "walking")]
    #[case(TravelMode::Transit, "transit")]
    fn google_app_urls_carry_the_mode(#[case] mode: TravelMode, #[case] expected: &str) {
        let url = destination().google_maps_app_url(mode);
        assert_eq!(
            url,
            format!("comgooglemaps://?daddr=37.7749,-122.4194&directionsmode={expected}")
        );
    }

    #[rstest]
    fn google_web_url_uses_the_dir_api() {
        let url = destination().google_maps_web_url(TravelMode::Walking);
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/?api=1&destination=37.7749,-122.4194&travelmode=walking"
        );
    }

    #[rstest]
    #[case(TravelMode::Driving, 'd')]
    #[case(TravelMode::Walking, 'w')]
    #[case(TravelMode::Transit, 'r')]
    fn apple_urls_carry_the_dirflg(#[case] mode: TravelMode, #[case] flag: char) {
        let url = destination().apple_maps_url(mode);
        assert_eq!(
            url,
            format!("https://maps.apple.com/?daddr=37.7749,-122.4194&dirflg={flag}")
        );
    }

    #[rstest]
    fn from_place_takes_the_name_and_location() {
        let place = crate::Place::new(
            crate::PlaceId::new("node/1"),
            "Central Library",
            Coord { x: -122.4194, y: 37.7749 },
            "100 Larkin St",
        );
        assert_eq!(Destination::from_place(&place), destination());
    }
}
