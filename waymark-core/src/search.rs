//! Place search and geocoding ports.
//!
//! The search provider is an external collaborator; its contract is defined
//! here because the reconciliation logic depends on its result shape and
//! failure modes. A request that fails must never be read as "no places
//! here": zero results is an `Ok` outcome, every failure is an `Err`.

use async_trait::async_trait;
use geo::Coord;
use thiserror::Error;

use crate::Place;

/// Validated input for a nearby-place search.
///
/// Construction fails fast on malformed input, so an invalid request can
/// never reach a provider. Fields are read through accessors to keep the
/// validated state sealed.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waymark_core::SearchRequest;
///
/// let request = SearchRequest::new(
///     Coord { x: -122.4194, y: 37.7749 },
///     5000.0,
///     "public library",
/// )?;
/// assert_eq!(request.query(), "public library");
/// # Ok::<(), waymark_core::SearchRequestError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    center: Coord<f64>,
    radius_meters: f64,
    query: String,
}

/// Errors returned by [`SearchRequest::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchRequestError {
    /// Latitude must be finite and within [-90, 90].
    #[error("latitude {value} is outside [-90, 90]")]
    LatitudeOutOfRange {
        /// The rejected latitude.
        value: f64,
    },
    /// Longitude must be finite and within [-180, 180].
    #[error("longitude {value} is outside [-180, 180]")]
    LongitudeOutOfRange {
        /// The rejected longitude.
        value: f64,
    },
    /// The search radius must be a positive, finite number of metres.
    #[error("search radius must be positive and finite, got {value}")]
    InvalidRadius {
        /// The rejected radius in metres.
        value: f64,
    },
    /// The free-text query must contain at least one non-whitespace
    /// character.
    #[error("search query must not be blank")]
    BlankQuery,
}

impl SearchRequest {
    /// Validate and construct a search request.
    ///
    /// # Errors
    ///
    /// Returns a [`SearchRequestError`] when the centre coordinate is out of
    /// range or non-finite, the radius is not positive and finite, or the
    /// query is blank.
    pub fn new(
        center: Coord<f64>,
        radius_meters: f64,
        query: impl Into<String>,
    ) -> Result<Self, SearchRequestError> {
        if !center.y.is_finite() || !(-90.0..=90.0).contains(&center.y) {
            return Err(SearchRequestError::LatitudeOutOfRange { value: center.y });
        }
        if !center.x.is_finite() || !(-180.0..=180.0).contains(&center.x) {
            return Err(SearchRequestError::LongitudeOutOfRange { value: center.x });
        }
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(SearchRequestError::InvalidRadius {
                value: radius_meters,
            });
        }
        let text = query.into();
        if text.trim().is_empty() {
            return Err(SearchRequestError::BlankQuery);
        }
        Ok(Self {
            center,
            radius_meters,
            query: text,
        })
    }

    /// Centre of the search (`x = longitude`, `y = latitude`).
    #[must_use]
    pub const fn center(&self) -> Coord<f64> {
        self.center
    }

    /// Search radius in metres.
    #[must_use]
    pub const fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    /// Free-text search term.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Errors from [`PlaceSearch::search`] and [`Geocoder::geocode`].
///
/// Every variant is a failed search, distinct from a successful search with
/// zero results. The known set and viewport are left untouched on failure;
/// the caller retries the triggering action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The provider did not answer within the configured timeout.
    #[error("search request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// The requested URL.
        url: String,
        /// The timeout that elapsed, in seconds.
        timeout_secs: u64,
    },
    /// The provider answered with an error status.
    #[error("search request to {url} failed with HTTP {status}: {message}")]
    Http {
        /// The requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Provider-supplied detail.
        message: String,
    },
    /// The request never completed (DNS, connection, or transport failure).
    #[error("search request to {url} failed: {message}")]
    Network {
        /// The requested URL.
        url: String,
        /// Transport-level detail.
        message: String,
    },
    /// The provider's response could not be decoded.
    #[error("failed to parse search response: {message}")]
    Parse {
        /// Decoding detail.
        message: String,
    },
}

/// Resolve candidate places near a centre coordinate.
///
/// Results come back in the provider's relevance order, capped at a
/// provider-dependent limit. The order is preserved downstream but carries
/// no meaning beyond "as returned".
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Search for places matching the request.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] on network, provider, or decoding failure.
    /// Zero results is `Ok(vec![])`, never an error.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Place>, SearchError>;
}

/// Resolve a free-text address to a centre coordinate.
///
/// An equivalent, swappable source of the centre point consumed by
/// [`PlaceSearch`].
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Geocode an address, returning `None` when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] on network, provider, or decoding failure.
    async fn geocode(&self, address: &str) -> Result<Option<Coord<f64>>, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(90.0)]
    #[case(-90.0)]
    #[case(0.0)]
    fn boundary_latitudes_are_accepted(#[case] latitude: f64) {
        let result = SearchRequest::new(Coord { x: 0.0, y: latitude }, 100.0, "library");
        assert!(result.is_ok());
    }

    #[rstest]
    #[case(90.5)]
    #[case(-91.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn out_of_range_latitudes_are_rejected(#[case] latitude: f64) {
        let result = SearchRequest::new(Coord { x: 0.0, y: latitude }, 100.0, "library");
        assert!(matches!(
            result,
            Err(SearchRequestError::LatitudeOutOfRange { .. })
        ));
    }

    #[rstest]
    #[case(180.5)]
    #[case(-181.0)]
    #[case(f64::NEG_INFINITY)]
    fn out_of_range_longitudes_are_rejected(#[case] longitude: f64) {
        let result = SearchRequest::new(Coord { x: longitude, y: 0.0 }, 100.0, "library");
        assert!(matches!(
            result,
            Err(SearchRequestError::LongitudeOutOfRange { .. })
        ));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f64::NAN)]
    fn non_positive_radii_are_rejected(#[case] radius: f64) {
        let result = SearchRequest::new(Coord { x: 0.0, y: 0.0 }, radius, "library");
        assert!(matches!(
            result,
            Err(SearchRequestError::InvalidRadius { .. })
        ));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_queries_are_rejected(#[case] query: &str) {
        let result = SearchRequest::new(Coord { x: 0.0, y: 0.0 }, 100.0, query);
        assert_eq!(result, Err(SearchRequestError::BlankQuery));
    }
}
