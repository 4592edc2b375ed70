//! HTTP place-search and geocoding provider.
//!
//! This module provides [`HttpPlaceSearch`], an implementation of the
//! [`waymark_core::PlaceSearch`] and [`waymark_core::Geocoder`] ports
//! backed by a Nominatim-style search endpoint.
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use waymark_data::search::{HttpPlaceSearch, HttpPlaceSearchConfig};
//! use waymark_core::{PlaceSearch, SearchRequest};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpPlaceSearchConfig::new("https://nominatim.openstreetmap.org")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let provider = HttpPlaceSearch::with_config(config)?;
//!
//! let request = SearchRequest::new(
//!     Coord { x: -122.4194, y: 37.7749 },
//!     5000.0,
//!     "public library",
//! )?;
//! let places = provider.search(&request).await?;
//! # Ok(())
//! # }
//! ```

mod nominatim;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use provider::{
    DEFAULT_USER_AGENT, HttpPlaceSearch, HttpPlaceSearchConfig, ProviderBuildError,
};
