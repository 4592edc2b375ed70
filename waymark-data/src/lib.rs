//! Outward-facing adapters for the waymark engine.
//!
//! Responsibilities:
//! - HTTP place-search and geocoding provider (Nominatim-style API).
//! - The async [`SearchCoordinator`] wiring provider, visit store, and
//!   reconciler together with latest-search-wins ordering.
//! - The dormant business-directory client behind the `directory` feature.
//!
//! Boundaries:
//! - Domain rules live in `waymark-core`; this crate only adapts them to
//!   the outside world.
//! - No blocking I/O on async executors; all HTTP goes through async
//!   clients.

#![forbid(unsafe_code)]

pub mod coordinator;
#[cfg(feature = "directory")]
pub mod directory;
pub mod search;

pub use coordinator::{
    CoordinatorError, DEFAULT_QUERY, DEFAULT_RADIUS_METERS, SearchCoordinator,
    SearchCoordinatorConfig, SearchOutcome, VisitToggle,
};
pub use search::{HttpPlaceSearch, HttpPlaceSearchConfig, ProviderBuildError};
