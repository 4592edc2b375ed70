//! Facade crate for the waymark place-search engine.
//!
//! This crate re-exports the core domain types and exposes the HTTP search
//! provider, the async coordinator, and the SQLite visit store behind
//! feature flags.

#![forbid(unsafe_code)]

pub use waymark_core::{
    AnnotatedPlace, Completion, Destination, FRAME_PADDING, Geocoder, Place, PlaceId, PlaceSearch,
    Reconciler, SearchError, SearchRequest, SearchRequestError, SearchSession, SearchTicket, Span,
    ToggleError, TravelMode, Viewport, VisitStore, VisitStoreError,
};

#[cfg(feature = "store-sqlite")]
pub use waymark_core::{SqliteVisitStore, SqliteVisitStoreError};

#[cfg(feature = "search-http")]
pub use waymark_data::{
    CoordinatorError, HttpPlaceSearch, HttpPlaceSearchConfig, ProviderBuildError,
    SearchCoordinator, SearchCoordinatorConfig, SearchOutcome, VisitToggle,
};

#[cfg(feature = "directory")]
pub use waymark_data::directory::{
    BusinessId, BusinessRecord, DirectoryError, DirectoryLookup, HttpDirectoryClient,
};

#[cfg(feature = "test-support")]
pub use waymark_core::test_support;
