//! Core domain types and pure logic for the waymark engine.
//!
//! waymark reconciles nearby-place search results against a known set of
//! places, preserving user-set visited annotations across repeated searches
//! and deriving the map viewport that frames the result set. This crate
//! holds the domain model, the reconciliation and framing logic, the search
//! and persistence ports, and the search-ordering state machine; outward
//! adapters (HTTP providers, the async coordinator) live in `waymark-data`.
//!
//! Everything here is synchronous and free of I/O: the only operation that
//! may suspend is the provider call behind the [`PlaceSearch`] port, driven
//! by the caller.

#![forbid(unsafe_code)]

pub mod nav;
pub mod place;
pub mod reconcile;
pub mod search;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod viewport;
pub mod visits;

pub use nav::{Destination, TravelMode};
pub use place::{AnnotatedPlace, Place, PlaceId};
pub use reconcile::{Reconciler, ToggleError};
pub use search::{Geocoder, PlaceSearch, SearchError, SearchRequest, SearchRequestError};
pub use session::{Completion, SearchSession, SearchTicket};
pub use viewport::{FRAME_PADDING, Span, Viewport};
#[cfg(feature = "store-sqlite")]
pub use visits::{SqliteVisitStore, SqliteVisitStoreError};
pub use visits::{VisitStore, VisitStoreError};
