//! Test utilities for search providers.
//!
//! This module provides [`StubPlaceSearch`] and [`StubGeocoder`],
//! deterministic test doubles for the search ports that return
//! pre-configured responses without making HTTP requests. Scripted calls
//! can be gated on a [`tokio::sync::Notify`] so tests can force two
//! searches to overlap in flight and control which resolves first.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use geo::Coord;
use tokio::sync::Notify;
use waymark_core::{Geocoder, Place, PlaceSearch, SearchError, SearchRequest};

struct ScriptedCall {
    response: Result<Vec<Place>, SearchError>,
    gate: Option<Arc<Notify>>,
}

/// Stub `PlaceSearch` returning scripted responses.
///
/// Scripted calls are consumed in order; once the script is exhausted the
/// stub falls back to its default response (an empty result set unless one
/// was configured).
///
/// # Example
///
/// ```
/// use geo::Coord;
/// use waymark_data::search::test_support::StubPlaceSearch;
/// use waymark_core::{PlaceSearch, SearchRequest};
///
/// # async fn example() -> Result<(), waymark_core::SearchError> {
/// let stub = StubPlaceSearch::with_places(Vec::new());
/// let request = SearchRequest::new(Coord { x: 0.0, y: 0.0 }, 100.0, "library")
///     .expect("request is valid");
/// assert!(stub.search(&request).await?.is_empty());
/// # Ok(())
/// # }
/// ```
pub struct StubPlaceSearch {
    script: Mutex<VecDeque<ScriptedCall>>,
    fallback: Result<Vec<Place>, SearchError>,
}

impl StubPlaceSearch {
    /// Create a stub that answers every call with the given places.
    #[must_use]
    pub fn with_places(places: Vec<Place>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Ok(places),
        }
    }

    /// Create a stub that answers every call with the given error.
    #[must_use]
    pub fn with_error(error: SearchError) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Err(error),
        }
    }

    /// Queue a scripted response for the next call.
    pub fn push(&self, response: Result<Vec<Place>, SearchError>) {
        self.push_call(ScriptedCall {
            response,
            gate: None,
        });
    }

    /// Queue a scripted response that waits on `gate` before resolving.
    ///
    /// The call returns only after `gate.notify_one()` (a permit stored
    /// before the call arrives also releases it), which lets a test hold
    /// one search in flight while a later one completes.
    pub fn push_gated(&self, response: Result<Vec<Place>, SearchError>, gate: Arc<Notify>) {
        self.push_call(ScriptedCall {
            response,
            gate: Some(gate),
        });
    }

    fn push_call(&self, call: ScriptedCall) {
        let mut script = self
            .script
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        script.push_back(call);
    }

    fn next_call(&self) -> Option<ScriptedCall> {
        let mut script = self
            .script
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        script.pop_front()
    }
}

#[async_trait]
impl PlaceSearch for StubPlaceSearch {
    async fn search(&self, _request: &SearchRequest) -> Result<Vec<Place>, SearchError> {
        match self.next_call() {
            Some(call) => {
                if let Some(gate) = call.gate {
                    gate.notified().await;
                }
                call.response
            }
            None => self.fallback.clone(),
        }
    }
}

/// Stub `Geocoder` returning a fixed response.
pub struct StubGeocoder {
    response: Result<Option<Coord<f64>>, SearchError>,
}

impl StubGeocoder {
    /// Create a geocoder resolving every address to the given coordinate.
    #[must_use]
    pub const fn with_coordinate(coordinate: Coord<f64>) -> Self {
        Self {
            response: Ok(Some(coordinate)),
        }
    }

    /// Create a geocoder that finds no match for any address.
    #[must_use]
    pub const fn with_no_match() -> Self {
        Self { response: Ok(None) }
    }

    /// Create a geocoder that fails every call.
    #[must_use]
    pub const fn with_error(error: SearchError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Option<Coord<f64>>, SearchError> {
        self.response.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_core::test_support::place;

    fn request() -> SearchRequest {
        SearchRequest::new(Coord { x: 0.0, y: 0.0 }, 100.0, "library").expect("request is valid")
    }

    #[tokio::test]
    async fn scripted_calls_are_consumed_in_order() {
        let stub = StubPlaceSearch::with_places(Vec::new());
        stub.push(Ok(vec![place("node/1", "First", 1.0, 1.0)]));
        stub.push(Ok(vec![place("node/2", "Second", 2.0, 2.0)]));

        let first = stub.search(&request()).await.expect("scripted ok");
        let second = stub.search(&request()).await.expect("scripted ok");
        let fallback = stub.search(&request()).await.expect("fallback ok");

        assert_eq!(first[0].id.as_str(), "node/1");
        assert_eq!(second[0].id.as_str(), "node/2");
        assert!(fallback.is_empty());
    }

    #[tokio::test]
    async fn gated_call_waits_for_the_notify() {
        let gate = Arc::new(Notify::new());
        let stub = StubPlaceSearch::with_places(Vec::new());
        stub.push_gated(Ok(vec![place("node/1", "Gated", 1.0, 1.0)]), Arc::clone(&gate));

        gate.notify_one();
        let places = stub.search(&request()).await.expect("released ok");

        assert_eq!(places.len(), 1);
    }

    #[tokio::test]
    async fn error_stub_fails_every_call() {
        let stub = StubPlaceSearch::with_error(SearchError::Network {
            url: "stub".to_owned(),
            message: "connection refused".to_owned(),
        });

        let err = stub.search(&request()).await.expect_err("stubbed failure");

        assert!(matches!(err, SearchError::Network { .. }));
    }
}
