//! Async orchestration of search, reconciliation, and persistence.
//!
//! The [`SearchCoordinator`] is the single writer of the known set: merges
//! and toggles go through one mutex over (session, reconciler), so the
//! identity-uniqueness and latest-search-wins invariants hold even when
//! request completions race. The provider call itself is awaited without
//! the lock; only the synchronous continuation that applies the result
//! takes it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use geo::Coord;
use thiserror::Error;
use waymark_core::{
    AnnotatedPlace, Completion, Geocoder, PlaceId, PlaceSearch, Reconciler, SearchError,
    SearchRequest, SearchRequestError, SearchSession, ToggleError, Viewport, VisitStore,
    VisitStoreError,
};

/// Default free-text query: the category the original product searched for.
pub const DEFAULT_QUERY: &str = "public library";

/// Default search radius in metres.
pub const DEFAULT_RADIUS_METERS: f64 = 5000.0;

/// Configuration for [`SearchCoordinator`].
#[derive(Debug, Clone)]
pub struct SearchCoordinatorConfig {
    /// Free-text query used by [`SearchCoordinator::search_near`].
    pub query: String,
    /// Search radius in metres used by [`SearchCoordinator::search_near`].
    pub radius_meters: f64,
}

impl Default for SearchCoordinatorConfig {
    fn default() -> Self {
        Self {
            query: DEFAULT_QUERY.to_owned(),
            radius_meters: DEFAULT_RADIUS_METERS,
        }
    }
}

impl SearchCoordinatorConfig {
    /// Set the free-text query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Set the search radius in metres.
    #[must_use]
    pub const fn with_radius_meters(mut self, radius_meters: f64) -> Self {
        self.radius_meters = radius_meters;
        self
    }
}

/// How a completed search affected the known set.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The result was current and has been merged.
    Applied {
        /// The merged, annotated known set in provider order.
        places: Vec<AnnotatedPlace>,
        /// The viewport framing the merged set.
        viewport: Viewport,
    },
    /// A newer search was issued while this one was in flight; its result
    /// was discarded and the known set is unchanged.
    Superseded,
}

/// Receipt for a visited-flag toggle.
///
/// The in-memory flag is always applied; `persistence` reports whether the
/// durable write succeeded. A write failure is observable here but never
/// rolls the flag back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitToggle {
    /// The flag's new value.
    pub visited: bool,
    /// Outcome of the best-effort durable write.
    pub persistence: Result<(), VisitStoreError>,
}

/// Errors from coordinator entry points that validate their own input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinatorError {
    /// The input failed validation before any network call was issued.
    #[error(transparent)]
    InvalidRequest(#[from] SearchRequestError),
    /// The provider call failed; the known set and viewport are unchanged.
    #[error(transparent)]
    Search(#[from] SearchError),
    /// An address was given but no geocoder is configured.
    #[error("no geocoder is configured")]
    GeocoderUnavailable,
}

struct CoordinatorState {
    session: SearchSession,
    reconciler: Reconciler,
}

/// Single-writer orchestrator over provider, visit store, and reconciler.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use geo::Coord;
/// use waymark_data::search::test_support::StubPlaceSearch;
/// use waymark_data::{SearchCoordinator, SearchOutcome};
///
/// # async fn example() -> Result<(), waymark_data::CoordinatorError> {
/// let provider = Arc::new(StubPlaceSearch::with_places(Vec::new()));
/// let coordinator = SearchCoordinator::new(provider);
/// let outcome = coordinator
///     .search_near(Coord { x: -122.4194, y: 37.7749 })
///     .await?;
/// assert!(matches!(outcome, SearchOutcome::Applied { .. }));
/// # Ok(())
/// # }
/// ```
pub struct SearchCoordinator {
    provider: Arc<dyn PlaceSearch>,
    geocoder: Option<Arc<dyn Geocoder>>,
    visits: Option<Arc<dyn VisitStore>>,
    config: SearchCoordinatorConfig,
    state: Mutex<CoordinatorState>,
}

impl std::fmt::Debug for SearchCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchCoordinator")
            .field("config", &self.config)
            .field("geocoder", &self.geocoder.is_some())
            .field("visits", &self.visits.is_some())
            .finish_non_exhaustive()
    }
}

impl SearchCoordinator {
    /// Create a coordinator over the given provider with default
    /// configuration, no geocoder, and no visit store.
    #[must_use]
    pub fn new(provider: Arc<dyn PlaceSearch>) -> Self {
        Self {
            provider,
            geocoder: None,
            visits: None,
            config: SearchCoordinatorConfig::default(),
            state: Mutex::new(CoordinatorState {
                session: SearchSession::default(),
                reconciler: Reconciler::default(),
            }),
        }
    }

    /// Attach a geocoder for [`SearchCoordinator::locate`].
    #[must_use]
    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    /// Attach a durable visit store for seeding and toggle persistence.
    #[must_use]
    pub fn with_visit_store(mut self, visits: Arc<dyn VisitStore>) -> Self {
        self.visits = Some(visits);
        self
    }

    /// Replace the default query and radius.
    #[must_use]
    pub fn with_config(mut self, config: SearchCoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    fn lock_state(&self) -> MutexGuard<'_, CoordinatorState> {
        // The critical sections are small and never branch on user code, so
        // a poisoned lock only means a panicking test; keep the data.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Search with the configured query and radius around a centre.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::InvalidRequest`] for an out-of-range
    /// centre (before any network call) and
    /// [`CoordinatorError::Search`] when the provider fails.
    pub async fn search_near(&self, center: Coord<f64>) -> Result<SearchOutcome, CoordinatorError> {
        let request =
            SearchRequest::new(center, self.config.radius_meters, self.config.query.clone())?;
        Ok(self.search(request).await?)
    }

    /// Run a validated search and merge its result if still current.
    ///
    /// The ticket is issued before the provider call; the result is applied
    /// only when no newer search was issued in the meantime. A provider
    /// error leaves the known set and viewport unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] when the provider fails.
    pub async fn search(&self, request: SearchRequest) -> Result<SearchOutcome, SearchError> {
        let ticket = self.lock_state().session.issue();
        let result = self.provider.search(&request).await;
        let mut state = self.lock_state();
        let places = result?;
        if state.session.finish(ticket) == Completion::Superseded {
            return Ok(SearchOutcome::Superseded);
        }
        let merged = match &self.visits {
            Some(store) => state
                .reconciler
                .merge_seeded(places, |id| seed_visited(store.as_ref(), id)),
            None => state.reconciler.merge(places),
        };
        let outcome = SearchOutcome::Applied {
            places: merged.to_vec(),
            viewport: state.reconciler.viewport(),
        };
        Ok(outcome)
    }

    /// Resolve an address to a centre coordinate via the configured
    /// geocoder.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::GeocoderUnavailable`] when no geocoder
    /// is attached, [`CoordinatorError::InvalidRequest`] for a blank
    /// address, and [`CoordinatorError::Search`] when the geocoder fails.
    pub async fn locate(&self, address: &str) -> Result<Option<Coord<f64>>, CoordinatorError> {
        if address.trim().is_empty() {
            return Err(SearchRequestError::BlankQuery.into());
        }
        let geocoder = self
            .geocoder
            .as_ref()
            .ok_or(CoordinatorError::GeocoderUnavailable)?;
        Ok(geocoder.geocode(address).await?)
    }

    /// Flip the visited flag for a known place and persist it best-effort.
    ///
    /// # Errors
    ///
    /// Returns [`ToggleError::UnknownPlace`] when the identity is not in
    /// the known set; persistence failures are carried in the receipt, not
    /// returned as errors.
    pub fn toggle_visited(&self, id: &PlaceId) -> Result<VisitToggle, ToggleError> {
        let visited = self.lock_state().reconciler.toggle_visited(id)?;
        let persistence = match &self.visits {
            Some(store) => store.set(id, visited),
            None => Ok(()),
        };
        Ok(VisitToggle {
            visited,
            persistence,
        })
    }

    /// Snapshot the known set in the order of the last merge.
    #[must_use]
    pub fn places(&self) -> Vec<AnnotatedPlace> {
        self.lock_state().reconciler.places().to_vec()
    }

    /// The viewport framing the known set.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.lock_state().reconciler.viewport()
    }
}

fn seed_visited(store: &dyn VisitStore, id: &PlaceId) -> bool {
    match store.get(id) {
        Ok(flag) => flag.unwrap_or(false),
        Err(err) => {
            log::warn!("visit store read failed, treating {id} as unvisited: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tokio::sync::Notify;
    use waymark_core::test_support::{FailingVisitStore, MemoryVisitStore, place};

    use crate::search::test_support::StubPlaceSearch;

    fn request_for(query: &str) -> SearchRequest {
        SearchRequest::new(Coord { x: -122.4194, y: 37.7749 }, 5000.0, query)
            .expect("request is valid")
    }

    #[fixture]
    fn libraries() -> Vec<waymark_core::Place> {
        vec![
            place("node/1", "Central Library", 37.7793, -122.4163),
            place("node/2", "Mission Branch", 37.7585, -122.4214),
        ]
    }

    #[tokio::test]
    async fn successful_search_is_applied() {
        let provider = Arc::new(StubPlaceSearch::with_places(vec![place(
            "node/1",
            "Central Library",
            37.7793,
            -122.4163,
        )]));
        let coordinator = SearchCoordinator::new(provider);

        let outcome = coordinator
            .search_near(Coord { x: -122.4194, y: 37.7749 })
            .await
            .expect("search succeeds");

        match outcome {
            SearchOutcome::Applied { places, viewport } => {
                assert_eq!(places.len(), 1);
                assert!(!places[0].visited);
                assert_eq!(viewport, coordinator.viewport());
            }
            SearchOutcome::Superseded => panic!("single search cannot be superseded"),
        }
    }

    #[tokio::test]
    async fn provider_error_leaves_state_unchanged() {
        let provider = Arc::new(StubPlaceSearch::with_places(vec![place(
            "node/1",
            "Central Library",
            37.7793,
            -122.4163,
        )]));
        let coordinator = SearchCoordinator::new(provider);
        coordinator
            .search(request_for("public library"))
            .await
            .expect("first search succeeds");
        let before_places = coordinator.places();
        let before_viewport = coordinator.viewport();

        let failing = Arc::new(StubPlaceSearch::with_error(SearchError::Network {
            url: "stub".to_owned(),
            message: "connection refused".to_owned(),
        }));
        let failing_coordinator = SearchCoordinator::new(failing);
        let err = failing_coordinator
            .search(request_for("public library"))
            .await
            .expect_err("provider failure propagates");
        assert!(matches!(err, SearchError::Network { .. }));

        // The first coordinator keeps its merged state untouched as well.
        assert_eq!(coordinator.places(), before_places);
        assert_eq!(coordinator.viewport(), before_viewport);
    }

    #[tokio::test]
    async fn zero_results_merge_to_an_empty_set_and_keep_the_viewport() {
        let provider = Arc::new(StubPlaceSearch::with_places(Vec::new()));
        let coordinator = SearchCoordinator::new(provider.clone());
        provider.push(Ok(vec![place("node/1", "Central Library", 37.7793, -122.4163)]));

        coordinator
            .search(request_for("public library"))
            .await
            .expect("seeding search succeeds");
        let framed = coordinator.viewport();

        let outcome = coordinator
            .search(request_for("public library"))
            .await
            .expect("empty search succeeds");

        assert_eq!(
            outcome,
            SearchOutcome::Applied {
                places: Vec::new(),
                viewport: framed,
            }
        );
        assert!(coordinator.places().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn stale_response_is_discarded(libraries: Vec<waymark_core::Place>) {
        let gate = Arc::new(Notify::new());
        let provider = Arc::new(StubPlaceSearch::with_places(Vec::new()));
        let slow_result = vec![libraries[0].clone()];
        let fast_result = vec![libraries[1].clone()];
        provider.push_gated(Ok(slow_result), Arc::clone(&gate));
        provider.push(Ok(fast_result.clone()));

        let coordinator = Arc::new(SearchCoordinator::new(provider));

        let slow = tokio::spawn({
            let worker = Arc::clone(&coordinator);
            async move { worker.search(request_for("public library")).await }
        });
        // Let the slow search issue its ticket and park on the gate.
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        let fast = coordinator
            .search(request_for("public library"))
            .await
            .expect("fast search succeeds");
        assert!(matches!(fast, SearchOutcome::Applied { .. }));

        gate.notify_one();
        let stale = slow
            .await
            .expect("slow task joins")
            .expect("slow search succeeds");
        assert_eq!(stale, SearchOutcome::Superseded);

        let ids: Vec<_> = coordinator
            .places()
            .into_iter()
            .map(|entry| entry.place.id)
            .collect();
        assert_eq!(ids, vec![libraries[1].id.clone()]);
    }

    #[rstest]
    #[tokio::test]
    async fn first_observation_seeds_from_the_store(libraries: Vec<waymark_core::Place>) {
        let store = Arc::new(MemoryVisitStore::with_flags([(
            libraries[0].id.clone(),
            true,
        )]));
        let provider = Arc::new(StubPlaceSearch::with_places(libraries.clone()));
        let coordinator = SearchCoordinator::new(provider).with_visit_store(store);

        let outcome = coordinator
            .search(request_for("public library"))
            .await
            .expect("search succeeds");

        match outcome {
            SearchOutcome::Applied { places, .. } => {
                assert!(places[0].visited);
                assert!(!places[1].visited);
            }
            SearchOutcome::Superseded => panic!("single search cannot be superseded"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn failed_seed_read_degrades_to_unvisited(libraries: Vec<waymark_core::Place>) {
        let provider = Arc::new(StubPlaceSearch::with_places(libraries));
        let coordinator =
            SearchCoordinator::new(provider).with_visit_store(Arc::new(FailingVisitStore));

        let outcome = coordinator
            .search(request_for("public library"))
            .await
            .expect("search succeeds despite store failure");

        match outcome {
            SearchOutcome::Applied { places, .. } => {
                assert!(places.iter().all(|entry| !entry.visited));
            }
            SearchOutcome::Superseded => panic!("single search cannot be superseded"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn toggle_persists_to_the_store(libraries: Vec<waymark_core::Place>) {
        let store = Arc::new(MemoryVisitStore::new());
        let provider = Arc::new(StubPlaceSearch::with_places(libraries.clone()));
        let coordinator =
            SearchCoordinator::new(provider).with_visit_store(store.clone());
        coordinator
            .search(request_for("public library"))
            .await
            .expect("search succeeds");

        let receipt = coordinator
            .toggle_visited(&libraries[0].id)
            .expect("place is known");

        assert!(receipt.visited);
        assert_eq!(receipt.persistence, Ok(()));
        assert_eq!(store.snapshot().get(&libraries[0].id), Some(&true));
    }

    #[rstest]
    #[tokio::test]
    async fn toggle_keeps_the_flag_when_the_write_fails(libraries: Vec<waymark_core::Place>) {
        let provider = Arc::new(StubPlaceSearch::with_places(libraries.clone()));
        let coordinator =
            SearchCoordinator::new(provider).with_visit_store(Arc::new(FailingVisitStore));
        coordinator
            .search(request_for("public library"))
            .await
            .expect("search succeeds");

        let receipt = coordinator
            .toggle_visited(&libraries[0].id)
            .expect("place is known");

        assert!(receipt.visited);
        assert!(matches!(
            receipt.persistence,
            Err(VisitStoreError::Write { .. })
        ));
        // The in-memory flag stays applied.
        assert_eq!(
            coordinator
                .places()
                .first()
                .map(|entry| entry.visited),
            Some(true)
        );
    }

    #[tokio::test]
    async fn toggling_an_unknown_identity_is_an_error() {
        let coordinator =
            SearchCoordinator::new(Arc::new(StubPlaceSearch::with_places(Vec::new())));

        let err = coordinator
            .toggle_visited(&PlaceId::new("node/404"))
            .expect_err("nothing is known");

        assert!(matches!(err, ToggleError::UnknownPlace { .. }));
    }

    #[tokio::test]
    async fn out_of_range_centre_fails_before_any_call() {
        let coordinator =
            SearchCoordinator::new(Arc::new(StubPlaceSearch::with_places(Vec::new())));

        let err = coordinator
            .search_near(Coord { x: 0.0, y: 97.0 })
            .await
            .expect_err("latitude is out of range");

        assert!(matches!(err, CoordinatorError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn locate_requires_a_geocoder() {
        let coordinator =
            SearchCoordinator::new(Arc::new(StubPlaceSearch::with_places(Vec::new())));

        let err = coordinator
            .locate("100 Larkin St")
            .await
            .expect_err("no geocoder attached");

        assert_eq!(err, CoordinatorError::GeocoderUnavailable);
    }

    #[tokio::test]
    async fn locate_rejects_a_blank_address() {
        let geocoder = Arc::new(crate::search::test_support::StubGeocoder::with_no_match());
        let coordinator =
            SearchCoordinator::new(Arc::new(StubPlaceSearch::with_places(Vec::new())))
                .with_geocoder(geocoder);

        let err = coordinator
            .locate("   ")
            .await
            .expect_err("blank address fails fast");

        assert_eq!(
            err,
            CoordinatorError::InvalidRequest(SearchRequestError::BlankQuery)
        );
    }
}
