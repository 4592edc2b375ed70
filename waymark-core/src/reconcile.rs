//! Known-set reconciliation preserving visited annotations.
//!
//! The [`Reconciler`] owns the known place set: the mapping from place
//! identity to (attributes, visited flag) produced by the last merge. Two
//! invariants hold at all times: the set never contains two entries with one
//! identity, and a visited flag set for an identity survives every merge
//! that re-observes it.

use std::collections::HashMap;

use thiserror::Error;

use crate::{AnnotatedPlace, Place, PlaceId, Viewport};

/// Errors returned by [`Reconciler::toggle_visited`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToggleError {
    /// The identity is not in the known set.
    #[error("no known place with identity {id}")]
    UnknownPlace {
        /// The identity that was not found.
        id: PlaceId,
    },
}

/// Merges fresh search results into the known set and derives the viewport.
///
/// A merge replaces the working set with exactly the identities in the new
/// results: re-observed identities keep their visited flag while their
/// attributes refresh, unseen identities enter unvisited, and identities
/// absent from the input are dropped. The viewport is recomputed from the
/// merged set; an empty merge leaves it unchanged rather than framing a
/// degenerate region.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waymark_core::{Place, PlaceId, Reconciler};
///
/// let mut reconciler = Reconciler::new();
/// let library = Place::new(
///     PlaceId::new("node/1"),
///     "Central Library",
///     Coord { x: -122.4, y: 37.8 },
///     "100 Larkin St",
/// );
/// reconciler.merge(vec![library.clone()]);
/// reconciler.toggle_visited(&library.id)?;
///
/// // A repeat search re-observes the identity; the flag carries over.
/// let merged = reconciler.merge(vec![library.clone()]);
/// assert!(merged[0].visited);
/// # Ok::<(), waymark_core::ToggleError>(())
/// ```
#[derive(Debug, Default)]
pub struct Reconciler {
    entries: Vec<AnnotatedPlace>,
    index: HashMap<PlaceId, usize>,
    viewport: Viewport,
}

impl Reconciler {
    /// Create a reconciler with an empty known set and the default viewport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reconciler starting from the given viewport.
    #[must_use]
    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Merge fresh results into the known set, defaulting unseen identities
    /// to unvisited.
    pub fn merge(&mut self, results: Vec<Place>) -> &[AnnotatedPlace] {
        self.merge_seeded(results, |_| false)
    }

    /// Merge fresh results, seeding unseen identities from `seed`.
    ///
    /// `seed` is the persistence read hook: on first observation of an
    /// identity the caller may consult a durable store for a previously
    /// saved flag. Identities already in the known set keep their in-memory
    /// flag and never consult the seed. Within one result list the first
    /// occurrence of an identity wins; later duplicates are dropped.
    pub fn merge_seeded<F>(&mut self, results: Vec<Place>, mut seed: F) -> &[AnnotatedPlace]
    where
        F: FnMut(&PlaceId) -> bool,
    {
        let mut entries = Vec::with_capacity(results.len());
        let mut index = HashMap::with_capacity(results.len());
        for place in results {
            if index.contains_key(&place.id) {
                continue;
            }
            let visited = self
                .index
                .get(&place.id)
                .and_then(|&at| self.entries.get(at))
                .map_or_else(|| seed(&place.id), |entry| entry.visited);
            index.insert(place.id.clone(), entries.len());
            entries.push(AnnotatedPlace { place, visited });
        }

        self.entries = entries;
        self.index = index;
        if let Some(viewport) = Viewport::frame(self.entries.iter().map(|e| e.place.location)) {
            self.viewport = viewport;
        }
        &self.entries
    }

    /// Flip the visited flag for an identity, returning the new value.
    ///
    /// The in-memory mutation is immediate; durable persistence is the
    /// caller's concern.
    ///
    /// # Errors
    ///
    /// Returns [`ToggleError::UnknownPlace`] when the identity is not in the
    /// known set.
    pub fn toggle_visited(&mut self, id: &PlaceId) -> Result<bool, ToggleError> {
        let entry = self
            .index
            .get(id)
            .and_then(|&at| self.entries.get_mut(at))
            .ok_or_else(|| ToggleError::UnknownPlace { id: id.clone() })?;
        entry.visited = !entry.visited;
        Ok(entry.visited)
    }

    /// The known set in the order of the last merge.
    #[must_use]
    pub fn places(&self) -> &[AnnotatedPlace] {
        &self.entries
    }

    /// The viewport framing the known set (or the last non-empty one).
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The visited flag for an identity, or `None` when unknown.
    #[must_use]
    pub fn is_visited(&self, id: &PlaceId) -> Option<bool> {
        self.index
            .get(id)
            .and_then(|&at| self.entries.get(at))
            .map(|entry| entry.visited)
    }

    /// Number of places in the known set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the known set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
