//! Test-only helpers: in-memory and failing visit stores plus place
//! fixtures, shared by unit and behaviour tests.

use std::collections::HashMap;
use std::sync::Mutex;

use geo::Coord;

use crate::{Place, PlaceId, VisitStore, VisitStoreError};

/// Build a place fixture from an identity, name, and latitude/longitude.
#[must_use]
pub fn place(id: &str, name: &str, latitude: f64, longitude: f64) -> Place {
    Place::new(
        PlaceId::new(id),
        name,
        Coord {
            x: longitude,
            y: latitude,
        },
        format!("{name} address"),
    )
}

/// In-memory `VisitStore` used in tests.
#[derive(Debug, Default)]
pub struct MemoryVisitStore {
    flags: Mutex<HashMap<PlaceId, bool>>,
}

impl MemoryVisitStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with flags.
    #[must_use]
    pub fn with_flags<I>(flags: I) -> Self
    where
        I: IntoIterator<Item = (PlaceId, bool)>,
    {
        Self {
            flags: Mutex::new(flags.into_iter().collect()),
        }
    }

    /// Snapshot the stored flags.
    ///
    /// # Panics
    ///
    /// Panics when the interior mutex is poisoned; acceptable in tests.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<PlaceId, bool> {
        self.flags.lock().expect("visit store mutex").clone()
    }
}

impl VisitStore for MemoryVisitStore {
    fn get(&self, id: &PlaceId) -> Result<Option<bool>, VisitStoreError> {
        let flags = self.flags.lock().map_err(|_| VisitStoreError::Read {
            id: id.clone(),
            message: "memory store mutex poisoned".to_owned(),
        })?;
        Ok(flags.get(id).copied())
    }

    fn set(&self, id: &PlaceId, visited: bool) -> Result<(), VisitStoreError> {
        let mut flags = self.flags.lock().map_err(|_| VisitStoreError::Write {
            id: id.clone(),
            message: "memory store mutex poisoned".to_owned(),
        })?;
        flags.insert(id.clone(), visited);
        Ok(())
    }
}

/// `VisitStore` whose every operation fails, for error-path tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingVisitStore;

impl VisitStore for FailingVisitStore {
    fn get(&self, id: &PlaceId) -> Result<Option<bool>, VisitStoreError> {
        Err(VisitStoreError::Read {
            id: id.clone(),
            message: "store unavailable".to_owned(),
        })
    }

    fn set(&self, id: &PlaceId, _visited: bool) -> Result<(), VisitStoreError> {
        Err(VisitStoreError::Write {
            id: id.clone(),
            message: "store unavailable".to_owned(),
        })
    }
}
