//! Durable visited-flag storage keyed by place identity.
//!
//! The visited flag is soft local state: the known set caches it, the store
//! makes it durable. The store is read on first observation of an identity
//! and written on every toggle. There is no schema beyond one boolean per
//! identity.

use thiserror::Error;

use crate::PlaceId;

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteVisitStore, SqliteVisitStoreError};

/// Errors from [`VisitStore`] operations.
///
/// Write failures are non-fatal by design: the in-memory flag stays applied
/// and the failure is surfaced to the caller rather than rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisitStoreError {
    /// Reading a stored flag failed.
    #[error("failed to read visited flag for {id}: {message}")]
    Read {
        /// Identity whose flag was requested.
        id: PlaceId,
        /// Backend-specific detail.
        message: String,
    },
    /// Writing a flag failed.
    #[error("failed to write visited flag for {id}: {message}")]
    Write {
        /// Identity whose flag was being stored.
        id: PlaceId,
        /// Backend-specific detail.
        message: String,
    },
}

/// Durable key-value storage for visited flags.
///
/// Implementations must be safe to share across threads; the coordinator
/// calls them from async task context, so operations should be fast and
/// must not block indefinitely.
pub trait VisitStore: Send + Sync {
    /// Fetch the stored flag for an identity, `None` when never stored.
    ///
    /// # Errors
    ///
    /// Returns [`VisitStoreError::Read`] when the backend fails.
    fn get(&self, id: &PlaceId) -> Result<Option<bool>, VisitStoreError>;

    /// Durably store the flag for an identity.
    ///
    /// # Errors
    ///
    /// Returns [`VisitStoreError::Write`] when the backend fails.
    fn set(&self, id: &PlaceId, visited: bool) -> Result<(), VisitStoreError>;
}
