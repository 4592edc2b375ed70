//! SQLite-backed visit store.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Mutex,
};

use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use super::{VisitStore, VisitStoreError};
use crate::PlaceId;

/// Error raised when opening or initialising the visits database.
#[derive(Debug, Error)]
pub enum SqliteVisitStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open visits database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating the visits table failed.
    #[error("failed to initialise visits schema at {path}: {source}")]
    Schema {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
}

/// Visit store backed by a single-table SQLite database.
///
/// The schema is one row per identity:
/// `visits(place_id TEXT PRIMARY KEY, visited INTEGER NOT NULL)`. The
/// connection sits behind a mutex so the store can be shared across
/// threads; operations are single-row lookups and upserts, so contention
/// stays brief.
pub struct SqliteVisitStore {
    connection: Mutex<Connection>,
}

impl fmt::Debug for SqliteVisitStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteVisitStore").finish_non_exhaustive()
    }
}

impl SqliteVisitStore {
    /// Open (creating if necessary) the visits database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteVisitStoreError`] when the database cannot be opened
    /// or the schema cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SqliteVisitStoreError> {
        let db_path = path.as_ref();
        let connection =
            Connection::open(db_path).map_err(|source| SqliteVisitStoreError::OpenDatabase {
                path: db_path.to_path_buf(),
                source,
            })?;
        connection
            .execute(
                "CREATE TABLE IF NOT EXISTS visits (
                    place_id TEXT PRIMARY KEY,
                    visited INTEGER NOT NULL
                )",
                [],
            )
            .map_err(|source| SqliteVisitStoreError::Schema {
                path: db_path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn lock_read(&self, id: &PlaceId) -> Result<std::sync::MutexGuard<'_, Connection>, VisitStoreError> {
        self.connection
            .lock()
            .map_err(|_| VisitStoreError::Read {
                id: id.clone(),
                message: "visits connection mutex poisoned".to_owned(),
            })
    }

    fn lock_write(&self, id: &PlaceId) -> Result<std::sync::MutexGuard<'_, Connection>, VisitStoreError> {
        self.connection
            .lock()
            .map_err(|_| VisitStoreError::Write {
                id: id.clone(),
                message: "visits connection mutex poisoned".to_owned(),
            })
    }
}

impl VisitStore for SqliteVisitStore {
    fn get(&self, id: &PlaceId) -> Result<Option<bool>, VisitStoreError> {
        let connection = self.lock_read(id)?;
        connection
            .query_row(
                "SELECT visited FROM visits WHERE place_id = ?1",
                params![id.as_str()],
                |row| row.get::<_, bool>(0),
            )
            .optional()
            .map_err(|source| VisitStoreError::Read {
                id: id.clone(),
                message: source.to_string(),
            })
    }

    fn set(&self, id: &PlaceId, visited: bool) -> Result<(), VisitStoreError> {
        let connection = self.lock_write(id)?;
        connection
            .execute(
                "INSERT INTO visits (place_id, visited) VALUES (?1, ?2)
                 ON CONFLICT(place_id) DO UPDATE SET visited = excluded.visited",
                params![id.as_str(), visited],
            )
            .map_err(|source| VisitStoreError::Write {
                id: id.clone(),
                message: source.to_string(),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[fixture]
    fn temp_db() -> (TempDir, PathBuf) {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("visits.db");
        (dir, path)
    }

    #[rstest]
    fn unknown_identity_reads_as_none(#[from(temp_db)] (_dir, path): (TempDir, PathBuf)) {
        let store = SqliteVisitStore::open(&path).expect("open store");
        let flag = store.get(&PlaceId::new("node/404")).expect("read flag");
        assert_eq!(flag, None);
    }

    #[rstest]
    fn flags_round_trip(#[from(temp_db)] (_dir, path): (TempDir, PathBuf)) {
        let store = SqliteVisitStore::open(&path).expect("open store");
        let id = PlaceId::new("node/1");

        store.set(&id, true).expect("write flag");
        assert_eq!(store.get(&id).expect("read flag"), Some(true));

        store.set(&id, false).expect("overwrite flag");
        assert_eq!(store.get(&id).expect("read flag"), Some(false));
    }

    #[rstest]
    fn flags_survive_a_reopen(#[from(temp_db)] (_dir, path): (TempDir, PathBuf)) {
        let id = PlaceId::new("node/1");
        {
            let store = SqliteVisitStore::open(&path).expect("open store");
            store.set(&id, true).expect("write flag");
        }

        let reopened = SqliteVisitStore::open(&path).expect("reopen store");
        assert_eq!(reopened.get(&id).expect("read flag"), Some(true));
    }

    #[rstest]
    fn open_fails_for_an_unusable_path(#[from(temp_db)] (_dir, path): (TempDir, PathBuf)) {
        std::fs::create_dir(&path).expect("occupy the path with a directory");

        let error = SqliteVisitStore::open(&path).expect_err("directory is not a database");
        assert!(matches!(
            error,
            SqliteVisitStoreError::OpenDatabase { .. }
        ));
    }
}
