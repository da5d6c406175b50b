// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use common::{MinimumId, PointMetadata, TransitionStateId};
use log::{info, warn};
use rusqlite::{Connection, OptionalExtension, Row};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::blob::CoordinateBlob;
use crate::error::{Result, StoreError};
use crate::schema::{self, MINIMUM_COLUMNS, TRANSITION_STATE_COLUMNS};
use crate::session::Session;

/// A minimum as stored in the `minima` table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StoredMinimum {
    pub id: MinimumId,
    pub energy: f64,
    pub coords: Vec<f64>,
    pub metadata: PointMetadata,
}

/// A transition state as stored in the `transition_states` table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StoredTransitionState {
    pub id: TransitionStateId,
    pub energy: f64,
    pub coords: Vec<f64>,
    pub metadata: PointMetadata,
    pub minimum1: MinimumId,
    pub minimum2: MinimumId,
}

/// A landscape database backed by SQLite.
///
/// Opening a database creates the schema when it is missing. Writes go
/// through a [`Session`]; everything else on this type only reads.
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Opens the database at `path`, creating the file and its parent
    /// directories if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
                    path: dir.to_owned(),
                    source,
                })?;
                info!("Created store directory {}", dir.display());
            }
        }

        let conn = Connection::open(path)?;
        Self::with_connection(conn, Some(path.to_owned()))
    }

    /// Opens an existing database; a missing file is an error rather than
    /// a new empty store.
    pub fn open_existing(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StoreError::Missing(path.to_owned()));
        }
        Self::open(path)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, None)
    }

    #[allow(unused_mut)]
    fn with_connection(mut conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        #[cfg(feature = "sqlite-tracing")]
        conn.trace(Some(trace_sql));

        schema::create(&conn)?;
        Ok(Self { conn, path })
    }

    /// Location on disk, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Starts a new unit of work. Nothing is written until
    /// [`Session::commit`].
    pub fn session(&mut self) -> Session<'_> {
        Session::new(&mut self.conn)
    }

    pub fn number_of_minima(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM minima")
    }

    pub fn number_of_transition_states(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM transition_states")
    }

    /// All minima, lowest energy first.
    pub fn minima(&self) -> Result<Vec<StoredMinimum>> {
        let sql = format!("SELECT {MINIMUM_COLUMNS} FROM minima ORDER BY energy, id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], read_minimum)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    /// The `count` lowest-energy minima.
    pub fn lowest_minima(&self, count: usize) -> Result<Vec<StoredMinimum>> {
        let sql = format!("SELECT {MINIMUM_COLUMNS} FROM minima ORDER BY energy, id LIMIT ?");
        let limit = i64::try_from(count).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([limit], read_minimum)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn get_minimum(&self, id: MinimumId) -> Result<Option<StoredMinimum>> {
        let sql = format!("SELECT {MINIMUM_COLUMNS} FROM minima WHERE id = ?");
        Ok(self
            .conn
            .query_row(&sql, [id.0], read_minimum)
            .optional()?)
    }

    /// All transition states in insertion order.
    pub fn transition_states(&self) -> Result<Vec<StoredTransitionState>> {
        let sql = format!("SELECT {TRANSITION_STATE_COLUMNS} FROM transition_states ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], read_transition_state)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn get_transition_state(
        &self,
        id: TransitionStateId,
    ) -> Result<Option<StoredTransitionState>> {
        let sql = format!("SELECT {TRANSITION_STATE_COLUMNS} FROM transition_states WHERE id = ?");
        Ok(self
            .conn
            .query_row(&sql, [id.0], read_transition_state)
            .optional()?)
    }

    /// Transition states with `minimum` at either end.
    pub fn transition_states_of(
        &self,
        minimum: MinimumId,
    ) -> Result<Vec<StoredTransitionState>> {
        let sql = format!(
            "SELECT {TRANSITION_STATE_COLUMNS} FROM transition_states \
             WHERE minimum1 = ?1 OR minimum2 = ?1 ORDER BY id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([minimum.0], read_transition_state)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    fn count(&self, sql: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        match usize::try_from(count) {
            Ok(count) => Ok(count),
            Err(_) => {
                warn!("Negative row count {} from \"{}\"", count, sql);
                Ok(0)
            }
        }
    }
}

fn read_metadata(row: &Row<'_>, first: usize) -> rusqlite::Result<PointMetadata> {
    Ok(PointMetadata {
        frequency: row.get(first)?,
        pgorder: row.get(first + 1)?,
        inertia: [row.get(first + 2)?, row.get(first + 3)?, row.get(first + 4)?],
    })
}

fn read_minimum(row: &Row<'_>) -> rusqlite::Result<StoredMinimum> {
    let CoordinateBlob(coords) = row.get(2)?;
    Ok(StoredMinimum {
        id: MinimumId(row.get(0)?),
        energy: row.get(1)?,
        coords,
        metadata: read_metadata(row, 3)?,
    })
}

fn read_transition_state(row: &Row<'_>) -> rusqlite::Result<StoredTransitionState> {
    let CoordinateBlob(coords) = row.get(2)?;
    Ok(StoredTransitionState {
        id: TransitionStateId(row.get(0)?),
        energy: row.get(1)?,
        coords,
        metadata: read_metadata(row, 3)?,
        minimum1: MinimumId(row.get(8)?),
        minimum2: MinimumId(row.get(9)?),
    })
}

#[cfg(feature = "sqlite-tracing")]
fn trace_sql(sql: &str) {
    log::trace!(target: "landscape_storage::sql", "{}", sql);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;
    use common::{Minimum, MinimumHandle, TransitionState};
    use std::rc::Rc;

    fn minimum(energy: f64) -> MinimumHandle {
        Rc::new(Minimum::new(energy, vec![energy; 6]))
    }

    #[test]
    fn empty_commit_is_a_no_op() {
        let mut db = Database::open_in_memory().unwrap();
        let summary = db.session().commit().unwrap();
        assert!(summary.is_empty());
        assert_eq!(db.number_of_minima().unwrap(), 0);
        assert_eq!(db.number_of_transition_states().unwrap(), 0);
    }

    #[test]
    fn staging_is_not_visible_until_commit() {
        let mut db = Database::open_in_memory().unwrap();
        let a = minimum(-10.5);
        {
            let mut session = db.session();
            assert_eq!(session.state(), SessionState::Idle);
            session.stage(Rc::clone(&a));
            assert_eq!(session.state(), SessionState::Staging);
            assert_eq!(session.staged(), 1);
        }
        assert_eq!(db.number_of_minima().unwrap(), 0);
        assert!(!a.is_durable());
    }

    #[test]
    fn commit_assigns_ids_and_returns_to_idle() {
        let mut db = Database::open_in_memory().unwrap();
        let (a, b) = (minimum(-10.5), minimum(-9.8));

        let mut session = db.session();
        session.stage(Rc::clone(&a));
        session.stage(Rc::clone(&b));
        let summary = session.commit().unwrap();
        assert_eq!(summary.minima, 2);
        assert_eq!(session.state(), SessionState::Idle);

        session.stage(TransitionState::new(-9.0, vec![0.0; 6], Rc::clone(&a), Rc::clone(&b)));
        assert_eq!(session.commit().unwrap().transition_states, 1);
        drop(session);

        assert_eq!(a.id(), Some(MinimumId(1)));
        assert_eq!(b.id(), Some(MinimumId(2)));

        let ts = db.get_transition_state(TransitionStateId(1)).unwrap().unwrap();
        assert_eq!((ts.minimum1, ts.minimum2), (MinimumId(1), MinimumId(2)));
        assert_eq!(db.transition_states_of(MinimumId(2)).unwrap().len(), 1);
        assert!(db.get_transition_state(TransitionStateId(2)).unwrap().is_none());
    }

    #[test]
    fn endpoints_may_be_staged_in_the_same_batch() {
        let mut db = Database::open_in_memory().unwrap();
        let (a, b) = (minimum(-1.0), minimum(-2.0));

        let mut session = db.session();
        session.stage(Rc::clone(&a));
        session.stage(Rc::clone(&b));
        session.stage(TransitionState::new(0.0, vec![0.0; 6], Rc::clone(&b), Rc::clone(&a)));
        let summary = session.commit().unwrap();
        drop(session);

        assert_eq!((summary.minima, summary.transition_states), (2, 1));
        let stored = db.transition_states().unwrap();
        let ts = &stored[0];
        assert_eq!(Some(ts.minimum1), b.id());
        assert_eq!(Some(ts.minimum2), a.id());
    }

    #[test]
    fn failed_commit_writes_nothing() {
        let mut db = Database::open_in_memory().unwrap();
        let (a, orphan) = (minimum(-1.0), minimum(-2.0));

        let mut session = db.session();
        session.stage(Rc::clone(&a));
        session.stage(TransitionState::new(0.0, vec![], Rc::clone(&a), Rc::clone(&orphan)));
        let err = session.commit().unwrap_err();
        assert!(matches!(err, StoreError::UnresolvedEndpoint { position: 1 }));
        assert_eq!(session.state(), SessionState::Idle);
        drop(session);

        assert_eq!(db.number_of_minima().unwrap(), 0);
        assert!(!a.is_durable());
    }

    #[test]
    fn minimum_is_written_only_once() {
        let mut db = Database::open_in_memory().unwrap();
        let a = minimum(-1.0);

        let mut session = db.session();
        session.stage(Rc::clone(&a));
        session.commit().unwrap();

        session.stage(minimum(-2.0));
        session.stage(Rc::clone(&a));
        assert!(matches!(
            session.commit(),
            Err(StoreError::DuplicateMinimum { position: 1 })
        ));

        let b = minimum(-3.0);
        session.stage(Rc::clone(&b));
        session.stage(Rc::clone(&b));
        assert!(matches!(
            session.commit(),
            Err(StoreError::DuplicateMinimum { position: 1 })
        ));
        drop(session);

        assert_eq!(db.number_of_minima().unwrap(), 1);
        assert_eq!(a.id(), Some(MinimumId(1)));
        assert!(!b.is_durable());
    }

    #[test]
    fn minima_are_ordered_by_energy() {
        let mut db = Database::open_in_memory().unwrap();
        let mut session = db.session();
        for energy in [-3.0, -5.0, -4.0] {
            session.stage(minimum(energy));
        }
        session.commit().unwrap();
        drop(session);

        let energies: Vec<f64> = db.minima().unwrap().iter().map(|m| m.energy).collect();
        assert_eq!(energies, vec![-5.0, -4.0, -3.0]);

        let lowest = db.lowest_minima(1).unwrap();
        assert_eq!(lowest.len(), 1);
        assert_eq!(lowest[0].id, MinimumId(2));
        assert_eq!(lowest[0].coords, vec![-5.0; 6]);

        assert!(db.get_minimum(MinimumId(7)).unwrap().is_none());
    }

    #[test]
    fn metadata_round_trips() {
        let mut db = Database::open_in_memory().unwrap();
        let metadata = PointMetadata {
            frequency: 123.5,
            pgorder: 2,
            inertia: [1.0, 2.0, 3.0],
        };
        let mut session = db.session();
        session.stage(Rc::new(Minimum::with_metadata(-1.0, vec![0.5; 3], metadata)));
        session.commit().unwrap();
        drop(session);

        let stored = db.get_minimum(MinimumId(1)).unwrap().unwrap();
        assert_eq!(stored.metadata, metadata);
    }

    #[test]
    fn open_creates_directories_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.sqlite");

        assert!(matches!(
            Database::open_existing(&path),
            Err(StoreError::Missing(_))
        ));

        let mut db = Database::open(&path).unwrap();
        let mut session = db.session();
        session.stage(minimum(-1.0));
        session.commit().unwrap();
        drop(session);
        drop(db);

        let db = Database::open_existing(&path).unwrap();
        assert_eq!(db.path(), Some(path.as_path()));
        assert_eq!(db.number_of_minima().unwrap(), 1);
    }
}
