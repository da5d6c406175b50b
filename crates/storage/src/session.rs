// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use common::{Minimum, MinimumHandle, MinimumId, TransitionState};
use log::{debug, trace};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::rc::Rc;

use crate::blob::as_blob;
use crate::error::{Result, StoreError};
use crate::schema::{INSERT_MINIMUM, INSERT_TRANSITION_STATE};

/// Something that can be staged for writing.
#[derive(Clone, Debug)]
pub enum Entity {
    Minimum(MinimumHandle),
    TransitionState(TransitionState),
}

impl From<MinimumHandle> for Entity {
    fn from(minimum: MinimumHandle) -> Self {
        Entity::Minimum(minimum)
    }
}

impl From<TransitionState> for Entity {
    fn from(ts: TransitionState) -> Self {
        Entity::TransitionState(ts)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing staged since the last commit.
    Idle,
    /// At least one entity is waiting for [`Session::commit`].
    Staging,
}

/// What a successful [`Session::commit`] wrote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub minima: usize,
    pub transition_states: usize,
}

impl CommitSummary {
    pub fn is_empty(&self) -> bool {
        self.minima == 0 && self.transition_states == 0
    }
}

/// A unit of work against a [`Database`](crate::Database).
///
/// Staged entities are only buffered. [`Session::commit`] writes the whole
/// buffer in one transaction, so either all of it becomes durable or none of
/// it does.
pub struct Session<'db> {
    conn: &'db mut Connection,
    staged: Vec<Entity>,
}

impl<'db> Session<'db> {
    pub(crate) fn new(conn: &'db mut Connection) -> Self {
        Self {
            conn,
            staged: Vec::new(),
        }
    }

    /// Buffers `entity` for the next commit.
    ///
    /// A minimum handle is written once. Staging one that is already durable,
    /// or staging the same handle twice, makes the commit fail with
    /// [`StoreError::DuplicateMinimum`].
    pub fn stage(&mut self, entity: impl Into<Entity>) {
        self.staged.push(entity.into());
    }

    /// Number of entities waiting to be committed.
    pub fn staged(&self) -> usize {
        self.staged.len()
    }

    pub fn state(&self) -> SessionState {
        if self.staged.is_empty() {
            SessionState::Idle
        } else {
            SessionState::Staging
        }
    }

    /// Writes everything staged since the last commit in staging order.
    ///
    /// Minima get their store id once the transaction is committed. A
    /// transition state may point at a minimum staged earlier in the same
    /// batch. On error the transaction is rolled back and the buffer is
    /// dropped; no minimum receives an id.
    pub fn commit(&mut self) -> Result<CommitSummary> {
        if self.staged.is_empty() {
            return Ok(CommitSummary::default());
        }

        let staged = std::mem::take(&mut self.staged);
        debug!("Committing {} staged entities", staged.len());

        let mut summary = CommitSummary::default();
        let mut assigned: HashMap<*const Minimum, MinimumId> = HashMap::new();

        let tx = self.conn.transaction()?;
        {
            let mut insert_minimum = tx.prepare_cached(INSERT_MINIMUM)?;
            let mut insert_transition_state = tx.prepare_cached(INSERT_TRANSITION_STATE)?;

            for (position, entity) in staged.iter().enumerate() {
                match entity {
                    Entity::Minimum(minimum) => {
                        if minimum.is_durable() || assigned.contains_key(&Rc::as_ptr(minimum)) {
                            return Err(StoreError::DuplicateMinimum { position });
                        }
                        let meta = minimum.metadata();
                        let rowid = insert_minimum.insert(params![
                            minimum.energy(),
                            as_blob(minimum.coords()),
                            meta.frequency,
                            meta.pgorder,
                            meta.inertia[0],
                            meta.inertia[1],
                            meta.inertia[2],
                        ])?;
                        trace!("minimum {} -> {}", position, rowid);
                        assigned.insert(Rc::as_ptr(minimum), MinimumId(rowid));
                        summary.minima += 1;
                    }
                    Entity::TransitionState(ts) => {
                        let endpoint = |minimum: &MinimumHandle| {
                            minimum
                                .id()
                                .or_else(|| assigned.get(&Rc::as_ptr(minimum)).copied())
                                .ok_or(StoreError::UnresolvedEndpoint { position })
                        };
                        let minimum1 = endpoint(ts.minimum1())?;
                        let minimum2 = endpoint(ts.minimum2())?;

                        let meta = ts.metadata();
                        insert_transition_state.execute(params![
                            ts.energy(),
                            as_blob(ts.coords()),
                            meta.frequency,
                            meta.pgorder,
                            meta.inertia[0],
                            meta.inertia[1],
                            meta.inertia[2],
                            minimum1.0,
                            minimum2.0,
                        ])?;
                        summary.transition_states += 1;
                    }
                }
            }
        }
        tx.commit()?;

        for entity in &staged {
            if let Entity::Minimum(minimum) = entity {
                if let Some(&id) = assigned.get(&Rc::as_ptr(minimum)) {
                    let fresh = minimum.assign_id(id);
                    debug_assert!(fresh, "minimum {} was assigned twice", id);
                }
            }
        }

        Ok(summary)
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        if !self.staged.is_empty() {
            debug!(
                "Session dropped with {} uncommitted entities",
                self.staged.len()
            );
        }
    }
}
