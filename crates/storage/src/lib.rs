// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! SQLite persistence for landscape databases.
//!
//! A [`Database`] owns the connection and answers queries. Imports go
//! through a [`Session`], which buffers minima and transition states and
//! writes them in a single transaction on [`Session::commit`].
//!
//! Building with the `sqlite-tracing` feature sends every statement SQLite
//! executes to the `landscape_storage::sql` log target at trace level.

mod blob;
mod database;
mod error;
mod schema;
mod session;

pub use database::{Database, StoredMinimum, StoredTransitionState};
pub use error::{Result, StoreError};
pub use session::{CommitSummary, Entity, Session, SessionState};
