// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Loads the minima and transition states of a potential-energy landscape
//! from the flat files written by pathway-sampling runs into a SQLite
//! database.
//!
//! The work is split across the workspace: `landscape-import` reads and
//! parses the files, `landscape-storage` owns the database, and this crate's
//! [`driver`] runs the two import phases in order.

pub mod driver;
mod error;
pub mod timing;

pub use driver::{import, run, ImportReport};
pub use error::{Error, ErrorKind, Result};
