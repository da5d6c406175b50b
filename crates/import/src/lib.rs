// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Readers and builders for landscape datasets as written by the
//! pathway-sampling tools: two summary files (`min.data`, `ts.data`) and two
//! coordinate files (`extractedmin`, `extractedts`).
//!
//! Nothing here touches the store. Readers turn text into records, the
//! builder turns records and coordinate blocks into [`common::Minimum`] and
//! [`common::TransitionState`] values, resolving transition-state endpoints
//! through a [`MinimaIndex`].

pub mod builder;
pub mod coords;
mod error;
pub mod records;

pub use builder::{build_minimum, build_transition_state, LookupError, MinimaIndex};
pub use coords::CoordinateReader;
pub use error::ImportError;
pub use records::{MinimumRecord, RecordError, SummaryReader, TransitionStateRecord};
