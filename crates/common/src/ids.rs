// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The primary key of a row in the `minima` table.
///
/// A minimum only has a `MinimumId` once the session that staged it has
/// committed. Before that it is identified by its 1-based ordinal within the
/// summary file it was read from, which is meaningful during a single import
/// only.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct MinimumId(pub i64);

/// The primary key of a row in the `transition_states` table.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct TransitionStateId(pub i64);

impl fmt::Display for MinimumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "min#{}", self.0)
    }
}
