// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Data model shared by the landscape crates: the minima and transition
//! states of a potential-energy landscape, and the identifiers the store
//! assigns to them.

pub mod ids;
mod point;

pub use ids::{MinimumId, TransitionStateId};
pub use point::{Minimum, MinimumHandle, PointMetadata, TransitionState};
