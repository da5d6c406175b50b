// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use common::{Minimum, MinimumHandle, TransitionState};
use std::rc::Rc;
use thiserror::Error;

use crate::records::{MinimumRecord, TransitionStateRecord};

/// A transition state named a minimum ordinal that was never indexed.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("unknown minimum ordinal {ordinal} ({known} minima indexed)")]
pub struct LookupError {
    pub ordinal: i64,
    pub known: usize,
}

/// Minima of the current import, keyed by their 1-based ordinal in the
/// minima summary file.
///
/// Ordinals are dense, so the index is an arena: ordinal `n` lives in slot
/// `n - 1`. Nothing is ever removed.
#[derive(Debug, Default)]
pub struct MinimaIndex {
    minima: Vec<MinimumHandle>,
}

impl MinimaIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `minimum` and returns the ordinal it was filed under.
    pub fn insert(&mut self, minimum: MinimumHandle) -> usize {
        self.minima.push(minimum);
        self.minima.len()
    }

    pub fn get(&self, ordinal: usize) -> Option<&MinimumHandle> {
        ordinal.checked_sub(1).and_then(|slot| self.minima.get(slot))
    }

    /// Looks up an ordinal as written in a summary file. Zero, negative and
    /// too large ordinals are all unknown.
    pub fn resolve(&self, ordinal: i64) -> Result<MinimumHandle, LookupError> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|ordinal| self.get(ordinal))
            .cloned()
            .ok_or(LookupError {
                ordinal,
                known: self.minima.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.minima.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minima.is_empty()
    }

    /// `(ordinal, minimum)` pairs in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &MinimumHandle)> {
        self.minima
            .iter()
            .enumerate()
            .map(|(slot, minimum)| (slot + 1, minimum))
    }
}

pub fn build_minimum(record: &MinimumRecord, coords: Vec<f64>) -> MinimumHandle {
    Rc::new(Minimum::with_metadata(record.energy, coords, record.metadata))
}

/// Builds a transition state, resolving both endpoints through `index`.
pub fn build_transition_state(
    record: &TransitionStateRecord,
    coords: Vec<f64>,
    index: &MinimaIndex,
) -> Result<TransitionState, LookupError> {
    let minimum1 = index.resolve(record.minimum1)?;
    let minimum2 = index.resolve(record.minimum2)?;
    Ok(TransitionState::with_metadata(
        record.energy,
        coords,
        record.metadata,
        minimum1,
        minimum2,
    ))
}
