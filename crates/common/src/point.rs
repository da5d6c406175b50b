// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::rc::Rc;

use crate::ids::MinimumId;

/// Scalars that come with every stationary point in the summary files but
/// take no part in the import itself. They are kept so that the store holds
/// everything the summary files describe.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PointMetadata {
    /// Log product of the non-zero vibrational frequencies.
    pub frequency: f64,
    /// Order of the point group.
    pub pgorder: u32,
    /// Principal moments of inertia.
    pub inertia: [f64; 3],
}

/// A local minimum of the potential-energy landscape.
///
/// Minima are created once and never changed afterwards, with the single
/// exception of the store id, which is filled in when the minimum becomes
/// durable.
#[derive(Debug)]
pub struct Minimum {
    energy: f64,
    coords: Vec<f64>,
    metadata: PointMetadata,
    id: OnceCell<MinimumId>,
}

/// Shared handle to a [`Minimum`]. Transition states hold two of these.
pub type MinimumHandle = Rc<Minimum>;

impl Minimum {
    pub fn new(energy: f64, coords: Vec<f64>) -> Self {
        Self::with_metadata(energy, coords, PointMetadata::default())
    }

    pub fn with_metadata(energy: f64, coords: Vec<f64>, metadata: PointMetadata) -> Self {
        Self {
            energy,
            coords,
            metadata,
            id: OnceCell::new(),
        }
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Flat `x y z` coordinates, three entries per atom.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    pub fn atom_count(&self) -> usize {
        self.coords.len() / 3
    }

    pub fn metadata(&self) -> &PointMetadata {
        &self.metadata
    }

    /// The store id, or `None` while the minimum has not been committed.
    pub fn id(&self) -> Option<MinimumId> {
        self.id.get().copied()
    }

    pub fn is_durable(&self) -> bool {
        self.id.get().is_some()
    }

    /// Records the id the store assigned to this minimum. Returns `false`
    /// and leaves the existing id untouched if one was already assigned.
    pub fn assign_id(&self, id: MinimumId) -> bool {
        self.id.set(id).is_ok()
    }
}

/// A first-order saddle point connecting exactly two minima.
#[derive(Clone, Debug)]
pub struct TransitionState {
    energy: f64,
    coords: Vec<f64>,
    metadata: PointMetadata,
    minimum1: MinimumHandle,
    minimum2: MinimumHandle,
}

impl TransitionState {
    pub fn new(
        energy: f64,
        coords: Vec<f64>,
        minimum1: MinimumHandle,
        minimum2: MinimumHandle,
    ) -> Self {
        Self::with_metadata(energy, coords, PointMetadata::default(), minimum1, minimum2)
    }

    pub fn with_metadata(
        energy: f64,
        coords: Vec<f64>,
        metadata: PointMetadata,
        minimum1: MinimumHandle,
        minimum2: MinimumHandle,
    ) -> Self {
        Self {
            energy,
            coords,
            metadata,
            minimum1,
            minimum2,
        }
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    pub fn metadata(&self) -> &PointMetadata {
        &self.metadata
    }

    pub fn minimum1(&self) -> &MinimumHandle {
        &self.minimum1
    }

    pub fn minimum2(&self) -> &MinimumHandle {
        &self.minimum2
    }

    /// Barrier height measured from the lower of the two connected minima.
    pub fn barrier(&self) -> f64 {
        self.energy - self.minimum1.energy().min(self.minimum2.energy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_assigned_once() {
        let minimum = Minimum::new(-10.5, vec![0.0; 6]);
        assert!(!minimum.is_durable());
        assert!(minimum.assign_id(MinimumId(4)));
        assert!(!minimum.assign_id(MinimumId(9)));
        assert_eq!(minimum.id(), Some(MinimumId(4)));
    }

    #[test]
    fn transition_state_shares_its_endpoints() {
        let a: MinimumHandle = Rc::new(Minimum::new(-10.5, vec![0.0; 6]));
        let b: MinimumHandle = Rc::new(Minimum::new(-9.8, vec![1.0; 6]));
        let ts = TransitionState::new(-9.0, vec![0.5; 6], Rc::clone(&a), Rc::clone(&b));

        a.assign_id(MinimumId(1));
        assert_eq!(ts.minimum1().id(), Some(MinimumId(1)));
        assert!(Rc::ptr_eq(ts.minimum2(), &b));
        assert!((ts.barrier() - 1.5).abs() < 1e-12);
        assert_eq!(a.atom_count(), 2);
    }
}
