// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use log::{info, warn};
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    ReadMinima,
    CommitMinima,
    ReadTransitionStates,
    CommitTransitionStates,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::ReadMinima => "Reading minima",
            Phase::CommitMinima => "Committing minima",
            Phase::ReadTransitionStates => "Reading transition states",
            Phase::CommitTransitionStates => "Committing transition states",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PhaseTiming {
    pub phase: Phase,
    pub elapsed: Duration,
}

/// Wall-clock timer for one phase of an import. [`Timer::stop`] logs and
/// returns the elapsed time; a timer dropped without being stopped logs the
/// phase as aborted.
pub struct Timer {
    phase: Phase,
    start: Instant,
    stopped: bool,
}

impl Timer {
    pub fn new(phase: Phase) -> Self {
        info!("{}", phase);
        Self {
            phase,
            start: Instant::now(),
            stopped: false,
        }
    }

    pub fn stop(mut self) -> PhaseTiming {
        self.stopped = true;
        let elapsed = self.start.elapsed();
        info!("{} took {:.1?}", self.phase, elapsed);
        PhaseTiming {
            phase: self.phase,
            elapsed,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if !self.stopped {
            warn!(
                "{} aborted after {:.1?}",
                self.phase,
                self.start.elapsed()
            );
        }
    }
}
