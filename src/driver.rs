// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The two-phase import: all minima are read and committed before any
//! transition state is read, so every transition state can point at minima
//! that already have store ids.

use config::ImportConfig;
use import::{
    build_minimum, build_transition_state, CoordinateReader, ImportError, MinimaIndex,
    MinimumRecord, SummaryReader, TransitionStateRecord,
};
use log::{debug, info, trace};
use serde::Serialize;
use std::rc::Rc;
use std::time::{Duration, Instant};
use storage::{Database, Session};

use crate::error::Result;
use crate::timing::{Phase, PhaseTiming, Timer};

/// What an import run did.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImportReport {
    pub minima: usize,
    pub transition_states: usize,
    pub timings: Vec<PhaseTiming>,
    pub total: Duration,
}

/// Opens (or creates) the store named in `config` and imports into it.
pub fn run(config: &ImportConfig) -> Result<ImportReport> {
    info!("Opening database {}", config.store.display());
    let mut db = Database::open(&config.store)?;
    import(&mut db, config)
}

/// Imports the dataset described by `config` into `db`.
///
/// Records are appended: importing the same files twice stores every
/// record twice.
pub fn import(db: &mut Database, config: &ImportConfig) -> Result<ImportReport> {
    let started = Instant::now();
    let mut timings = Vec::with_capacity(4);
    let mut session = db.session();

    let timer = Timer::new(Phase::ReadMinima);
    let index = stage_minima(&mut session, config)?;
    timings.push(timer.stop());

    let timer = Timer::new(Phase::CommitMinima);
    let committed = session.commit()?;
    timings.push(timer.stop());
    debug!("{} minima are durable", committed.minima);

    let timer = Timer::new(Phase::ReadTransitionStates);
    let staged = stage_transition_states(&mut session, config, &index)?;
    timings.push(timer.stop());

    let timer = Timer::new(Phase::CommitTransitionStates);
    let committed = session.commit()?;
    timings.push(timer.stop());
    debug!(
        "{} of {} transition states are durable",
        committed.transition_states, staged
    );

    let total = started.elapsed();
    info!("Done after {:.1?}", total);

    Ok(ImportReport {
        minima: index.len(),
        transition_states: staged,
        timings,
        total,
    })
}

/// Phase one: one minimum per line of the minima summary file.
fn stage_minima(session: &mut Session<'_>, config: &ImportConfig) -> Result<MinimaIndex> {
    let mut summary = SummaryReader::open(&config.minima_summary)?;
    let mut coords = CoordinateReader::open(&config.minima_coords, config.atom_count)?;
    let mut index = MinimaIndex::new();

    while let Some(line) = summary.next_line()? {
        let block = coords.next_block()?;
        let record: MinimumRecord = summary.parse(&line)?;
        let minimum = build_minimum(&record, block);
        session.stage(Rc::clone(&minimum));
        let ordinal = index.insert(minimum);
        trace!("minimum {} E = {}", ordinal, record.energy);
    }
    debug!(
        "Read {} blocks of {} atoms from {}",
        coords.blocks_read(),
        coords.atom_count(),
        coords.path().display()
    );
    coords.finish()?;

    info!("Staged {} minima", index.len());
    Ok(index)
}

/// Phase two: one transition state per line of the transition-state summary
/// file, endpoints resolved through `index`.
fn stage_transition_states(
    session: &mut Session<'_>,
    config: &ImportConfig,
    index: &MinimaIndex,
) -> Result<usize> {
    let mut summary = SummaryReader::open(&config.ts_summary)?;
    let mut coords = CoordinateReader::open(&config.ts_coords, config.atom_count)?;
    let mut staged = 0;

    while let Some(line) = summary.next_line()? {
        let block = coords.next_block()?;
        let record: TransitionStateRecord = summary.parse(&line)?;
        let ts = build_transition_state(&record, block, index).map_err(|err| {
            ImportError::UnknownMinimum {
                path: summary.path().to_owned(),
                line: line.line,
                ordinal: err.ordinal,
                known: err.known,
            }
        })?;
        trace!(
            "transition state {} E = {} connects {} and {}",
            line.line,
            record.energy,
            record.minimum1,
            record.minimum2
        );
        session.stage(ts);
        staged += 1;
    }
    debug!(
        "Read {} blocks of {} atoms from {}",
        coords.blocks_read(),
        coords.atom_count(),
        coords.path().display()
    );
    coords.finish()?;

    info!("Staged {} transition states", staged);
    Ok(staged)
}
