// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use landscape_import::{
    build_minimum, build_transition_state, CoordinateReader, ImportError, MinimaIndex,
    MinimumRecord, SummaryReader, TransitionStateRecord,
};
use std::io::Cursor;

const MIN_DATA: &str = "-10.5 1.0 1 0 0 0\n-9.8 1.0 1 0 0 0\n";
const EXTRACTED_MIN: &str = "0 0 0\n1 0 0\n0 0 0\n1.1 0 0\n";
const TS_DATA: &str = "-9.0 1.0 1 1 2 0 0 0\n";
const EXTRACTED_TS: &str = "0 0 0\n1.05 0 0\n";

fn read_minima() -> Result<MinimaIndex, ImportError> {
    let mut summary = SummaryReader::new(Cursor::new(MIN_DATA), "min.data");
    let mut coords = CoordinateReader::new(Cursor::new(EXTRACTED_MIN), "extractedmin", 2);
    let mut index = MinimaIndex::new();

    while let Some(line) = summary.next_line()? {
        let block = coords.next_block()?;
        let record: MinimumRecord = summary.parse(&line)?;
        index.insert(build_minimum(&record, block));
    }
    coords.finish()?;
    Ok(index)
}

#[test]
fn two_minima_scenario() {
    let index = read_minima().unwrap();

    assert_eq!(index.len(), 2);
    let energies: Vec<(usize, f64)> = index.iter().map(|(n, m)| (n, m.energy())).collect();
    assert_eq!(energies, vec![(1, -10.5), (2, -9.8)]);
    for (_, minimum) in index.iter() {
        assert_eq!(minimum.coords().len(), 6);
        assert!(!minimum.is_durable());
    }
}

#[test]
fn transition_states_resolve_against_the_minima() {
    let index = read_minima().unwrap();
    let mut summary = SummaryReader::new(Cursor::new(TS_DATA), "ts.data");
    let mut coords = CoordinateReader::new(Cursor::new(EXTRACTED_TS), "extractedts", 2);

    let line = summary.next_line().unwrap().unwrap();
    let block = coords.next_block().unwrap();
    let record: TransitionStateRecord = summary.parse(&line).unwrap();
    let ts = build_transition_state(&record, block, &index).unwrap();

    assert_eq!(ts.minimum1().energy(), -10.5);
    assert_eq!(ts.minimum2().energy(), -9.8);
    assert!((ts.barrier() - 1.5).abs() < 1e-12);
    assert!(summary.next_line().unwrap().is_none());
    assert_eq!(coords.finish().unwrap(), 1);
}

#[test]
fn coordinates_shorter_than_summary() {
    let mut summary = SummaryReader::new(Cursor::new(MIN_DATA), "min.data");
    let mut coords = CoordinateReader::new(Cursor::new("0 0 0\n1 0 0\n0 0 0\n"), "extractedmin", 2);

    let mut built = 0;
    let err = loop {
        let Some(_line) = summary.next_line().unwrap() else {
            panic!("summary ran out first");
        };
        match coords.next_block() {
            Ok(_) => built += 1,
            Err(err) => break err,
        }
    };

    assert_eq!(built, 1);
    match err {
        ImportError::StreamExhausted { path, line, .. } => {
            assert_eq!(path.to_str(), Some("extractedmin"));
            assert_eq!(line, 4);
        }
        other => panic!("expected StreamExhausted, got {other:?}"),
    }
}
