// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Summary files: one whitespace-separated line per stationary point.
//!
//! ```text
//! min.data:  energy frequency pgorder itx ity itz
//! ts.data:   energy frequency pgorder min1 min2 itx ity itz
//! ```

use common::PointMetadata;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::error::ImportError;

/// A summary line that could not be turned into a record. The location is
/// added by [`SummaryReader::parse`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("expected {expected} fields, found {found}")]
    Arity { expected: usize, found: usize },

    #[error("field `{field}` is not a valid number: {value:?}")]
    Number { field: &'static str, value: String },
}

/// One line of the minima summary file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimumRecord {
    pub energy: f64,
    pub metadata: PointMetadata,
}

/// One line of the transition-state summary file. `minimum1` and `minimum2`
/// are 1-based line numbers into the minima summary file. They are kept
/// signed so that an out-of-range value such as `-1` is reported as an
/// unknown minimum rather than as a malformed line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionStateRecord {
    pub energy: f64,
    pub minimum1: i64,
    pub minimum2: i64,
    pub metadata: PointMetadata,
}

const MINIMUM_FIELDS: [&str; 6] = ["energy", "frequency", "pgorder", "itx", "ity", "itz"];

const TRANSITION_STATE_FIELDS: [&str; 8] = [
    "energy",
    "frequency",
    "pgorder",
    "min1",
    "min2",
    "itx",
    "ity",
    "itz",
];

/// Tokens of a line whose arity has already been checked.
struct Fields<'a> {
    names: &'static [&'static str],
    tokens: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    fn split(line: &'a str, names: &'static [&'static str]) -> Result<Self, RecordError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != names.len() {
            return Err(RecordError::Arity {
                expected: names.len(),
                found: tokens.len(),
            });
        }
        Ok(Self { names, tokens })
    }

    fn get<T: FromStr>(&self, index: usize) -> Result<T, RecordError> {
        self.tokens[index]
            .parse()
            .map_err(|_| RecordError::Number {
                field: self.names[index],
                value: self.tokens[index].to_owned(),
            })
    }

    fn metadata(
        &self,
        frequency: usize,
        pgorder: usize,
        inertia: usize,
    ) -> Result<PointMetadata, RecordError> {
        Ok(PointMetadata {
            frequency: self.get(frequency)?,
            pgorder: self.get(pgorder)?,
            inertia: [
                self.get(inertia)?,
                self.get(inertia + 1)?,
                self.get(inertia + 2)?,
            ],
        })
    }
}

impl FromStr for MinimumRecord {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields = Fields::split(line, &MINIMUM_FIELDS)?;
        Ok(Self {
            energy: fields.get(0)?,
            metadata: fields.metadata(1, 2, 3)?,
        })
    }
}

impl FromStr for TransitionStateRecord {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields = Fields::split(line, &TRANSITION_STATE_FIELDS)?;
        Ok(Self {
            energy: fields.get(0)?,
            minimum1: fields.get(3)?,
            minimum2: fields.get(4)?,
            metadata: fields.metadata(1, 2, 5)?,
        })
    }
}

/// A raw summary line and its 1-based line number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryLine {
    pub line: usize,
    pub text: String,
}

/// Line reader for a summary file that knows where it is, so that parse
/// errors can point at the offending line.
pub struct SummaryReader<R> {
    lines: Lines<R>,
    path: PathBuf,
    line: usize,
}

impl SummaryReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImportError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| ImportError::io(path, 0, err))?;
        Ok(Self::new(BufReader::new(file), path))
    }
}

impl<R: BufRead> SummaryReader<R> {
    pub fn new(reader: R, path: impl Into<PathBuf>) -> Self {
        Self {
            lines: reader.lines(),
            path: path.into(),
            line: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn next_line(&mut self) -> Result<Option<SummaryLine>, ImportError> {
        match self.lines.next() {
            Some(Ok(text)) => {
                self.line += 1;
                Ok(Some(SummaryLine {
                    line: self.line,
                    text,
                }))
            }
            Some(Err(err)) => Err(ImportError::io(&self.path, self.line + 1, err)),
            None => Ok(None),
        }
    }

    pub fn parse<T>(&self, line: &SummaryLine) -> Result<T, ImportError>
    where
        T: FromStr<Err = RecordError>,
    {
        line.text
            .parse()
            .map_err(|err: RecordError| ImportError::parse(&self.path, line.line, err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_minimum_line() {
        let record: MinimumRecord = "-10.5 1.0 1 0 0 0".parse().unwrap();
        assert_eq!(record.energy, -10.5);
        assert_eq!(record.metadata.pgorder, 1);
        assert_eq!(record.metadata.inertia, [0.0; 3]);
    }

    #[test]
    fn parses_transition_state_line() {
        let record: TransitionStateRecord =
            "-9.1 2.5 2 1 2 0.1 0.2 0.3".parse().unwrap();
        assert_eq!(record.energy, -9.1);
        assert_eq!((record.minimum1, record.minimum2), (1, 2));
        assert_eq!(record.metadata.frequency, 2.5);
        assert_eq!(record.metadata.pgorder, 2);
        assert_eq!(record.metadata.inertia, [0.1, 0.2, 0.3]);
    }

    #[test]
    fn rejects_wrong_arity() {
        assert_eq!(
            "-10.5 1.0 1 0 0".parse::<MinimumRecord>(),
            Err(RecordError::Arity {
                expected: 6,
                found: 5
            })
        );
        // A minimum line is too short for a transition state.
        assert!(matches!(
            "-10.5 1.0 1 0 0 0".parse::<TransitionStateRecord>(),
            Err(RecordError::Arity { expected: 8, .. })
        ));
        assert!(matches!(
            "".parse::<MinimumRecord>(),
            Err(RecordError::Arity { found: 0, .. })
        ));
    }

    #[test]
    fn negative_ordinal_is_not_a_parse_error() {
        let record: TransitionStateRecord = "-9.0 1.0 1 -1 2 0 0 0".parse().unwrap();
        assert_eq!((record.minimum1, record.minimum2), (-1, 2));
    }

    #[test]
    fn names_the_bad_field() {
        assert_eq!(
            "-9.1 2.5 2 1 two 0 0 0".parse::<TransitionStateRecord>(),
            Err(RecordError::Number {
                field: "min2",
                value: "two".into()
            })
        );
        assert!(matches!(
            "-9.1 2.5 2 1.5 2 0 0 0".parse::<TransitionStateRecord>(),
            Err(RecordError::Number { field: "min1", .. })
        ));
        assert!(matches!(
            "-10.5 1.0 1.5 0 0 0".parse::<MinimumRecord>(),
            Err(RecordError::Number { field: "pgorder", .. })
        ));
    }

    #[test]
    fn reader_reports_location() {
        let text = "-1 0 1 0 0 0\n-2 0 x 0 0 0\n";
        let mut summary = SummaryReader::new(Cursor::new(text), "min.data");

        let first = summary.next_line().unwrap().unwrap();
        let record: MinimumRecord = summary.parse(&first).unwrap();
        assert_eq!(record.energy, -1.0);

        let second = summary.next_line().unwrap().unwrap();
        let err = summary.parse::<MinimumRecord>(&second).unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(err.to_string().starts_with("min.data:2:"));

        assert!(summary.next_line().unwrap().is_none());
    }
}
