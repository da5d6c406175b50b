// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reader for raw coordinate files: `atom_count` lines of `x y z` per
//! record, records following each other without separators.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::error::ImportError;

/// Reads one block of coordinates per record from a line-oriented stream.
///
/// The reader only moves forward. Iterating yields blocks until the stream
/// ends cleanly on a block boundary; [`CoordinateReader::next_block`] is the
/// variant for callers that know a block must follow.
pub struct CoordinateReader<R> {
    lines: Lines<R>,
    path: PathBuf,
    atom_count: usize,
    line: usize,
    blocks: usize,
}

impl CoordinateReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>, atom_count: usize) -> Result<Self, ImportError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| ImportError::io(path, 0, err))?;
        Ok(Self::new(BufReader::new(file), path, atom_count))
    }
}

impl<R: BufRead> CoordinateReader<R> {
    /// Wraps `reader`. `path` is only used to label errors.
    pub fn new(reader: R, path: impl Into<PathBuf>, atom_count: usize) -> Self {
        Self {
            lines: reader.lines(),
            path: path.into(),
            atom_count,
            line: 0,
            blocks: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn atom_count(&self) -> usize {
        self.atom_count
    }

    /// Number of complete blocks read so far.
    pub fn blocks_read(&self) -> usize {
        self.blocks
    }

    /// Reads the block belonging to the next record. Running out of input,
    /// before or inside the block, is a `StreamExhausted` error.
    pub fn next_block(&mut self) -> Result<Vec<f64>, ImportError> {
        match self.read_block()? {
            Some(coords) => Ok(coords),
            None => Err(ImportError::exhausted(
                &self.path,
                self.line + 1,
                format!("no coordinates left for record {}", self.blocks + 1),
            )),
        }
    }

    /// Consumes the reader, checking that no coordinates are left over.
    /// Trailing blank lines are allowed. Returns the number of blocks read.
    pub fn finish(mut self) -> Result<usize, ImportError> {
        while let Some(text) = self.next_line()? {
            if !text.trim().is_empty() {
                return Err(ImportError::exhausted(
                    &self.path,
                    self.line,
                    format!(
                        "summary ended after {} records but coordinates continue",
                        self.blocks
                    ),
                ));
            }
        }
        Ok(self.blocks)
    }

    fn next_line(&mut self) -> Result<Option<String>, ImportError> {
        match self.lines.next() {
            Some(Ok(text)) => {
                self.line += 1;
                Ok(Some(text))
            }
            Some(Err(err)) => Err(ImportError::io(&self.path, self.line + 1, err)),
            None => Ok(None),
        }
    }

    /// `Ok(None)` only when the stream ends exactly on a block boundary.
    fn read_block(&mut self) -> Result<Option<Vec<f64>>, ImportError> {
        if self.atom_count == 0 {
            return Ok(None);
        }

        let mut coords = Vec::with_capacity(3 * self.atom_count);
        for atom in 0..self.atom_count {
            let Some(text) = self.next_line()? else {
                if atom == 0 {
                    return Ok(None);
                }
                return Err(ImportError::exhausted(
                    &self.path,
                    self.line + 1,
                    format!(
                        "record {} ended after {} of {} atoms",
                        self.blocks + 1,
                        atom,
                        self.atom_count
                    ),
                ));
            };
            let xyz = parse_xyz(&text).map_err(|details| {
                ImportError::parse(&self.path, self.line, details)
            })?;
            coords.extend_from_slice(&xyz);
        }

        self.blocks += 1;
        Ok(Some(coords))
    }
}

impl<R: BufRead> Iterator for CoordinateReader<R> {
    type Item = Result<Vec<f64>, ImportError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_block().transpose()
    }
}

/// Parses an `x y z` line. Exactly three tokens are accepted.
fn parse_xyz(text: &str) -> Result<[f64; 3], String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != 3 {
        return Err(format!(
            "expected 3 coordinates, found {}: {:?}",
            tokens.len(),
            text
        ));
    }

    let mut xyz = [0.0; 3];
    for (value, token) in xyz.iter_mut().zip(&tokens) {
        *value = token
            .parse()
            .map_err(|_| format!("invalid coordinate {:?}", token))?;
    }
    Ok(xyz)
}
