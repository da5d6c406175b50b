// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Everything that can go wrong while reading a landscape dataset. Every
/// variant names the file and the 1-based line the problem was found on.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{}:{line}: I/O error: {source}", .path.display())]
    Io {
        path: PathBuf,
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: stream exhausted: {details}", .path.display())]
    StreamExhausted {
        path: PathBuf,
        line: usize,
        details: String,
    },

    #[error("{}:{line}: {details}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        details: String,
    },

    #[error(
        "{}:{line}: unknown minimum ordinal {ordinal} ({known} minima loaded)",
        .path.display()
    )]
    UnknownMinimum {
        path: PathBuf,
        line: usize,
        ordinal: i64,
        known: usize,
    },
}

impl ImportError {
    pub fn io(path: &Path, line: usize, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_owned(),
            line,
            source,
        }
    }

    pub fn exhausted(path: &Path, line: usize, details: impl Into<String>) -> Self {
        Self::StreamExhausted {
            path: path.to_owned(),
            line,
            details: details.into(),
        }
    }

    pub fn parse(path: &Path, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_owned(),
            line,
            details: details.into(),
        }
    }

    /// The file the error was found in.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::StreamExhausted { path, .. }
            | Self::Parse { path, .. }
            | Self::UnknownMinimum { path, .. } => path,
        }
    }

    /// The 1-based line the error was found on. Zero means the file could not
    /// be opened at all.
    pub fn line(&self) -> usize {
        match self {
            Self::Io { line, .. }
            | Self::StreamExhausted { line, .. }
            | Self::Parse { line, .. }
            | Self::UnknownMinimum { line, .. } => *line,
        }
    }
}
