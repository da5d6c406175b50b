// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use config::ConfigError;
use import::ImportError;
use storage::StoreError;
use thiserror::Error;

/// Why an import run stopped. Nothing is retried; the first error ends the
/// run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

/// Coarse classification of [`Error`], mostly for callers that want to react
/// to one kind of failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Io,
    StreamExhausted,
    Parse,
    Lookup,
    Persistence,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::Import(ImportError::Io { .. }) => ErrorKind::Io,
            Error::Import(ImportError::StreamExhausted { .. }) => ErrorKind::StreamExhausted,
            Error::Import(ImportError::Parse { .. }) => ErrorKind::Parse,
            Error::Import(ImportError::UnknownMinimum { .. }) => ErrorKind::Lookup,
            Error::Persistence(_) => ErrorKind::Persistence,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
