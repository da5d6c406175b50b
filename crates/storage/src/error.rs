// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("cannot create directory {} for the store: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no landscape database at {}", .0.display())]
    Missing(PathBuf),

    /// Staged entry `position` (0-based, in staging order) is a transition
    /// state with an endpoint that is neither committed nor staged ahead of it.
    #[error("staged transition state #{position} references a minimum that was never staged")]
    UnresolvedEndpoint { position: usize },

    /// Staged entry `position` is a minimum that already has a row, either
    /// from an earlier commit or from earlier in the same batch.
    #[error("staged minimum #{position} has already been written")]
    DuplicateMinimum { position: usize },
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
