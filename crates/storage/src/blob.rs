// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Coordinates are stored as a BLOB holding the native-endian bytes of the
//! flat `f64` coordinate vector.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};
use std::mem::size_of;

pub(crate) fn as_blob(coords: &[f64]) -> &[u8] {
    bytemuck::cast_slice(coords)
}

/// A coordinate vector read back from the store.
pub(crate) struct CoordinateBlob(pub Vec<f64>);

impl FromSql for CoordinateBlob {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let bytes = value.as_blob()?;
        if bytes.len() % size_of::<f64>() != 0 {
            return Err(FromSqlError::Other(
                format!(
                    "coordinate blob of {} bytes is not a whole number of f64 values",
                    bytes.len()
                )
                .into(),
            ));
        }
        // SQLite makes no alignment promises for blob memory.
        let coords = bytes
            .chunks_exact(size_of::<f64>())
            .map(bytemuck::pod_read_unaligned::<f64>)
            .collect();
        Ok(Self(coords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn blob_preserves_values() {
        let conn = Connection::open_in_memory().unwrap();
        let coords = [0.0, -1.5, 3.25e-8, f64::MAX, -0.0, 42.0];
        let CoordinateBlob(read) = conn
            .query_row("SELECT ?", [as_blob(&coords)], |row| row.get(0))
            .unwrap();
        assert_eq!(read, coords);
    }

    #[test]
    fn rejects_truncated_blob() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.query_row("SELECT x'00010203'", [], |row| row.get::<_, CoordinateBlob>(0));
        assert!(result.is_err());
    }
}
