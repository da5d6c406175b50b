// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use rusqlite::Connection;

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS minima (
        id INTEGER PRIMARY KEY,
        energy REAL NOT NULL,
        coords BLOB NOT NULL,
        frequency REAL,
        pgorder INTEGER,
        itx REAL,
        ity REAL,
        itz REAL
    );

    CREATE TABLE IF NOT EXISTS transition_states (
        id INTEGER PRIMARY KEY,
        energy REAL NOT NULL,
        coords BLOB NOT NULL,
        frequency REAL,
        pgorder INTEGER,
        itx REAL,
        ity REAL,
        itz REAL,
        minimum1 INTEGER NOT NULL REFERENCES minima(id),
        minimum2 INTEGER NOT NULL REFERENCES minima(id)
    );

    CREATE INDEX IF NOT EXISTS minima_energy ON minima (energy);
    CREATE INDEX IF NOT EXISTS transition_states_minimum1 ON transition_states (minimum1);
    CREATE INDEX IF NOT EXISTS transition_states_minimum2 ON transition_states (minimum2);
";

pub(crate) const INSERT_MINIMUM: &str = "INSERT INTO minima (energy, coords, frequency, pgorder, itx, ity, itz) VALUES (?, ?, ?, ?, ?, ?, ?)";

pub(crate) const INSERT_TRANSITION_STATE: &str = "INSERT INTO transition_states (energy, coords, frequency, pgorder, itx, ity, itz, minimum1, minimum2) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";

pub(crate) const MINIMUM_COLUMNS: &str = "id, energy, coords, frequency, pgorder, itx, ity, itz";

pub(crate) const TRANSITION_STATE_COLUMNS: &str =
    "id, energy, coords, frequency, pgorder, itx, ity, itz, minimum1, minimum2";

/// Creates the tables if they are missing and enables foreign keys for
/// this connection.
pub(crate) fn create(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}
