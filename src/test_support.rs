//! Fixtures shared by unit tests.

use std::path::Path;

use rusqlite::{params, Connection};

use crate::domain::Message;

/// One fixture row: rowid, date, address, text, flags.
pub type FixtureRow = (i64, i64, Option<String>, Option<String>, i64);

pub fn row(
    id: i64,
    date: i64,
    address: Option<&str>,
    text: Option<&str>,
    flags: i64,
) -> FixtureRow {
    (
        id,
        date,
        address.map(str::to_string),
        text.map(str::to_string),
        flags,
    )
}

/// Creates an SMS database with the legacy `message` layout.
pub fn create_message_db(path: &Path, rows: &[FixtureRow]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE message (
            ROWID INTEGER PRIMARY KEY AUTOINCREMENT,
            address TEXT,
            date INTEGER,
            text TEXT,
            flags INTEGER
        );",
    )
    .unwrap();

    for (id, date, address, text, flags) in rows {
        conn.execute(
            "INSERT INTO message (ROWID, address, date, text, flags) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, address, date, text, flags],
        )
        .unwrap();
    }
}

pub fn message(id: i64, timestamp: i64, address: &str, body: &str, flag: i64) -> Message {
    Message {
        id,
        timestamp,
        address: address.to_string(),
        body: body.to_string(),
        direction_flag: flag,
    }
}
