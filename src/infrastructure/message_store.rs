//! `SQLite` reader for the SMS database found in iPhone backups.
//!
//! Reads the `message` table. The database is only ever opened read-only.

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row};

use crate::domain::{AppError, Message, Result};

/// Fixed projection: identity, timestamp, address, body, direction flag.
const PROJECTION_QUERY: &str = "SELECT rowid, date, address, text, flags FROM message \
     WHERE text IS NOT NULL AND text <> '' ORDER BY rowid";

const COUNT_QUERY: &str = "SELECT COUNT(*) FROM message WHERE text IS NOT NULL AND text <> ''";

const LATEST_QUERY: &str = "SELECT rowid, date, address, text, flags FROM message \
     WHERE text IS NOT NULL AND text <> '' ORDER BY date DESC, rowid DESC LIMIT 1";

/// Row count and most recent message of a store.
#[derive(Debug, Clone)]
pub struct StoreSummary {
    pub count: u64,
    pub latest: Message,
}

/// `SQLite` reader for SMS databases.
pub struct MessageStore {
    conn: Connection,
}

impl MessageStore {
    /// Opens an SMS database in read-only mode.
    ///
    /// # Errors
    /// Returns error if database cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(path, flags).map_err(AppError::database)?;

        conn.execute_batch(
            "PRAGMA query_only = ON;
             PRAGMA temp_store = MEMORY;",
        )
        .map_err(AppError::database)?;

        Ok(Self { conn })
    }

    /// Checks that the store answers the projection query and summarizes it.
    ///
    /// Returns `None` when the table holds no message with a body.
    ///
    /// # Errors
    /// Returns error if the schema does not match or the file is not a
    /// readable database.
    pub fn summary(&self) -> Result<Option<StoreSummary>> {
        // Preparing compiles the projection against the real schema.
        self.conn
            .prepare(PROJECTION_QUERY)
            .map_err(AppError::database)?;

        let count: i64 = self
            .conn
            .query_row(COUNT_QUERY, [], |row| row.get(0))
            .map_err(AppError::database)?;

        if count <= 0 {
            return Ok(None);
        }

        let latest = self
            .conn
            .query_row(LATEST_QUERY, [], decode_row)
            .map_err(AppError::database)?;

        Ok(Some(StoreSummary {
            count: count.unsigned_abs(),
            latest,
        }))
    }

    /// Runs the projection query and hands every row to `f`, in `rowid` order.
    ///
    /// # Errors
    /// Returns the first query, decode, or callback error.
    pub fn for_each_row<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(Message) -> Result<()>,
    {
        let mut stmt = self
            .conn
            .prepare(PROJECTION_QUERY)
            .map_err(AppError::database)?;

        let mut rows = stmt.query([]).map_err(AppError::database)?;

        while let Some(row) = rows.next().map_err(AppError::database)? {
            let message = decode_row(row).map_err(AppError::database)?;
            f(message)?;
        }

        Ok(())
    }

    /// Releases the connection.
    ///
    /// # Errors
    /// Returns error if `SQLite` refuses to close the handle.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| AppError::database(e))
    }
}

/// Decodes one projected row. Column order matches `PROJECTION_QUERY`.
fn decode_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        timestamp: integer_column(row, 1)?,
        address: text_column(row, 2)?,
        body: text_column(row, 3)?,
        direction_flag: integer_column(row, 4)?,
    })
}

/// Reads an integer column, accepting REAL values and treating NULL as 0.
fn integer_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<i64> {
    match row.get_ref(idx)? {
        ValueRef::Integer(i) => Ok(i),
        #[allow(clippy::cast_possible_truncation)]
        ValueRef::Real(f) => Ok(f as i64),
        ValueRef::Null => Ok(0),
        ValueRef::Text(_) | ValueRef::Blob(_) => row.get(idx),
    }
}

/// Reads a text column lossily, treating NULL as empty.
fn text_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    // Handle both TEXT and BLOB value types
    let value = match row.get_ref(idx)? {
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Null => String::new(),
    };
    Ok(value)
}
