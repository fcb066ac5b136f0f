//! Domain models for SMS backup data.
//!
//! These models represent the rows read from the backup's `message` table
//! and the databases found while scanning a backup tree.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Flag value the store uses for received messages.
pub const INCOMING_FLAG: i64 = 2;

/// Whether a message was received or sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Received by the phone owner.
    Incoming,
    /// Sent by the phone owner.
    Outgoing,
}

impl Direction {
    /// Classifies a raw `flags` value. Only `2` means incoming.
    #[must_use]
    pub const fn from_flag(flag: i64) -> Self {
        if flag == INCOMING_FLAG {
            Self::Incoming
        } else {
            Self::Outgoing
        }
    }
}

/// A single SMS row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Row identity, unique within one database.
    pub id: i64,
    /// Epoch seconds.
    pub timestamp: i64,
    /// Phone number or handle of the other party.
    pub address: String,
    /// Message text, never empty.
    pub body: String,
    /// Raw direction flag as stored.
    pub direction_flag: i64,
}

impl Message {
    /// Direction derived from the raw flag.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        Direction::from_flag(self.direction_flag)
    }
}

/// A database file that passed validation during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Location of the database file.
    pub path: PathBuf,
    /// Number of non-empty messages at validation time.
    pub count: u64,
    /// Epoch seconds of the most recent message.
    pub latest_timestamp: i64,
}
