//! Message loading service.
//!
//! Wraps a [`MessageStore`] and a [`RecordFilter`] and offers the accepted
//! rows either preloaded in memory or streamed from the query cursor.

use std::path::Path;

use crate::domain::{Message, Result};
use crate::infrastructure::MessageStore;

use super::filter::RecordFilter;

/// Reads filtered messages from one SMS database.
pub struct MessageLoader {
    store: MessageStore,
    filter: RecordFilter,
    preloaded: Option<Vec<Message>>,
}

impl MessageLoader {
    /// Opens the database at `path`.
    ///
    /// # Errors
    /// Returns error if the database cannot be opened.
    pub fn open(path: &Path, filter: RecordFilter) -> Result<Self> {
        tracing::debug!("Opening message store: {}", path.display());

        Ok(Self {
            store: MessageStore::open(path)?,
            filter,
            preloaded: None,
        })
    }

    /// Reads every accepted message into memory.
    ///
    /// Later [`for_each`](Self::for_each) calls iterate the in-memory copy.
    ///
    /// # Errors
    /// Returns error if the query fails.
    pub fn preload(&mut self) -> Result<&[Message]> {
        let mut messages = Vec::new();
        self.store.for_each_row(|message| {
            if self.filter.accepts(&message) {
                messages.push(message);
            }
            Ok(())
        })?;

        tracing::info!("database preloaded, {} sms", messages.len());

        let messages: &[Message] = self.preloaded.insert(messages);
        Ok(messages)
    }

    /// Whether [`preload`](Self::preload) has run.
    #[must_use]
    pub const fn is_preloaded(&self) -> bool {
        self.preloaded.is_some()
    }

    /// Calls `callback` once per accepted message in ascending id order and
    /// returns how many were accepted.
    ///
    /// # Errors
    /// Returns the first query or callback error.
    pub fn for_each<F>(&self, mut callback: F) -> Result<usize>
    where
        F: FnMut(&Message) -> Result<()>,
    {
        if let Some(messages) = &self.preloaded {
            for message in messages {
                callback(message)?;
            }
            return Ok(messages.len());
        }

        let mut count = 0;
        self.store.for_each_row(|message| {
            if self.filter.accepts(&message) {
                callback(&message)?;
                count += 1;
            }
            Ok(())
        })?;

        Ok(count)
    }

    /// Releases the database handle.
    ///
    /// # Errors
    /// Returns error if the handle cannot be closed cleanly.
    pub fn close(self) -> Result<()> {
        self.store.close()
    }
}
