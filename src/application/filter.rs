//! Address filtering.

use regex::Regex;

use crate::domain::{AppError, Message, Result};

/// Row acceptance predicate shared by the preload and streaming paths.
///
/// The pattern is anchored at the start of the address, so `\+41` keeps
/// `+41791234567` but not `0041791234567`.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pattern: Option<Regex>,
}

impl RecordFilter {
    /// Builds a filter. `None` accepts every message.
    ///
    /// # Errors
    /// Returns error if the pattern is not a valid regular expression.
    pub fn new(pattern: Option<&str>) -> Result<Self> {
        let Some(pattern) = pattern else {
            return Ok(Self::default());
        };

        let anchored = format!("^(?:{pattern})");
        let regex = Regex::new(&anchored).map_err(|source| AppError::InvalidFilter {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            pattern: Some(regex),
        })
    }

    /// Whether `message` is kept.
    #[must_use]
    pub fn accepts(&self, message: &Message) -> bool {
        self.pattern
            .as_ref()
            .is_none_or(|re| re.is_match(&message.address))
    }
}
