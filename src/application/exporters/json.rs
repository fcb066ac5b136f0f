//! JSON output.

use crate::domain::{AppError, Message, Result};

use super::DocumentFormat;

/// A single pretty-printed array of message objects.
///
/// Timestamps stay as raw epoch seconds and non-ASCII text is written as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl DocumentFormat for JsonFormat {
    const NAME: &'static str = "json";

    fn render(&self, messages: &[Message], _encoding: &str) -> Result<String> {
        let mut document = serde_json::to_string_pretty(messages).map_err(AppError::json)?;
        document.push('\n');
        Ok(document)
    }
}
