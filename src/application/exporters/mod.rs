//! Output formats.
//!
//! Every format is driven through the same [`Exporter`] lifecycle:
//! `begin`, any number of `emit` calls, then `finish`. Formats that can be
//! written one record at a time implement [`RecordFormat`] and are wrapped in
//! [`Streaming`]. Formats that need a single document root implement
//! [`DocumentFormat`] and are wrapped in [`Buffered`], which holds the
//! messages until `finish`.

mod csv;
mod html;
mod json;
mod text;
mod xml;

pub use csv::CsvFormat;
pub use html::HtmlFormat;
pub use json::JsonFormat;
pub use text::TextFormat;
pub use xml::XmlFormat;

use chrono::{DateTime, Local};

use crate::domain::{Message, Result};
use crate::infrastructure::OutputSink;

/// Date pattern used by the human-facing formats.
const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// One export format, driven by the engine.
pub trait Exporter {
    /// Registry key, e.g. `"csv"`.
    fn name(&self) -> &'static str;

    /// Starts a session. Receives the sink read-only, so nothing is written.
    ///
    /// # Errors
    /// Returns error if the session cannot start.
    fn begin(&mut self, sink: &OutputSink<'_>) -> Result<()>;

    /// Handles one accepted message.
    ///
    /// # Errors
    /// Returns error if writing to the sink fails.
    fn emit(&mut self, sink: &mut OutputSink<'_>, message: &Message) -> Result<()>;

    /// Ends the session, writing anything still buffered.
    ///
    /// # Errors
    /// Returns error if rendering or writing fails.
    fn finish(&mut self, sink: &mut OutputSink<'_>) -> Result<()>;
}

/// A format whose records can be written independently.
pub trait RecordFormat {
    const NAME: &'static str;

    /// Appends the rendering of `message` to `out`.
    fn write_record(&self, message: &Message, out: &mut String);
}

/// A format that renders all messages as one document.
pub trait DocumentFormat {
    const NAME: &'static str;

    /// Renders the whole document. `encoding` is the name of the output encoding.
    ///
    /// # Errors
    /// Returns error if serialization fails.
    fn render(&self, messages: &[Message], encoding: &str) -> Result<String>;
}

/// Writes each message to the sink as it arrives.
#[derive(Debug)]
pub struct Streaming<F> {
    format: F,
    buf: String,
}

impl<F: RecordFormat> Streaming<F> {
    pub const fn new(format: F) -> Self {
        Self {
            format,
            buf: String::new(),
        }
    }
}

impl<F: RecordFormat> Exporter for Streaming<F> {
    fn name(&self) -> &'static str {
        F::NAME
    }

    fn begin(&mut self, _sink: &OutputSink<'_>) -> Result<()> {
        self.buf.clear();
        Ok(())
    }

    fn emit(&mut self, sink: &mut OutputSink<'_>, message: &Message) -> Result<()> {
        self.buf.clear();
        self.format.write_record(message, &mut self.buf);
        sink.write_str(&self.buf)
    }

    fn finish(&mut self, _sink: &mut OutputSink<'_>) -> Result<()> {
        self.buf.clear();
        Ok(())
    }
}

/// Collects messages and writes one document on `finish`.
#[derive(Debug)]
pub struct Buffered<F> {
    format: F,
    messages: Vec<Message>,
}

impl<F: DocumentFormat> Buffered<F> {
    pub const fn new(format: F) -> Self {
        Self {
            format,
            messages: Vec::new(),
        }
    }
}

impl<F: DocumentFormat> Exporter for Buffered<F> {
    fn name(&self) -> &'static str {
        F::NAME
    }

    fn begin(&mut self, _sink: &OutputSink<'_>) -> Result<()> {
        self.messages.clear();
        Ok(())
    }

    fn emit(&mut self, _sink: &mut OutputSink<'_>, message: &Message) -> Result<()> {
        self.messages.push(message.clone());
        Ok(())
    }

    fn finish(&mut self, sink: &mut OutputSink<'_>) -> Result<()> {
        let messages = std::mem::take(&mut self.messages);
        let document = self.format.render(&messages, sink.encoding_name())?;
        sink.write_str(&document)
    }
}

/// Formats epoch seconds as `DD.MM.YYYY HH:MM` in local time.
///
/// Out-of-range values fall back to the raw number.
#[must_use]
pub fn format_timestamp(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0).map_or_else(
        || timestamp.to_string(),
        |dt| dt.with_timezone(&Local).format(DATE_FORMAT).to_string(),
    )
}

/// Escapes text for use in XML or HTML content and attribute values.
fn escape_markup(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
