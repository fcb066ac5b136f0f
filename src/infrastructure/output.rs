//! Output destinations and text encoding.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use encoding_rs::{Encoding, UTF_8};

use crate::domain::{AppError, Result};

/// Where an export is written.
pub enum OutputTarget<'a> {
    /// A file, created or truncated when the sink is opened.
    File(PathBuf),
    /// An already open writer supplied by the caller.
    Writer(&'a mut dyn Write),
}

impl<'a> OutputTarget<'a> {
    /// Opens the destination.
    ///
    /// # Errors
    /// Returns error if the output file cannot be created.
    pub fn open(self, encoding: &'static Encoding) -> Result<OutputSink<'a>> {
        let writer: Box<dyn Write + 'a> = match self {
            Self::File(path) => {
                let file = File::create(&path).map_err(|e| {
                    AppError::io(format!("Failed to create {}", path.display()), e)
                })?;
                tracing::debug!(path = %path.display(), "Output file opened");
                Box::new(file)
            }
            Self::Writer(writer) => Box::new(writer),
        };

        Ok(OutputSink {
            writer: BufWriter::new(writer),
            encoding,
            unmappable_reported: false,
        })
    }
}

/// A buffered byte sink that encodes text with one fixed encoding.
pub struct OutputSink<'a> {
    writer: BufWriter<Box<dyn Write + 'a>>,
    encoding: &'static Encoding,
    unmappable_reported: bool,
}

impl OutputSink<'_> {
    /// Name of the encoding the bytes are actually written in.
    #[must_use]
    pub fn encoding_name(&self) -> &'static str {
        self.encoding.output_encoding().name()
    }

    /// Encodes `text` and writes it.
    ///
    /// Characters the encoding cannot represent become numeric character
    /// references.
    ///
    /// # Errors
    /// Returns error if the underlying writer fails.
    pub fn write_str(&mut self, text: &str) -> Result<()> {
        if self.encoding == UTF_8 {
            return self.write_bytes(text.as_bytes());
        }

        let (bytes, _, had_unmappable) = self.encoding.encode(text);
        if had_unmappable && !self.unmappable_reported {
            tracing::warn!(
                encoding = self.encoding_name(),
                "Some characters cannot be represented and were written as character references"
            );
            self.unmappable_reported = true;
        }
        self.write_bytes(&bytes)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer
            .write_all(bytes)
            .map_err(|e| AppError::io("Failed to write output", e))
    }

    /// Flushes buffered bytes to the destination.
    ///
    /// # Errors
    /// Returns error if the underlying writer fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| AppError::io("Failed to flush output", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;
    use tempfile::tempdir;

    #[test]
    fn test_utf8_passthrough() {
        let mut buf = Vec::new();
        {
            let mut sink = OutputTarget::Writer(&mut buf).open(UTF_8).unwrap();
            sink.write_str("Grüezi 👋").unwrap();
            sink.flush().unwrap();
        }
        assert_eq!(String::from_utf8(buf).unwrap(), "Grüezi 👋");
    }

    #[test]
    fn test_latin1_encoding() {
        let mut buf = Vec::new();
        {
            let mut sink = OutputTarget::Writer(&mut buf).open(WINDOWS_1252).unwrap();
            assert_eq!(sink.encoding_name(), "windows-1252");
            sink.write_str("é👋").unwrap();
            sink.flush().unwrap();
        }
        assert_eq!(buf, b"\xe9&#128075;");
    }

    #[test]
    fn test_file_target_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "previous content that is long").unwrap();

        let mut sink = OutputTarget::File(path.clone()).open(UTF_8).unwrap();
        sink.write_str("new").unwrap();
        sink.flush().unwrap();
        drop(sink);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }
}
