//! Export orchestration.
//!
//! Owns the exporter registry and drives a [`MessageLoader`] through the
//! chosen [`Exporter`].

use std::collections::BTreeMap;

use encoding_rs::Encoding;

use crate::domain::{AppError, LoadMode, Result};
use crate::infrastructure::OutputTarget;

use super::exporters::{
    Buffered, CsvFormat, Exporter, HtmlFormat, JsonFormat, Streaming, TextFormat, XmlFormat,
};
use super::loader::MessageLoader;

/// Exporters keyed by format name.
pub struct ExporterRegistry {
    exporters: BTreeMap<&'static str, Box<dyn Exporter>>,
}

impl ExporterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            exporters: BTreeMap::new(),
        }
    }

    /// Registry holding txt, csv, json, xml and html.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(Streaming::new(TextFormat)));
        registry.register(Box::new(Streaming::new(CsvFormat)));
        registry.register(Box::new(Buffered::new(JsonFormat)));
        registry.register(Box::new(Buffered::new(XmlFormat)));
        registry.register(Box::new(Buffered::new(HtmlFormat)));
        registry
    }

    /// Adds an exporter under its own name, replacing any previous one.
    pub fn register(&mut self, exporter: Box<dyn Exporter>) {
        self.exporters.insert(exporter.name(), exporter);
    }

    /// Registered format names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.exporters.keys().copied().collect()
    }

    /// Looks up an exporter, ignoring case.
    ///
    /// # Errors
    /// Returns `UnsupportedFormat` if no exporter has that name.
    pub fn resolve(&mut self, format: &str) -> Result<&mut dyn Exporter> {
        let key = format.to_lowercase();
        let supported = self.names().join(", ");

        match self.exporters.get_mut(key.as_str()) {
            Some(exporter) => {
                let exporter: &mut dyn Exporter = exporter.as_mut();
                Ok(exporter)
            }
            None => Err(AppError::UnsupportedFormat {
                format: format.to_string(),
                supported,
            }),
        }
    }
}

impl Default for ExporterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Runs exports.
#[derive(Default)]
pub struct ExportEngine {
    registry: ExporterRegistry,
}

impl ExportEngine {
    /// Creates an engine with all built-in formats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with a custom registry.
    #[cfg(test)]
    #[must_use]
    pub const fn with_registry(registry: ExporterRegistry) -> Self {
        Self { registry }
    }

    /// Checks that `format` names a registered exporter.
    ///
    /// # Errors
    /// Returns `UnsupportedFormat` listing the registered names.
    pub fn ensure_supported(&mut self, format: &str) -> Result<()> {
        self.registry.resolve(format).map(|_| ())
    }

    /// Exports the loader's messages in `format` to `target`.
    ///
    /// The format is resolved before the target is opened, so an unknown
    /// format leaves the destination untouched. Returns the number of
    /// messages written.
    ///
    /// # Errors
    /// Returns `UnsupportedFormat` for an unknown format and `ExportFailed`
    /// wrapping any store, rendering or write error.
    pub fn export(
        &mut self,
        loader: &mut MessageLoader,
        format: &str,
        target: OutputTarget<'_>,
        encoding: &'static Encoding,
        mode: LoadMode,
    ) -> Result<usize> {
        let exporter = self.registry.resolve(format)?;

        tracing::debug!(
            format = exporter.name(),
            encoding = encoding.name(),
            ?mode,
            "Starting export"
        );

        let count = run_session(exporter, loader, target, encoding, mode)
            .map_err(AppError::export_failed)?;

        tracing::info!("export finished, {} sms", count);

        Ok(count)
    }
}

/// One begin/emit/finish pass bound to a single sink.
fn run_session(
    exporter: &mut dyn Exporter,
    loader: &mut MessageLoader,
    target: OutputTarget<'_>,
    encoding: &'static Encoding,
    mode: LoadMode,
) -> Result<usize> {
    if mode == LoadMode::Preload && !loader.is_preloaded() {
        loader.preload()?;
    }

    let mut sink = target.open(encoding)?;

    exporter.begin(&sink)?;
    let count = loader.for_each(|message| exporter.emit(&mut sink, message))?;
    exporter.finish(&mut sink)?;
    sink.flush()?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::filter::RecordFilter;
    use crate::domain::Message;
    use crate::infrastructure::OutputSink;
    use crate::test_support::{create_message_db, row};
    use encoding_rs::{UTF_8, WINDOWS_1252};
    use tempfile::{tempdir, TempDir};

    fn fixture() -> (TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sms.db");
        create_message_db(
            &path,
            &[
                row(1, 1_240_000_000, Some("+41791234567"), Some("Grüezi"), 2),
                row(2, 1_240_000_060, Some("0791234567"), Some("Salut"), 3),
                row(3, 1_240_000_120, Some("+41791234567"), None, 2),
                row(4, 1_240_000_180, Some("+41781112233"), Some("Ciao"), 3),
            ],
        );
        (dir, path)
    }

    fn export_to_vec(path: &std::path::Path, format: &str, mode: LoadMode) -> (usize, Vec<u8>) {
        let mut loader = MessageLoader::open(path, RecordFilter::default()).unwrap();
        let mut buf = Vec::new();
        let count = ExportEngine::new()
            .export(
                &mut loader,
                format,
                OutputTarget::Writer(&mut buf),
                UTF_8,
                mode,
            )
            .unwrap();
        loader.close().unwrap();
        (count, buf)
    }

    #[test]
    fn test_registry_defaults() {
        let registry = ExporterRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["csv", "html", "json", "txt", "xml"]);
    }

    #[test]
    fn test_resolve_ignores_case() {
        let mut registry = ExporterRegistry::with_defaults();
        assert_eq!(registry.resolve("JSON").unwrap().name(), "json");
    }

    #[test]
    fn test_unsupported_format_writes_nothing() {
        let (_dir, path) = fixture();
        let mut loader = MessageLoader::open(&path, RecordFilter::default()).unwrap();
        let mut buf = Vec::new();

        let result = ExportEngine::new().export(
            &mut loader,
            "pdf",
            OutputTarget::Writer(&mut buf),
            UTF_8,
            LoadMode::Preload,
        );

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat { .. }));
        assert_eq!(err.exit_code(), crate::domain::error::EXIT_ERROR_EXPORTER);
        assert!(err.to_string().contains("csv, html, json, txt, xml"));
        assert!(buf.is_empty());
        assert!(!loader.is_preloaded());
    }

    #[test]
    fn test_ensure_supported() {
        let mut engine = ExportEngine::new();
        assert!(engine.ensure_supported("HTML").is_ok());
        assert!(matches!(
            engine.ensure_supported("pdf"),
            Err(AppError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_unsupported_format_does_not_create_file() {
        let (dir, path) = fixture();
        let out = dir.path().join("out.pdf");
        let mut loader = MessageLoader::open(&path, RecordFilter::default()).unwrap();

        let result = ExportEngine::new().export(
            &mut loader,
            "pdf",
            OutputTarget::File(out.clone()),
            UTF_8,
            LoadMode::Stream,
        );

        assert!(result.is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_export_counts_accepted_messages() {
        let (_dir, path) = fixture();
        for format in ["txt", "csv", "json", "xml", "html"] {
            let (count, buf) = export_to_vec(&path, format, LoadMode::Preload);
            assert_eq!(count, 3, "format {format}");
            assert!(!buf.is_empty(), "format {format}");
        }
    }

    #[test]
    fn test_preload_and_stream_produce_identical_output() {
        let (_dir, path) = fixture();
        for format in ["txt", "csv", "json", "xml", "html"] {
            let preloaded = export_to_vec(&path, format, LoadMode::Preload);
            let streamed = export_to_vec(&path, format, LoadMode::Stream);
            assert_eq!(preloaded, streamed, "format {format}");
        }
    }

    #[test]
    fn test_direction_labels_across_formats() {
        let (_dir, path) = fixture();

        let txt = String::from_utf8(export_to_vec(&path, "txt", LoadMode::Stream).1).unwrap();
        assert!(txt.contains("message 1 from +41791234567"));
        assert!(txt.contains("message 2 to 0791234567"));

        let xml = String::from_utf8(export_to_vec(&path, "xml", LoadMode::Stream).1).unwrap();
        assert!(xml.contains("id=\"1\" type=\"income\""));
        assert!(xml.contains("id=\"2\" type=\"outcome\""));

        let html = String::from_utf8(export_to_vec(&path, "html", LoadMode::Stream).1).unwrap();
        assert!(html.contains("message income\" id=\"message-1\""));
        assert!(html.contains("message outcome\" id=\"message-4\""));
    }

    #[test]
    fn test_filter_reaches_exporter() {
        let (_dir, path) = fixture();
        let filter = RecordFilter::new(Some(r"^\+41")).unwrap();
        let mut loader = MessageLoader::open(&path, filter).unwrap();
        let mut buf = Vec::new();

        let count = ExportEngine::new()
            .export(
                &mut loader,
                "json",
                OutputTarget::Writer(&mut buf),
                UTF_8,
                LoadMode::Stream,
            )
            .unwrap();

        let parsed: Vec<Message> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(count, 2);
        assert_eq!(parsed.len(), 2);
        assert!(parsed.iter().all(|m| m.address.starts_with("+41")));
    }

    #[test]
    fn test_encoding_applies_to_whole_document() {
        let (_dir, path) = fixture();
        let mut loader = MessageLoader::open(&path, RecordFilter::default()).unwrap();
        let mut buf = Vec::new();

        ExportEngine::new()
            .export(
                &mut loader,
                "xml",
                OutputTarget::Writer(&mut buf),
                WINDOWS_1252,
                LoadMode::Preload,
            )
            .unwrap();

        let (text, _, had_errors) = WINDOWS_1252.decode(&buf);
        assert!(!had_errors);
        assert!(text.contains("encoding=\"windows-1252\""));
        assert!(text.contains(">Grüezi</message>"));
        assert!(buf.windows(2).all(|w| w != "ü".as_bytes()));
    }

    struct FailingExporter;

    impl Exporter for FailingExporter {
        fn name(&self) -> &'static str {
            "fail"
        }

        fn begin(&mut self, _sink: &OutputSink<'_>) -> Result<()> {
            Ok(())
        }

        fn emit(&mut self, _sink: &mut OutputSink<'_>, _message: &Message) -> Result<()> {
            Err(AppError::Config {
                message: "cannot render".into(),
            })
        }

        fn finish(&mut self, _sink: &mut OutputSink<'_>) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_runtime_errors_become_export_failed() {
        let (_dir, path) = fixture();
        let mut registry = ExporterRegistry::new();
        registry.register(Box::new(FailingExporter));
        let mut engine = ExportEngine::with_registry(registry);
        let mut loader = MessageLoader::open(&path, RecordFilter::default()).unwrap();
        let mut buf = Vec::new();

        let err = engine
            .export(
                &mut loader,
                "fail",
                OutputTarget::Writer(&mut buf),
                UTF_8,
                LoadMode::Stream,
            )
            .unwrap_err();

        assert!(matches!(err, AppError::ExportFailed { .. }));
        assert_eq!(err.exit_code(), crate::domain::error::EXIT_ERROR);
        loader.close().unwrap();
    }
}
