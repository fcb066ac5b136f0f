//! Domain-level error types for export-iphone-sms.
//!
//! All errors are typed with `thiserror`. Each variant maps onto one of the
//! process exit statuses the tool documents.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit status: everything went fine (also used for a user quit).
pub const EXIT_SUCCESS: i32 = 0;
/// Process exit status: generic failure.
pub const EXIT_ERROR: i32 = 1;
/// Process exit status: several databases found while running quiet.
pub const EXIT_ERROR_QUIET: i32 = 2;
/// Process exit status: no exporter registered for the requested format.
pub const EXIT_ERROR_EXPORTER: i32 = 3;
/// Process exit status: no SMS database found under the backup root.
pub const EXIT_ERROR_NOT_FOUND: i32 = 4;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// No valid SMS database under the backup root.
    #[error("SMS database not found under: {}", root.display())]
    DatabaseNotFound { root: PathBuf },

    /// More than one candidate and no way to ask the user.
    #[error("cannot export in quiet mode, {count} sms databases found")]
    AmbiguousCandidates { count: usize },

    /// No exporter registered under the requested name.
    #[error("no exporter for \"{format}\" (supported: {supported})")]
    UnsupportedFormat { format: String, supported: String },

    /// Reading or rendering records failed part way through an export.
    #[error("export failed: {message}")]
    ExportFailed {
        message: String,
        #[source]
        source: Box<AppError>,
    },

    /// Failed to open or query the database.
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON serialization failed.
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The address filter is not a valid regular expression.
    #[error("Invalid address filter \"{pattern}\"")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Create a database error from rusqlite error.
    pub fn database(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Create a JSON error.
    pub fn json(err: serde_json::Error) -> Self {
        Self::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }

    /// Wrap any failure raised while records were being exported.
    #[must_use]
    pub fn export_failed(err: Self) -> Self {
        Self::ExportFailed {
            message: err.to_string(),
            source: Box::new(err),
        }
    }

    /// Exit status reported to the shell for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::DatabaseNotFound { .. } => EXIT_ERROR_NOT_FOUND,
            Self::AmbiguousCandidates { .. } => EXIT_ERROR_QUIET,
            Self::UnsupportedFormat { .. } => EXIT_ERROR_EXPORTER,
            _ => EXIT_ERROR,
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
