//! Configuration model.
//!
//! Built once at startup from the optional config file and the command line,
//! then handed by reference to the locator, loader and engine.

use std::path::PathBuf;

use serde::Deserialize;

use super::{AppError, Result};

/// Content-addressed file name of `Library/SMS/sms.db` in iOS backups.
pub const SMS_DB_FILE_NAME: &str = "3d0d7e5fb2ce288813306e4d4636395e047a3d28";

/// Extension of backup payload files in early iPhone backups.
pub const LEGACY_EXTENSION: &str = "mddata";

/// How candidate files are recognised while walking the backup tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Exact match on the content-addressed file name.
    #[default]
    FileName,
    /// Extension match plus the `SQLite` header probe.
    ContentSignature,
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file-name" | "filename" | "name" => Ok(Self::FileName),
            "content-signature" | "content" | "signature" => Ok(Self::ContentSignature),
            _ => Err(format!(
                "Unknown strategy: {s}. Use: file-name, content-signature"
            )),
        }
    }
}

/// A fully resolved discovery policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryStrategy {
    /// File name must equal `name`.
    FileName { name: String },
    /// Extension must equal `extension` and the file must start with the `SQLite` header.
    ContentSignature { extension: String },
}

/// Whether the loader materializes rows before exporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadMode {
    /// Read every accepted row into memory first.
    #[default]
    Preload,
    /// Feed rows to the exporter straight from the query cursor.
    Stream,
}

/// Discovery settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    /// Backup root to scan.
    #[serde(default)]
    pub backup_dir: Option<PathBuf>,

    /// Which recognition policy to use.
    #[serde(default)]
    pub strategy: StrategyKind,

    /// File name matched by the `file-name` strategy.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Extension matched by the `content-signature` strategy.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            backup_dir: None,
            strategy: StrategyKind::default(),
            file_name: default_file_name(),
            extension: default_extension(),
        }
    }
}

fn default_file_name() -> String {
    SMS_DB_FILE_NAME.to_string()
}

fn default_extension() -> String {
    LEGACY_EXTENSION.to_string()
}

impl DiscoveryConfig {
    /// Resolves the configured strategy kind into a concrete policy.
    #[must_use]
    pub fn strategy(&self) -> DiscoveryStrategy {
        match self.strategy {
            StrategyKind::FileName => DiscoveryStrategy::FileName {
                name: self.file_name.clone(),
            },
            StrategyKind::ContentSignature => DiscoveryStrategy::ContentSignature {
                extension: self.extension.trim_start_matches('.').to_string(),
            },
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Output encoding label (WHATWG names and aliases).
    #[serde(default = "default_encoding")]
    pub encoding: String,

    /// Suppress progress output and refuse to prompt.
    #[serde(default)]
    pub quiet: bool,

    /// Preload or stream rows.
    #[serde(default)]
    pub mode: LoadMode,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            encoding: default_encoding(),
            quiet: false,
            mode: LoadMode::default(),
        }
    }
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

impl ExportConfig {
    /// Looks up the configured encoding label.
    ///
    /// Only encodings that can be written are accepted. UTF-16 and the
    /// `replacement` encoding decode but always encode as UTF-8.
    ///
    /// # Errors
    /// Returns a config error if the label is unknown or cannot be encoded.
    pub fn output_encoding(&self) -> Result<&'static encoding_rs::Encoding> {
        let encoding = encoding_rs::Encoding::for_label(self.encoding.trim().as_bytes())
            .ok_or_else(|| AppError::Config {
                message: format!("Unknown encoding: {}", self.encoding),
            })?;

        if encoding.output_encoding() != encoding {
            return Err(AppError::Config {
                message: format!("Encoding {} is not supported for output", encoding.name()),
            });
        }

        Ok(encoding)
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Where and how to look for the database.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// How to write the export.
    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".export-iphone-sms")
    }

    /// Get the default config file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }
}
