//! Configuration file management.
//!
//! Handles loading the optional TOML configuration file.

use std::fs;
use std::path::Path;

use crate::domain::{AppConfig, AppError, Result};

/// Reference configuration, documenting every key.
#[cfg(test)]
const DEFAULT_CONFIG: &str = r#"# export-iphone-sms configuration

[discovery]
# Backup root (defaults to ~/Library/Application Support/MobileSync)
# backup_dir = "/path/to/backup"

# "file-name" matches the content-addressed sms.db name,
# "content-signature" probes *.mddata files for the SQLite header
strategy = "file-name"
file_name = "3d0d7e5fb2ce288813306e4d4636395e047a3d28"
extension = "mddata"

[export]
encoding = "utf-8"
quiet = false

# "preload" reads all messages first, "stream" exports while reading
mode = "preload"
"#;

/// Load configuration from `path`, or from the default location.
///
/// An explicit path must exist. The default file is optional.
///
/// # Errors
/// Returns error if a file exists but cannot be read or parsed, or if an
/// explicit path does not exist.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = path {
        return load_config_from_file(path);
    }

    let config_path = AppConfig::default_config_path();

    if config_path.exists() {
        load_config_from_file(&config_path)
    } else {
        Ok(AppConfig::default())
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file: {}", path.display()), e))?;

    let config = toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file: {e}"),
    })?;

    tracing::debug!(path = %path.display(), "Configuration loaded");

    Ok(config)
}
