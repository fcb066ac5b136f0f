//! iPhone backup path discovery.
//!
//! Handles locating the `MobileSync` directory across platforms.

use std::path::PathBuf;

/// Known `MobileSync` locations relative to the home directory.
const MOBILESYNC_PATHS: &[&str] = &[
    // macOS
    "Library/Application Support/MobileSync",
    // Windows (iTunes)
    "AppData/Roaming/Apple Computer/MobileSync",
    // Windows (Apple Devices / Microsoft Store iTunes)
    "Apple/MobileSync",
];

/// Returns the default backup root.
///
/// The first existing known location wins; when none exists the macOS
/// location is returned so the caller reports a meaningful path.
#[must_use]
pub fn default_backup_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));

    for path in MOBILESYNC_PATHS {
        let full_path = home.join(path);
        if full_path.is_dir() {
            tracing::debug!("Found MobileSync at: {}", full_path.display());
            return full_path;
        }
    }

    home.join(MOBILESYNC_PATHS[0])
}
