//! SMS database discovery.
//!
//! Walks a backup tree, picks out files that look like the SMS store and
//! keeps the ones that answer the message query.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::domain::config::DiscoveryConfig;
use crate::domain::{Candidate, DiscoveryStrategy};
use crate::infrastructure::{default_backup_dir, MessageStore};

/// First bytes of every `SQLite` 3 database file.
const SQLITE_HEADER: &[u8; 16] = b"SQLite format 3\0";

/// Scans a backup root for SMS databases.
#[derive(Debug, Clone)]
pub struct DatabaseLocator {
    root: PathBuf,
    strategy: DiscoveryStrategy,
}

impl DatabaseLocator {
    /// Creates a locator for `root` using one discovery policy.
    pub fn new(root: impl Into<PathBuf>, strategy: DiscoveryStrategy) -> Self {
        Self {
            root: root.into(),
            strategy,
        }
    }

    /// Creates a locator from the discovery settings.
    #[must_use]
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        let root = config
            .backup_dir
            .clone()
            .unwrap_or_else(default_backup_dir);
        Self::new(root, config.strategy())
    }

    /// Backup root being scanned.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily yields files that pass the name or content probe, in walk order.
    ///
    /// Each call starts a fresh walk.
    pub fn probe_matches(&self) -> impl Iterator<Item = PathBuf> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(move |entry| self.matches(entry))
            .map(DirEntry::into_path)
    }

    /// Returns every probed file that validates, in walk order.
    #[must_use]
    pub fn locate(&self) -> Vec<Candidate> {
        tracing::info!("locating sms database in {}", self.root.display());

        if !self.root.is_dir() {
            tracing::warn!("Backup directory does not exist: {}", self.root.display());
        }

        self.probe_matches()
            .filter_map(|path| validate_candidate(&path))
            .collect()
    }

    fn matches(&self, entry: &DirEntry) -> bool {
        match &self.strategy {
            DiscoveryStrategy::FileName { name } => {
                entry.file_name() == std::ffi::OsStr::new(name)
            }
            DiscoveryStrategy::ContentSignature { extension } => {
                let path = entry.path();
                path.extension()
                    .is_some_and(|ext| ext == std::ffi::OsStr::new(extension))
                    && has_sqlite_header(path)
            }
        }
    }
}

/// Checks the first 16 bytes of `path` against the `SQLite` header.
fn has_sqlite_header(path: &Path) -> bool {
    let mut header = [0u8; SQLITE_HEADER.len()];
    File::open(path)
        .and_then(|mut file| file.read_exact(&mut header))
        .is_ok_and(|()| &header == SQLITE_HEADER)
}

/// Opens `path` read-only and runs the summary query.
///
/// Any failure just means the file is not the store we want.
fn validate_candidate(path: &Path) -> Option<Candidate> {
    let summary = MessageStore::open(path).and_then(|store| {
        let summary = store.summary();
        if let Err(e) = store.close() {
            tracing::debug!("Failed to close {}: {}", path.display(), e);
        }
        summary
    });

    match summary {
        Ok(Some(summary)) => {
            tracing::debug!(
                path = %path.display(),
                count = summary.count,
                "Valid sms database"
            );
            Some(Candidate {
                path: path.to_path_buf(),
                count: summary.count,
                latest_timestamp: summary.latest.timestamp,
            })
        }
        Ok(None) => {
            tracing::debug!("Rejected {}: no messages", path.display());
            None
        }
        Err(e) => {
            tracing::debug!("Rejected {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::SMS_DB_FILE_NAME;
    use crate::test_support::{create_message_db, row};
    use rusqlite::Connection;
    use tempfile::tempdir;

    fn signature_strategy() -> DiscoveryStrategy {
        DiscoveryStrategy::ContentSignature {
            extension: "mddata".into(),
        }
    }

    fn name_strategy() -> DiscoveryStrategy {
        DiscoveryStrategy::FileName {
            name: SMS_DB_FILE_NAME.into(),
        }
    }

    #[test]
    fn test_only_validated_files_survive() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("a/b")).unwrap();

        // Three probe matches: a real store, a foreign schema, an empty store.
        create_message_db(
            &root.join("a/b/1111.mddata"),
            &[row(1, 1_000, Some("+41"), Some("hi"), 2)],
        );
        let conn = Connection::open(root.join("a/2222.mddata")).unwrap();
        conn.execute_batch("CREATE TABLE contacts (id INTEGER, name TEXT);")
            .unwrap();
        drop(conn);
        create_message_db(&root.join("3333.mddata"), &[]);

        // Not probed at all.
        std::fs::write(root.join("4444.mddata"), b"not a database at all").unwrap();
        create_message_db(
            &root.join("5555.mdinfo"),
            &[row(1, 1_000, Some("+41"), Some("hi"), 2)],
        );

        let locator = DatabaseLocator::new(root, signature_strategy());
        assert_eq!(locator.probe_matches().count(), 3);

        let candidates = locator.locate();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].path.ends_with("a/b/1111.mddata"));
        assert_eq!(candidates[0].count, 1);
        assert_eq!(candidates[0].latest_timestamp, 1_000);
    }

    #[test]
    fn test_file_name_strategy() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("backup/3d")).unwrap();

        create_message_db(
            &root.join("backup/3d").join(SMS_DB_FILE_NAME),
            &[
                row(1, 1_000, Some("+41"), Some("hi"), 2),
                row(2, 5_000, Some("+41"), Some("later"), 3),
            ],
        );
        create_message_db(
            &root.join("backup/other.mddata"),
            &[row(1, 1_000, Some("+41"), Some("hi"), 2)],
        );

        let candidates = DatabaseLocator::new(root, name_strategy()).locate();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].count, 2);
        assert_eq!(candidates[0].latest_timestamp, 5_000);
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let dir = tempdir().unwrap();
        let locator = DatabaseLocator::new(dir.path().join("absent"), name_strategy());
        assert!(locator.locate().is_empty());
    }

    #[test]
    fn test_inspected_files_are_not_modified() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.mddata");
        create_message_db(&path, &[row(1, 1_000, Some("+41"), Some("hi"), 2)]);
        let before = std::fs::read(&path).unwrap();

        let candidates = DatabaseLocator::new(dir.path(), signature_strategy()).locate();
        assert_eq!(candidates.len(), 1);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_from_config_uses_backup_dir() {
        let config = DiscoveryConfig {
            backup_dir: Some(PathBuf::from("/tmp/backup")),
            ..Default::default()
        };
        let locator = DatabaseLocator::from_config(&config);
        assert_eq!(locator.root(), Path::new("/tmp/backup"));
    }

    #[test]
    fn test_sqlite_header_probe() {
        let dir = tempdir().unwrap();
        let short = dir.path().join("short.mddata");
        std::fs::write(&short, b"SQLite").unwrap();
        assert!(!has_sqlite_header(&short));

        let db = dir.path().join("db.mddata");
        create_message_db(&db, &[]);
        assert!(has_sqlite_header(&db));
    }
}
