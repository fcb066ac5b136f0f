//! Infrastructure layer - external adapters (database, filesystem, output).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod backup_paths;
pub mod config;
pub mod message_store;
pub mod output;

pub use backup_paths::default_backup_dir;
pub use config::load_config;
pub use message_store::MessageStore;
pub use output::{OutputSink, OutputTarget};
