//! Application layer - use cases and orchestration.
//!
//! Discovery, selection, loading and export of SMS databases.

pub mod engine;
pub mod exporters;
pub mod filter;
pub mod loader;
pub mod locator;
pub mod selector;

pub use engine::ExportEngine;
pub use filter::RecordFilter;
pub use loader::MessageLoader;
pub use locator::DatabaseLocator;
pub use selector::{CandidateSelector, Selection};
