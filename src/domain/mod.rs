//! Domain layer - core types.
//!
//! This layer contains the message model, configuration types and
//! error types without any I/O.

pub mod config;
pub mod error;
pub mod models;

pub use config::{AppConfig, DiscoveryStrategy, LoadMode, StrategyKind};
pub use error::{AppError, Result, EXIT_SUCCESS};
pub use models::{Candidate, Direction, Message};
