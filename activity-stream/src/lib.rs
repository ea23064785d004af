//! # Activity Stream
//!
//! Activity feed ingestion for Shotgun - fetches the activity stream of an
//! entity and normalizes its heterogeneous updates into display-ready items.
//!
//! ## Architecture
//!
//! The pipeline follows the Fetcher-Processor-Assembler pattern:
//!
//! 1. **Fetcher**: Requests one page of the activity stream
//! 2. **Processor**: Dispatches each update by entity type and normalizes it
//! 3. **Resolver**: Looks up attachment URLs for Notes
//! 4. **Assembler**: Collects accepted items in feed order
//! 5. **Orchestrator**: Coordinates the flow and handles cancellation
//!
//! ## Modules
//!
//! - [`config`]: Dependency initialization from the environment
//! - [`fetcher`]: Activity stream requests
//! - [`processor`]: Update dispatch and entity normalizers
//! - [`resolver`]: Attachment lookups
//! - [`assembler`]: Page assembly
//! - [`orchestrator`]: Coordinates a fetch
//! - [`errors`]: Error types for the pipeline

pub mod assembler;
pub mod config;
pub mod errors;
pub mod fetcher;
pub mod orchestrator;
pub mod processor;
pub mod resolver;

pub use config::Dependencies;
pub use errors::ActivityError;
pub use fetcher::FeedQuery;
pub use orchestrator::{ActivityStream, StreamConfig};

use thiserror::Error;

/// Errors that can occur in the activity stream binary.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fetch error.
    #[error("Activity error: {0}")]
    Activity(#[from] ActivityError),

    /// The page could not be written out.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
