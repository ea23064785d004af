//! Error types for the activity stream pipeline.

use shotgun_gateway::ShotgunError;
use thiserror::Error;

/// Errors that abort an activity stream fetch.
///
/// Per-update problems (unknown entity types, rejected payloads, failed
/// attachment lookups) never surface here; they only shrink the page.
#[derive(Error, Debug)]
pub enum ActivityError {
    /// Authentication, transport, body read or remote error from the gateway.
    #[error("Gateway error: {0}")]
    Gateway(#[from] ShotgunError),

    /// The feed envelope could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The query was rejected before any request was made.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The fetch was aborted by a shutdown signal.
    #[error("Fetch cancelled")]
    Cancelled,
}

impl ActivityError {
    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an invalid query error.
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }
}

impl From<serde_json::Error> for ActivityError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
