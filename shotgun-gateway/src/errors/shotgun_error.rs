//! Shotgun gateway error types.
//!
//! This module defines the unified error type for all gateway operations,
//! from configuration problems through transport failures to structured
//! errors returned by the remote service.

use std::fmt;

use activity_stream_shared::null_as_default;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry of the `errors` array returned with HTTP status >= 400.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteErrorBody {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: u16,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub detail: String,
}

/// Structured error response of the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    /// HTTP status of the response.
    pub status: u16,
    pub errors: Vec<RemoteErrorBody>,
}

#[derive(Deserialize)]
struct RemoteErrorEnvelope {
    #[serde(default)]
    errors: Vec<RemoteErrorBody>,
}

impl RemoteError {
    /// Decode an error response body.
    ///
    /// Bodies that are not a valid `{"errors": [...]}` document (or carry an
    /// empty list) are kept as a single entry holding the raw text, so the
    /// HTTP status is never lost.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let errors = match serde_json::from_slice::<RemoteErrorEnvelope>(body) {
            Ok(envelope) if !envelope.errors.is_empty() => envelope.errors,
            _ => vec![RemoteErrorBody {
                status,
                code: 0,
                title: format!("HTTP {}", status),
                detail: String::from_utf8_lossy(body).trim().to_string(),
            }],
        };

        Self { status, errors }
    }

    /// Every error folded into one message, `"{title}: {detail}"` per line.
    pub fn message(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.title, e.detail))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Unified errors from gateway operations.
#[derive(Debug, Error)]
pub enum ShotgunError {
    /// Configuration is missing or malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Token acquisition failed.
    #[error("Authentication failed: {0}")]
    Authentication(#[source] Box<ShotgunError>),

    /// Request construction or network I/O failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be read.
    #[error("Failed to read response body: {0}")]
    ReadBody(String),

    /// The remote service answered with HTTP status >= 400.
    #[error("Remote error ({status}): {0}", status = .0.status)]
    Remote(RemoteError),

    /// The response body is not the JSON document we expected.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ShotgunError {
    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Wrap a failure that happened while acquiring a token.
    pub fn authentication(source: ShotgunError) -> Self {
        Self::Authentication(Box::new(source))
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a read body error.
    pub fn read_body(msg: impl Into<String>) -> Self {
        Self::ReadBody(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// The structured remote error, if this is (or wraps) one.
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(remote) => Some(remote),
            Self::Authentication(source) => source.remote(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ShotgunError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_message_joins_title_and_detail() {
        let body = br#"{"errors":[{"status":422,"code":103,"title":"Invalid field","detail":"sg_foo does not exist"}]}"#;
        let remote = RemoteError::from_response(422, body);

        assert_eq!(remote.errors.len(), 1);
        assert_eq!(remote.errors[0].code, 103);
        assert_eq!(remote.message(), "Invalid field: sg_foo does not exist");

        let err = ShotgunError::Remote(remote);
        assert!(err
            .to_string()
            .contains("Invalid field: sg_foo does not exist"));
    }

    #[test]
    fn test_remote_error_message_folds_multiple_errors() {
        let body = br#"{"errors":[{"title":"A","detail":"one"},{"title":"B","detail":"two"}]}"#;
        let remote = RemoteError::from_response(400, body);
        assert_eq!(remote.message(), "A: one\nB: two");
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let body = br#"{"errors":[{"status":422,"code":null,"title":"Invalid limit","detail":null}]}"#;
        let remote = RemoteError::from_response(422, body);

        assert_eq!(remote.errors.len(), 1);
        assert_eq!(remote.errors[0].code, 0);
        assert_eq!(remote.message(), "Invalid limit: ");
    }

    #[test]
    fn test_undecodable_error_body_keeps_status() {
        let remote = RemoteError::from_response(502, b"<html>Bad Gateway</html>");
        assert_eq!(remote.status, 502);
        assert_eq!(remote.message(), "HTTP 502: <html>Bad Gateway</html>");
    }

    #[test]
    fn test_remote_is_reachable_through_authentication() {
        let remote = RemoteError::from_response(401, br#"{"errors":[{"title":"Unauthorized","detail":"bad secret"}]}"#);
        let err = ShotgunError::authentication(ShotgunError::Remote(remote));

        assert_eq!(err.remote().map(|r| r.status), Some(401));
        assert!(err.to_string().starts_with("Authentication failed"));
    }
}
