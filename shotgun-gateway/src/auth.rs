//! OAuth2 token types for the Shotgun REST API.

use std::time::Duration;

use serde::Deserialize;
use tokio::time::Instant;

/// Tokens are refreshed this long before the server-side expiry.
pub(crate) const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Response of `POST /auth/access_token`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime of the token in seconds.
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: String,
}

impl AccessToken {
    /// Value of the `Authorization` header, e.g. `Bearer abc123`.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

/// A token together with the instant it stops being reused.
#[derive(Debug, Clone)]
pub(crate) struct CachedToken {
    pub(crate) token: AccessToken,
    refresh_at: Instant,
}

impl CachedToken {
    pub(crate) fn new(token: AccessToken, now: Instant) -> Self {
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        Self {
            token,
            refresh_at: now + lifetime,
        }
    }

    pub(crate) fn is_fresh(&self, now: Instant) -> bool {
        now < self.refresh_at
    }
}
