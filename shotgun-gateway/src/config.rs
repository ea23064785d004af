//! Configuration types for the Shotgun gateway.

use std::env;
use std::time::Duration;

use url::Url;

use crate::errors::ShotgunError;

/// Default request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connection settings for a Shotgun site.
///
/// Built once at startup and handed to [`crate::ShotgunClient`]; nothing in the
/// gateway reads the environment after construction.
#[derive(Debug, Clone)]
pub struct ShotgunConfig {
    /// REST root of the site, e.g. `https://studio.shotgunstudio.com/api/v1`.
    pub base_url: String,
    /// Script name used for the client credentials grant.
    pub client_id: String,
    /// Script key used for the client credentials grant.
    pub client_secret: String,
    /// Timeout applied to every HTTP request.
    pub request_timeout: Duration,
}

impl ShotgunConfig {
    /// Create a config with the default request timeout.
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Override the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Read the configuration from environment variables and validate it.
    ///
    /// # Environment Variables
    ///
    /// - `SHOTGUN_URL`: REST root of the site (required)
    /// - `SHOTGUN_CLIENT_ID`: script name (required)
    /// - `SHOTGUN_SECRET`: script key (required)
    /// - `SHOTGUN_REQUEST_TIMEOUT_SECS`: request timeout (default: 30)
    pub fn from_env() -> Result<Self, ShotgunError> {
        let base_url = required_var("SHOTGUN_URL")?;
        let client_id = required_var("SHOTGUN_CLIENT_ID")?;
        let client_secret = required_var("SHOTGUN_SECRET")?;
        let timeout_secs = match env::var("SHOTGUN_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                ShotgunError::invalid_config(format!(
                    "SHOTGUN_REQUEST_TIMEOUT_SECS must be a number of seconds: {}",
                    e
                ))
            })?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let config = Self::new(base_url, client_id, client_secret)
            .with_request_timeout(Duration::from_secs(timeout_secs));
        config.validate()?;
        Ok(config)
    }

    /// Check the required fields once, before any request is made.
    pub fn validate(&self) -> Result<(), ShotgunError> {
        if self.base_url.trim().is_empty() {
            return Err(ShotgunError::invalid_config("base_url must not be empty"));
        }
        let parsed = Url::parse(&self.base_url).map_err(|e| {
            ShotgunError::invalid_config(format!("base_url '{}' is not a URL: {}", self.base_url, e))
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ShotgunError::invalid_config(format!(
                "base_url '{}' cannot be used as a base",
                self.base_url
            )));
        }
        if self.client_id.trim().is_empty() {
            return Err(ShotgunError::invalid_config("client_id must not be empty"));
        }
        if self.client_secret.trim().is_empty() {
            return Err(ShotgunError::invalid_config(
                "client_secret must not be empty",
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ShotgunError::invalid_config(
                "request_timeout must be > 0",
            ));
        }
        Ok(())
    }

    /// Build an absolute URL under the base URL from already-formatted path segments.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ShotgunError> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&url).map_err(|e| ShotgunError::transport(format!("invalid url '{}': {}", url, e)))
    }
}

fn required_var(name: &str) -> Result<String, ShotgunError> {
    env::var(name).map_err(|_| ShotgunError::invalid_config(format!("{} is not set", name)))
}
