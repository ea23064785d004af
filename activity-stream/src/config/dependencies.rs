//! Dependency initialization and wiring for the activity stream binary.

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use shotgun_gateway::{ShotgunClient, ShotgunConfig};

use crate::fetcher::FeedQuery;
use crate::orchestrator::{ActivityStream, StreamConfig};
use crate::AppError;

/// Default number of updates requested per page.
const DEFAULT_PAGE_SIZE: i64 = 25;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured activity stream ready to fetch.
    pub stream: ActivityStream,
    /// The page to fetch.
    pub query: FeedQuery,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SHOTGUN_URL`, `SHOTGUN_CLIENT_ID`, `SHOTGUN_SECRET`,
    ///   `SHOTGUN_REQUEST_TIMEOUT_SECS`: see [`ShotgunConfig::from_env`]
    /// - `FEED_ENTITY_TYPE`: type of the root entity (required)
    /// - `FEED_ENTITY_ID`: id of the root entity (required)
    /// - `FEED_PAGE_SIZE`: updates per page (default: 25)
    /// - `FEED_SINCE_ID`: only fetch updates newer than this id (default: 0)
    /// - `FEED_MAX_CONCURRENT_LOOKUPS`: concurrency bound (default: 8)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If a variable is missing or malformed
    pub fn from_env() -> Result<Self, AppError> {
        let shotgun_config = ShotgunConfig::from_env()
            .map_err(|e| AppError::config(format!("Invalid Shotgun configuration: {}", e)))?;

        let entity_type = env::var("FEED_ENTITY_TYPE")
            .map_err(|_| AppError::config("FEED_ENTITY_TYPE is not set"))?;
        let entity_id = required_number::<i64>("FEED_ENTITY_ID")?;
        let page_size = optional_number("FEED_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let since_id = optional_number("FEED_SINCE_ID", 0i64)?;
        let max_concurrent_lookups =
            optional_number(
            "FEED_MAX_CONCURRENT_LOOKUPS",
            StreamConfig::default().max_concurrent_lookups,
        )?;

        let query = FeedQuery::new(entity_type, entity_id, page_size).since(since_id);
        query
            .validate()
            .map_err(|e| AppError::config(e.to_string()))?;

        info!(
            shotgun_url = %shotgun_config.base_url,
            entity_type = %query.entity_type,
            entity_id = query.entity_id,
            page_size = query.page_size,
            since_id = query.since_id,
            max_concurrent_lookups,
            "Initializing dependencies"
        );

        let client = ShotgunClient::from_config(shotgun_config)
            .map_err(|e| AppError::config(format!("Failed to create Shotgun client: {}", e)))?;

        let stream = ActivityStream::with_config(
            Arc::new(client),
            StreamConfig {
                max_concurrent_lookups,
            },
        );

        Ok(Self { stream, query })
    }
}

fn required_number<T: FromStr>(name: &str) -> Result<T, AppError> {
    let raw = env::var(name).map_err(|_| AppError::config(format!("{} is not set", name)))?;
    parse_number(name, &raw)
}

fn optional_number<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => parse_number(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_number<T: FromStr>(name: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| AppError::config(format!("{} must be a number, got '{}'", name, raw)))
}
