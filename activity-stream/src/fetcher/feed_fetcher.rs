//! Activity stream fetcher implementation.

use std::sync::Arc;

use tracing::{debug, error, instrument};

use activity_stream_shared::ActivityStreamResponse;
use shotgun_gateway::{QueryGateway, ShotgunError};

use crate::errors::ActivityError;
use crate::fetcher::FeedQuery;

/// Fetches raw activity stream pages through the query gateway.
pub struct FeedFetcher {
    gateway: Arc<dyn QueryGateway>,
}

impl FeedFetcher {
    pub fn new(gateway: Arc<dyn QueryGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch and decode one page of the activity stream.
    ///
    /// # Returns
    ///
    /// * `Ok(ActivityStreamResponse)` - The decoded envelope, updates in remote order
    /// * `Err(ActivityError)` - Invalid query, gateway failure or undecodable envelope
    #[instrument(skip(self, query), fields(
        entity_type = %query.entity_type,
        entity_id = query.entity_id,
        page_size = query.page_size,
        since_id = query.since_id
    ))]
    pub async fn fetch(&self, query: &FeedQuery) -> Result<ActivityStreamResponse, ActivityError> {
        query.validate()?;

        let value = self
            .gateway
            .get(&query.path(), &query.params())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch activity stream");
                match e {
                    ShotgunError::Decode(msg) => ActivityError::Decode(msg),
                    other => ActivityError::Gateway(other),
                }
            })?;

        let response: ActivityStreamResponse = serde_json::from_value(value).map_err(|e| {
            error!(error = %e, "Failed to decode activity stream envelope");
            ActivityError::from(e)
        })?;

        debug!(
            update_count = response.data.updates.len(),
            latest_update_id = response.data.latest_update_id,
            earliest_update_id = response.data.earliest_update_id,
            "Fetched activity stream page"
        );
        Ok(response)
    }
}
