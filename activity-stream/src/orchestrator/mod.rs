//! Orchestrator module for the activity stream pipeline.
//!
//! Coordinates the fetcher, processor, and assembler components.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

use activity_stream_shared::{ActivityFeedPage, ActivityItem};
use shotgun_gateway::QueryGateway;

use crate::assembler::ResultAssembler;
use crate::errors::ActivityError;
use crate::fetcher::{FeedFetcher, FeedQuery};
use crate::processor::EntityProcessor;
use crate::resolver::{AttachmentResolver, GatewayAttachmentResolver};

/// Default bound on concurrent normalizations and attachment lookups.
const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 8;

/// Configuration for the activity stream.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Maximum number of updates normalized at once, and of attachment
    /// lookups in flight across them.
    pub max_concurrent_lookups: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }
}

/// Fetches activity stream pages and normalizes them into activity items.
///
/// Every fetch is independent: nothing is cached between calls, and callers
/// keep their own cursor (`latest_update_id` of the last page).
pub struct ActivityStream {
    fetcher: FeedFetcher,
    processor: EntityProcessor,
    assembler: ResultAssembler,
    config: StreamConfig,
}

impl ActivityStream {
    /// Create a stream that fetches the feed and resolves attachments through
    /// `gateway`.
    pub fn new(gateway: Arc<dyn QueryGateway>) -> Self {
        Self::with_config(gateway, StreamConfig::default())
    }

    /// Create a stream with custom configuration.
    pub fn with_config(gateway: Arc<dyn QueryGateway>, config: StreamConfig) -> Self {
        let resolver = Arc::new(GatewayAttachmentResolver::new(gateway.clone()));
        Self::with_resolver(gateway, resolver, config)
    }

    /// Create a stream with a custom attachment resolver.
    pub fn with_resolver(
        gateway: Arc<dyn QueryGateway>,
        resolver: Arc<dyn AttachmentResolver>,
        config: StreamConfig,
    ) -> Self {
        let limit = config.max_concurrent_lookups.max(1);
        Self {
            fetcher: FeedFetcher::new(gateway),
            processor: EntityProcessor::new(resolver, limit),
            assembler: ResultAssembler::new(),
            config,
        }
    }

    /// Fetch one page of an entity's activity stream.
    ///
    /// `since_id > 0` requests only updates newer than that id; otherwise the
    /// most recent page is returned.
    pub async fn fetch_entity_activity(
        &self,
        entity_type: &str,
        entity_id: i64,
        page_size: i64,
        since_id: i64,
    ) -> Result<ActivityFeedPage, ActivityError> {
        let query = FeedQuery::new(entity_type, entity_id, page_size).since(since_id);
        self.fetch_activity(&query).await
    }

    /// Fetch and normalize one page.
    ///
    /// Either the whole page is returned or a single error; rejected updates
    /// only make the page shorter. Items keep the feed order.
    #[instrument(skip(self, query), fields(
        entity_type = %query.entity_type,
        entity_id = query.entity_id
    ))]
    pub async fn fetch_activity(&self, query: &FeedQuery) -> Result<ActivityFeedPage, ActivityError> {
        let response = self.fetcher.fetch(query).await?;
        let envelope = response.data;
        let limit = self.config.max_concurrent_lookups.max(1);

        let results: Vec<Option<ActivityItem>> = stream::iter(envelope.updates.iter())
            .map(|entry| self.processor.process(entry))
            .buffered(limit)
            .collect()
            .await;

        let page = self.assembler.assemble(&envelope, results);
        info!(
            update_count = envelope.updates.len(),
            item_count = page.len(),
            latest_update_id = page.latest_update_id,
            "Fetched activity"
        );
        Ok(page)
    }

    /// Like [`fetch_activity`](Self::fetch_activity), but gives up as soon as
    /// a shutdown signal is received.
    ///
    /// The outstanding request is dropped and [`ActivityError::Cancelled`] is
    /// returned; no partial page is produced. A closed channel never cancels.
    pub async fn fetch_activity_until(
        &self,
        query: &FeedQuery,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<ActivityFeedPage, ActivityError> {
        tokio::select! {
            biased;
            _ = wait_for_shutdown(&mut shutdown) => {
                warn!(entity_type = %query.entity_type, entity_id = query.entity_id, "Activity fetch cancelled");
                Err(ActivityError::Cancelled)
            }
            result = self.fetch_activity(query) => result,
        }
    }
}

async fn wait_for_shutdown(shutdown: &mut broadcast::Receiver<()>) {
    if let Err(broadcast::error::RecvError::Closed) = shutdown.recv().await {
        std::future::pending::<()>().await;
    }
}
