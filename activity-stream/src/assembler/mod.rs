//! Assembler module for the activity stream pipeline.
//!
//! Collects normalized items into the page returned to the caller.

use tracing::debug;

use activity_stream_shared::{ActivityFeedPage, ActivityItem, ActivityStreamData};

/// Assembles the results of one fetch into an [`ActivityFeedPage`].
///
/// Results must be given in feed order; rejected updates (`None`) are dropped
/// without leaving a gap.
#[derive(Debug, Default)]
pub struct ResultAssembler;

impl ResultAssembler {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble<I>(&self, envelope: &ActivityStreamData, results: I) -> ActivityFeedPage
    where
        I: IntoIterator<Item = Option<ActivityItem>>,
    {
        let items: Vec<ActivityItem> = results.into_iter().flatten().collect();

        debug!(
            update_count = envelope.updates.len(),
            item_count = items.len(),
            "Assembled activity page"
        );

        ActivityFeedPage {
            items,
            latest_update_id: envelope.latest_update_id,
            earliest_update_id: envelope.earliest_update_id,
        }
    }
}
