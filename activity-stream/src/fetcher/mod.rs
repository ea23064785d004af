//! Fetcher module for the activity stream pipeline.
//!
//! Issues the paginated activity stream request for one root entity.

mod feed_fetcher;
mod query;

pub use feed_fetcher::FeedFetcher;
pub use query::FeedQuery;
