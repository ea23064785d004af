//! Query gateway trait definition.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ShotgunError;
use crate::query::{Filters, PageParam, SortParam};

/// Generic entity query and update API of the remote service.
///
/// Every call is authenticated and returns the decoded JSON document as-is;
/// typed projections are the caller's concern. HTTP statuses >= 400 surface as
/// [`ShotgunError::Remote`].
#[async_trait]
pub trait QueryGateway: Send + Sync {
    /// Point lookup of a single entity projected to `fields`.
    async fn find(&self, entity_type: &str, id: i64, fields: &[&str])
        -> Result<Value, ShotgunError>;

    /// Filtered, sorted and optionally paginated query.
    async fn search(
        &self,
        entity_type: &str,
        filters: &Filters,
        fields: &[&str],
        page: Option<PageParam>,
        sort: &[SortParam],
    ) -> Result<Value, ShotgunError>;

    /// Create an entity from a JSON body.
    async fn create(&self, entity_type: &str, body: &Value) -> Result<Value, ShotgunError>;

    /// Update an entity, returning `fields` of the updated record.
    async fn update(
        &self,
        entity_type: &str,
        id: i64,
        fields: &[&str],
        body: &Value,
    ) -> Result<Value, ShotgunError>;

    /// Authenticated `GET` of an arbitrary path below the base URL.
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, ShotgunError>;
}
