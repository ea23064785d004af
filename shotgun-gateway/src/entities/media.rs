//! Thumbnail and media URLs.

use serde::Deserialize;
use tracing::instrument;

use crate::errors::ShotgunError;
use crate::interfaces::QueryGateway;

#[derive(Debug, Deserialize)]
struct UrlResponse {
    #[serde(default)]
    data: Option<String>,
}

/// Resolve the URL stored in an image/media field, e.g. `image` on a Shot.
///
/// Returns an empty string when the field is unset.
#[instrument(skip(gateway))]
pub async fn thumbnail_url<G>(
    gateway: &G,
    entity_type: &str,
    entity_id: i64,
    field: &str,
) -> Result<String, ShotgunError>
where
    G: QueryGateway + ?Sized,
{
    let path = format!("entity/{}/{}/{}", entity_type, entity_id, field);
    let value = gateway.get(&path, &[]).await?;
    let response: UrlResponse = serde_json::from_value(value)?;
    Ok(response.data.unwrap_or_default())
}
