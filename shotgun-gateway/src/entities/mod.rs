//! Typed accessors for individual entity types.
//!
//! Each accessor is a thin projection over [`QueryGateway`](crate::QueryGateway):
//! it issues one find/search/create/update call and maps the JSON:API style
//! record (`{id, attributes, relationships}`) onto a flat data type.

pub mod attachments;
pub mod event_log;
pub mod media;
pub mod notes;
pub mod versions;

use activity_stream_shared::{null_as_default, LinkField};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::ShotgunError;

/// `{"data": ...}` wrapper around every successful response.
#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned + Default")]
pub(crate) struct DataEnvelope<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: T,
}

/// A single relationship value, e.g. `"sg_task": {"data": {...}}`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Relationship {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: LinkField,
}

/// A to-many relationship value, e.g. `"open_notes": {"data": [...]}`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ManyRelationship {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<LinkField>,
}

/// Decode the `data` member of a response into `T`.
pub(crate) fn decode_data<T>(value: Value) -> Result<T, ShotgunError>
where
    T: DeserializeOwned + Default,
{
    let envelope: DataEnvelope<T> = serde_json::from_value(value)?;
    Ok(envelope.data)
}
