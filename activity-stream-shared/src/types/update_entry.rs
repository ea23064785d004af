//! Raw activity stream records as returned by the remote feed endpoint.
//!
//! These types mirror the wire envelope closely. They are decoded once per fetch
//! and consumed immediately by the update dispatcher; nothing here is persisted.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::nullable::null_as_default;

/// The kind of change an update describes.
///
/// The feed documents `create`, `update` and `delete`; anything else is kept
/// verbatim so the normalizers can fall back to actor-attributed titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityType {
    Create,
    Update,
    Delete,
    Other(String),
}

impl ActivityType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Other(kind) => kind,
        }
    }
}

impl Default for ActivityType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for ActivityType {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "create" => Self::Create,
            "update" => Self::Update,
            "delete" => Self::Delete,
            _ => Self::Other(kind),
        }
    }
}

impl From<&str> for ActivityType {
    fn from(kind: &str) -> Self {
        Self::from(kind.to_string())
    }
}

impl From<ActivityType> for String {
    fn from(kind: ActivityType) -> Self {
        match kind {
            ActivityType::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user or script that produced an update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
}

impl Actor {
    pub fn new(id: i64, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: kind.into(),
        }
    }
}

/// Metadata naming the entity an update concerns.
///
/// `entity_type` is the tag the dispatcher routes on.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateMeta {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity_id: i64,
}

/// One element of a fetched feed page.
///
/// `primary_entity` is left untyped: its shape depends on `meta.entity_type`
/// and is only projected into a typed payload after the tag has been checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawUpdateEntry {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub update_type: ActivityType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: UpdateMeta,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub read: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub primary_entity: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_by: Actor,
}

/// Top-level envelope of the activity stream endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivityStreamResponse {
    pub data: ActivityStreamData,
}

/// Body of the activity stream envelope.
///
/// Updates arrive most recent first; the order is preserved as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivityStreamData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub latest_update_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub earliest_update_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updates: Vec<RawUpdateEntry>,
}
