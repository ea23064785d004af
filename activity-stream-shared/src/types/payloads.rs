//! Typed projections of the polymorphic "primary entity" payload.
//!
//! The payload embedded in every update is an untyped map whose shape depends
//! on the entity type tag it carries. A projection is only decoded after the
//! tag has been confirmed, see [`decode_payload`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::link_field::LinkField;
use crate::types::nullable::null_as_default;

/// A payload projection bound to the literal type tag it must carry.
pub trait PayloadTag: DeserializeOwned {
    /// The value the payload's `type` key must hold.
    const TYPE_TAG: &'static str;
}

/// Decode a primary entity payload into `P` if its `type` tag matches.
///
/// # Returns
///
/// * `Ok(Some(P))` - The tag matched and the payload decoded
/// * `Ok(None)` - The tag is missing or names another entity type
/// * `Err(serde_json::Error)` - The tag matched but the payload shape is malformed
pub fn decode_payload<P: PayloadTag>(
    payload: &Map<String, Value>,
) -> Result<Option<P>, serde_json::Error> {
    match payload.get("type").and_then(Value::as_str) {
        Some(tag) if tag == P::TYPE_TAG => {
            serde_json::from_value(Value::Object(payload.clone())).map(Some)
        }
        _ => Ok(None),
    }
}

/// The uploaded movie field of a Version.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieField {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

/// Fields requested for Version updates on the activity stream.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VersionPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub entity_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(
        rename = "sg_version_number",
        default,
        deserialize_with = "null_as_default"
    )]
    pub version_number: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "sg_download_uri", default, deserialize_with = "null_as_default")]
    pub download_url: String,
    #[serde(
        rename = "sg_uploaded_movie",
        default,
        deserialize_with = "null_as_default"
    )]
    pub movie: MovieField,
    /// The parent entity (Shot, Asset, ...) the Version belongs to.
    #[serde(default)]
    pub entity: Option<LinkField>,
    #[serde(rename = "sg_task", default)]
    pub task: Option<LinkField>,
    #[serde(
        rename = "user.HumanUser.groups",
        default,
        deserialize_with = "null_as_default"
    )]
    pub user_groups: Vec<LinkField>,
}

impl PayloadTag for VersionPayload {
    const TYPE_TAG: &'static str = "Version";
}

/// Reference to an attachment linked from a Note.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttachmentRef {
    /// Zero when the ref carries no usable id; the lookup then fails on its own.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
}

/// Fields requested for Note updates on the activity stream.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NotePayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub entity_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(rename = "content", default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<AttachmentRef>,
    /// Entities the note was written against.
    #[serde(rename = "note_links", default, deserialize_with = "null_as_default")]
    pub links: Vec<LinkField>,
    #[serde(
        rename = "user.HumanUser.groups",
        default,
        deserialize_with = "null_as_default"
    )]
    pub user_groups: Vec<LinkField>,
}

impl PayloadTag for NotePayload {
    const TYPE_TAG: &'static str = "Note";
}
