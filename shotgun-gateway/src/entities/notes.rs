//! Note lookups.

use activity_stream_shared::null_as_default;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{decode_data, Relationship};
use crate::errors::ShotgunError;
use crate::interfaces::QueryGateway;
use crate::query::{Filters, SortParam};

const NOTE_FIELDS: &[&str] = &["id", "user", "subject", "content", "created_at"];

/// Flattened Note record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteData {
    pub id: i64,
    /// Display name of the note author.
    pub author: String,
    pub subject: String,
    pub body: String,
    pub created_at: String,
}

#[derive(Debug, Default, Deserialize)]
struct NoteRecord {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    attributes: NoteAttributes,
    #[serde(default)]
    relationships: NoteRelationships,
}

#[derive(Debug, Default, Deserialize)]
struct NoteAttributes {
    #[serde(default, deserialize_with = "null_as_default")]
    subject: String,
    #[serde(default, deserialize_with = "null_as_default")]
    content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    created_at: String,
}

#[derive(Debug, Default, Deserialize)]
struct NoteRelationships {
    #[serde(default)]
    user: Relationship,
}

impl From<NoteRecord> for NoteData {
    fn from(record: NoteRecord) -> Self {
        Self {
            id: record.id,
            author: record.relationships.user.data.name,
            subject: record.attributes.subject,
            body: record.attributes.content,
            created_at: record.attributes.created_at,
        }
    }
}

/// All Notes linked to a task, oldest first.
#[instrument(skip(gateway))]
pub async fn notes_for_task<G>(gateway: &G, task_id: i64) -> Result<Vec<NoteData>, ShotgunError>
where
    G: QueryGateway + ?Sized,
{
    let filters = Filters::new().with("tasks.Task.id", "is", task_id);
    let sort = [SortParam::ascending("created_at")];

    let value = gateway.search("Note", &filters, NOTE_FIELDS, None, &sort).await?;
    let records: Vec<NoteRecord> = decode_data(value)?;
    debug!(task_id, count = records.len(), "Fetched notes for task");

    Ok(records.into_iter().map(NoteData::from).collect())
}
