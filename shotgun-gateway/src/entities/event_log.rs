//! Event log entries.
//!
//! Consumers that poll for changes keep the id of the last event they handled
//! and pass it back to [`new_events`]; a cursor of zero bootstraps from the
//! latest event only.

use activity_stream_shared::{null_as_default, LinkField};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::{decode_data, Relationship};
use crate::errors::ShotgunError;
use crate::interfaces::QueryGateway;
use crate::query::{Filters, PageParam, SortParam};

const EVENT_ENTITY: &str = "EventLogEntry";
const EVENT_FIELDS: &[&str] = &["id", "event_type", "project", "entity", "description", "meta"];
const EVENT_PAGE_SIZE: u32 = 25;

/// An event log entry, as created or as read back.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EventData {
    /// Assigned by the remote service; `None` until the event is created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub event_type: String,
    pub description: String,
    #[serde(rename = "meta", skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    pub entity: LinkField,
    pub project: LinkField,
}

#[derive(Debug, Default, Deserialize)]
struct EventRecord {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    attributes: EventAttributes,
    #[serde(default)]
    relationships: EventRelationships,
}

#[derive(Debug, Default, Deserialize)]
struct EventAttributes {
    #[serde(default, deserialize_with = "null_as_default")]
    event_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    meta: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct EventRelationships {
    #[serde(default)]
    entity: Relationship,
    #[serde(default)]
    project: Relationship,
}

impl From<EventRecord> for EventData {
    fn from(record: EventRecord) -> Self {
        Self {
            id: Some(record.id),
            event_type: record.attributes.event_type,
            description: record.attributes.description,
            metadata: record.attributes.meta,
            entity: record.relationships.entity.data,
            project: record.relationships.project.data,
        }
    }
}

/// Create an event log entry and return the id assigned to it.
#[instrument(skip(gateway, event), fields(event_type = %event.event_type))]
pub async fn create_event<G>(gateway: &G, event: &EventData) -> Result<i64, ShotgunError>
where
    G: QueryGateway + ?Sized,
{
    let body = serde_json::to_value(event)?;
    let value = gateway.create(EVENT_ENTITY, &body).await?;
    let record: EventRecord = decode_data(value)?;
    debug!(event_id = record.id, "Created event log entry");
    Ok(record.id)
}

/// Events newer than `last_event_id`, oldest first.
///
/// With a non-positive cursor only the most recent event is returned, so a
/// fresh consumer starts from "now" instead of replaying the whole log.
#[instrument(skip(gateway))]
pub async fn new_events<G>(gateway: &G, last_event_id: i64) -> Result<Vec<EventData>, ShotgunError>
where
    G: QueryGateway + ?Sized,
{
    let (filters, sort, page) = if last_event_id > 0 {
        (
            Filters::new().with("id", "greater_than", last_event_id),
            SortParam::ascending("id"),
            PageParam::new(EVENT_PAGE_SIZE, 0),
        )
    } else {
        (Filters::new(), SortParam::descending("id"), PageParam::new(1, 0))
    };

    let value = gateway
        .search(EVENT_ENTITY, &filters, EVENT_FIELDS, Some(page), &[sort])
        .await?;
    let records: Vec<EventRecord> = decode_data(value)?;
    debug!(last_event_id, count = records.len(), "Fetched new events");

    Ok(records.into_iter().map(EventData::from).collect())
}
