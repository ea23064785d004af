//! Version lookups and updates.

use activity_stream_shared::{null_as_default, LinkField};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use super::{decode_data, ManyRelationship, Relationship};
use crate::errors::ShotgunError;
use crate::interfaces::QueryGateway;
use crate::query::{Filters, PageParam, SortParam};

const VERSION_FIELDS: &[&str] = &[
    "id",
    "code",
    "open_notes",
    "created_at",
    "sg_review_status",
    "sg_status_list",
    "sg_version_number",
    "project",
    "sg_task",
    "entity",
    "sg_download_uri",
    "description",
];

/// Flattened Version record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionData {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub notes: Vec<LinkField>,
    pub submitted_at: String,
    pub review_status: String,
    pub status: String,
    pub number: i64,
    pub task: LinkField,
    pub entity: LinkField,
    pub project: LinkField,
    pub download_url: String,
}

#[derive(Debug, Default, Deserialize)]
struct VersionRecord {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    attributes: VersionAttributes,
    #[serde(default)]
    relationships: VersionRelationships,
}

#[derive(Debug, Default, Deserialize)]
struct VersionAttributes {
    #[serde(default, deserialize_with = "null_as_default")]
    code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    sg_review_status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    sg_status_list: String,
    #[serde(default, deserialize_with = "null_as_default")]
    sg_version_number: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    sg_download_uri: String,
    #[serde(default, deserialize_with = "null_as_default")]
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct VersionRelationships {
    #[serde(default)]
    open_notes: ManyRelationship,
    #[serde(default)]
    sg_task: Relationship,
    #[serde(default)]
    entity: Relationship,
    #[serde(default)]
    project: Relationship,
}

impl From<VersionRecord> for VersionData {
    fn from(record: VersionRecord) -> Self {
        let VersionRecord {
            id,
            attributes,
            relationships,
        } = record;
        Self {
            id,
            name: attributes.code,
            description: attributes.description,
            notes: relationships.open_notes.data,
            submitted_at: attributes.created_at,
            review_status: attributes.sg_review_status,
            status: attributes.sg_status_list,
            number: attributes.sg_version_number,
            task: relationships.sg_task.data,
            entity: relationships.entity.data,
            project: relationships.project.data,
            download_url: attributes.sg_download_uri,
        }
    }
}

/// Fetch one Version by id.
#[instrument(skip(gateway))]
pub async fn version<G>(gateway: &G, version_id: i64) -> Result<VersionData, ShotgunError>
where
    G: QueryGateway + ?Sized,
{
    let value = gateway.find("Version", version_id, VERSION_FIELDS).await?;
    let record: VersionRecord = decode_data(value)?;
    Ok(record.into())
}

/// All Versions linked to a task, newest version number first.
#[instrument(skip(gateway))]
pub async fn versions_for_task<G>(gateway: &G, task_id: i64) -> Result<Vec<VersionData>, ShotgunError>
where
    G: QueryGateway + ?Sized,
{
    let filters = Filters::new().with("sg_task.Task.id", "is", task_id);
    let sort = [
        SortParam::descending("sg_version_number"),
        SortParam::descending("created_at"),
    ];

    let value = gateway
        .search("Version", &filters, VERSION_FIELDS, None, &sort)
        .await?;
    let records: Vec<VersionRecord> = decode_data(value)?;
    debug!(task_id, count = records.len(), "Fetched versions for task");

    Ok(records.into_iter().map(VersionData::from).collect())
}

/// First Version matching `filters` in `sort` order, if any.
#[instrument(skip(gateway, filters, sort))]
pub async fn find_one_version<G>(
    gateway: &G,
    filters: &Filters,
    sort: &[SortParam],
) -> Result<Option<VersionData>, ShotgunError>
where
    G: QueryGateway + ?Sized,
{
    let value = gateway
        .search("Version", filters, VERSION_FIELDS, Some(PageParam::new(1, 0)), sort)
        .await?;
    let records: Vec<VersionRecord> = decode_data(value)?;

    match records.into_iter().next() {
        Some(record) => Ok(Some(record.into())),
        None => {
            info!("Search returned no Version");
            Ok(None)
        }
    }
}

/// Set a single field on a Version.
#[instrument(skip(gateway, value))]
pub async fn set_version_field<G>(
    gateway: &G,
    version_id: i64,
    field: &str,
    value: Value,
) -> Result<(), ShotgunError>
where
    G: QueryGateway + ?Sized,
{
    let mut body = Map::new();
    body.insert(field.to_string(), value);
    gateway
        .update("Version", version_id, &[], &Value::Object(body))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::{HttpMethod, ShotgunClient, ShotgunConfig};
    use serde_json::json;
    use std::sync::Arc;

    fn setup() -> (Arc<MockTransport>, ShotgunClient) {
        let transport = Arc::new(MockTransport::new());
        transport.respond_json(
            HttpMethod::Post,
            "/auth/access_token",
            200,
            &json!({"access_token": "t", "token_type": "Bearer", "expires_in": 600}),
        );
        let config = ShotgunConfig::new("https://studio.example.com/api/v1", "id", "secret");
        let client = ShotgunClient::new(config, transport.clone()).unwrap();
        (transport, client)
    }

    fn record(id: i64, code: &str, number: i64) -> Value {
        json!({
            "id": id,
            "type": "Version",
            "attributes": {
                "code": code,
                "created_at": "2024-03-01T10:00:00Z",
                "sg_status_list": "rev",
                "sg_review_status": null,
                "sg_version_number": number,
                "sg_download_uri": "https://files.example.com/v.mov",
                "description": "first pass"
            },
            "relationships": {
                "open_notes": {"data": [{"id": 1, "type": "Note", "name": "fix edge"}]},
                "sg_task": {"data": {"id": 42, "type": "Task", "name": "Comp"}},
                "entity": {"data": {"id": 7, "type": "Shot", "name": "SH010"}},
                "project": {"data": null}
            }
        })
    }

    #[tokio::test]
    async fn test_version_flattens_record() {
        let (transport, client) = setup();
        transport.respond_json(HttpMethod::Get, "/entity/Version/11", 200, &json!({"data": record(11, "v003", 3)}));

        let data = version(&client, 11).await.unwrap();
        assert_eq!(data.id, 11);
        assert_eq!(data.name, "v003");
        assert_eq!(data.number, 3);
        assert_eq!(data.status, "rev");
        assert_eq!(data.review_status, "");
        assert_eq!(data.task, LinkField::new(42, "Task", "Comp"));
        assert_eq!(data.entity, LinkField::new(7, "Shot", "SH010"));
        assert_eq!(data.project, LinkField::default());
        assert_eq!(data.notes.len(), 1);
    }

    #[tokio::test]
    async fn test_versions_for_task_sorts_descending() {
        let (transport, client) = setup();
        transport.respond_json(
            HttpMethod::Post,
            "/entity/Version/_search",
            200,
            &json!({"data": [record(12, "v002", 2), record(11, "v001", 1)]}),
        );

        let versions = versions_for_task(&client, 42).await.unwrap();
        assert_eq!(versions.iter().map(|v| v.number).collect::<Vec<_>>(), vec![2, 1]);

        let request = &transport.requests_to("/entity/Version/_search")[0];
        let body: Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
        assert_eq!(body["filters"], json!([["sg_task.Task.id", "is", 42]]));
        assert_eq!(body["sort"], "-sg_version_number,-created_at");
        assert!(body.get("page").is_none());
    }

    #[tokio::test]
    async fn test_find_one_version_empty_result() {
        let (transport, client) = setup();
        transport.respond_json(HttpMethod::Post, "/entity/Version/_search", 200, &json!({"data": []}));

        let found = find_one_version(&client, &Filters::new().with("code", "is", "v999"), &[])
            .await
            .unwrap();
        assert!(found.is_none());

        let request = &transport.requests_to("/entity/Version/_search")[0];
        let body: Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
        assert_eq!(body["page"], json!({"size": 1}));
    }

    #[tokio::test]
    async fn test_set_version_field_puts_single_field() {
        let (transport, client) = setup();
        transport.respond_json(HttpMethod::Put, "/entity/Version/11", 200, &json!({"data": record(11, "v003", 3)}));

        set_version_field(&client, 11, "sg_status_list", json!("apr")).await.unwrap();

        let request = &transport.requests_to("/entity/Version/11")[0];
        assert_eq!(request.method, HttpMethod::Put);
        let body: Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
        assert_eq!(body, json!({"sg_status_list": "apr"}));
        assert_eq!(request.query_value("fields"), None);
    }
}
