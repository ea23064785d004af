//! Attachment lookups.

use activity_stream_shared::null_as_default;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::decode_data;
use crate::errors::ShotgunError;
use crate::interfaces::QueryGateway;

const ATTACHMENT_FIELDS: &[&str] = &["id", "this_file", "name"];

/// A file attached to a Note.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttachmentData {
    pub id: i64,
    pub name: String,
    /// Resolvable URL of the uploaded file; empty when the attachment has no file.
    pub file_url: String,
}

#[derive(Debug, Default, Deserialize)]
struct AttachmentRecord {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    attributes: AttachmentAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct AttachmentAttributes {
    #[serde(default, deserialize_with = "null_as_default")]
    this_file: FileField,
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct FileField {
    #[serde(default, deserialize_with = "null_as_default")]
    url: String,
}

impl From<AttachmentRecord> for AttachmentData {
    fn from(record: AttachmentRecord) -> Self {
        Self {
            id: record.id,
            name: record.attributes.name,
            file_url: record.attributes.this_file.url,
        }
    }
}

/// Fetch one Attachment by id, projected to its id, name and file URL.
#[instrument(skip(gateway))]
pub async fn attachment<G>(gateway: &G, attachment_id: i64) -> Result<AttachmentData, ShotgunError>
where
    G: QueryGateway + ?Sized,
{
    let value = gateway.find("Attachment", attachment_id, ATTACHMENT_FIELDS).await?;
    let record: AttachmentRecord = decode_data(value)?;
    debug!(attachment_id, name = %record.attributes.name, "Fetched attachment");
    Ok(record.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::{HttpMethod, ShotgunClient, ShotgunConfig};
    use serde_json::json;
    use std::sync::Arc;

    fn client(transport: Arc<MockTransport>) -> ShotgunClient {
        transport.respond_json(
            HttpMethod::Post,
            "/auth/access_token",
            200,
            &json!({"access_token": "t", "token_type": "Bearer", "expires_in": 600}),
        );
        let config = ShotgunConfig::new("https://studio.example.com/api/v1", "id", "secret");
        ShotgunClient::new(config, transport).unwrap()
    }

    #[tokio::test]
    async fn test_attachment_maps_file_url() {
        let transport = Arc::new(MockTransport::new());
        transport.respond_json(
            HttpMethod::Get,
            "/entity/Attachment/900",
            200,
            &json!({"data": {
                "id": 900,
                "type": "Attachment",
                "attributes": {
                    "name": "frame.png",
                    "this_file": {"url": "https://files.example.com/frame.png", "name": "frame.png"}
                }
            }}),
        );
        let client = client(transport.clone());

        let data = attachment(&client, 900).await.unwrap();
        assert_eq!(
            data,
            AttachmentData {
                id: 900,
                name: "frame.png".to_string(),
                file_url: "https://files.example.com/frame.png".to_string(),
            }
        );
        let request = &transport.requests_to("/entity/Attachment/900")[0];
        assert_eq!(request.query_value("fields").as_deref(), Some("id,this_file,name"));
    }

    #[tokio::test]
    async fn test_attachment_without_file() {
        let transport = Arc::new(MockTransport::new());
        transport.respond_json(
            HttpMethod::Get,
            "/entity/Attachment/5",
            200,
            &json!({"data": {"id": 5, "attributes": {"name": "empty", "this_file": null}}}),
        );
        let client = client(transport);

        let data = attachment(&client, 5).await.unwrap();
        assert_eq!(data.file_url, "");
    }

    #[tokio::test]
    async fn test_missing_attachment_is_remote_error() {
        let transport = Arc::new(MockTransport::new());
        let client = client(transport);

        let err = attachment(&client, 404).await.unwrap_err();
        assert_eq!(err.remote().map(|r| r.status), Some(404));
    }
}
