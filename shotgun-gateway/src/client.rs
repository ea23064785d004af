//! Authenticated Shotgun REST client.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use url::form_urlencoded;
use url::Url;

use crate::auth::{AccessToken, CachedToken};
use crate::config::ShotgunConfig;
use crate::errors::{RemoteError, ShotgunError};
use crate::http::ReqwestTransport;
use crate::interfaces::{ApiRequest, HttpMethod, QueryGateway, Transport};
use crate::query::{Filters, PageParam, SearchRequest, SortParam};

const TOKEN_PATH: &str = "auth/access_token";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";
const SEARCH_CONTENT_TYPE: &str = "application/vnd+shotgun.api3_array+json";

/// Client for a single Shotgun site.
///
/// Holds one transport for the whole process and caches the access token
/// obtained with the client credentials grant, refreshing it shortly before it
/// expires. Concurrent callers share the cached token.
pub struct ShotgunClient {
    config: ShotgunConfig,
    transport: Arc<dyn Transport>,
    token: Mutex<Option<CachedToken>>,
}

impl ShotgunClient {
    /// Create a client over an existing transport.
    ///
    /// The configuration is validated here so that a bad setup fails before
    /// any request is made.
    pub fn new(config: ShotgunConfig, transport: Arc<dyn Transport>) -> Result<Self, ShotgunError> {
        config.validate()?;
        Ok(Self {
            config,
            transport,
            token: Mutex::new(None),
        })
    }

    /// Create a client backed by a pooled [`ReqwestTransport`].
    pub fn from_config(config: ShotgunConfig) -> Result<Self, ShotgunError> {
        let transport = ReqwestTransport::new(config.request_timeout)?;
        Self::new(config, Arc::new(transport))
    }

    pub fn config(&self) -> &ShotgunConfig {
        &self.config
    }

    /// Return a valid access token for the configured script credentials,
    /// requesting a new one when none is cached or the cached one is about to
    /// expire.
    pub async fn authenticate(&self) -> Result<AccessToken, ShotgunError> {
        let mut cached = self.token.lock().await;
        let now = Instant::now();

        if let Some(entry) = cached.as_ref() {
            if entry.is_fresh(now) {
                return Ok(entry.token.clone());
            }
            debug!("Cached access token is about to expire, refreshing");
        }

        let token = self
            .request_token(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .await?;
        *cached = Some(CachedToken::new(token.clone(), Instant::now()));

        info!(expires_in = token.expires_in, "Obtained access token");
        Ok(token)
    }

    /// Obtain a token for a human user with the password grant.
    ///
    /// The result is not cached; regular requests keep using the script
    /// credentials.
    #[instrument(skip(self, password))]
    pub async fn authenticate_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AccessToken, ShotgunError> {
        self.request_token(&[
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
        ])
        .await
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<AccessToken, ShotgunError> {
        let url = self
            .config
            .endpoint(TOKEN_PATH)
            .map_err(ShotgunError::authentication)?;
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form.iter())
            .finish();

        let request = ApiRequest::new(HttpMethod::Post, url)
            .header("Content-Type", FORM_CONTENT_TYPE)
            .header("Accept", JSON_CONTENT_TYPE)
            .body(body.into_bytes());

        let value = self.dispatch(request).await.map_err(|e| {
            error!(error = %e, "Failed to obtain access token");
            ShotgunError::authentication(e)
        })?;

        serde_json::from_value(value)
            .map_err(|e| ShotgunError::authentication(ShotgunError::from(e)))
    }

    /// Execute a request with the current access token attached.
    async fn send(&self, request: ApiRequest) -> Result<Value, ShotgunError> {
        let token = self.authenticate().await?;
        let request = request
            .header("Authorization", token.authorization())
            .header("Accept", JSON_CONTENT_TYPE);
        self.dispatch(request).await
    }

    /// Execute a request and interpret the response status and body.
    async fn dispatch(&self, request: ApiRequest) -> Result<Value, ShotgunError> {
        let method = request.method;
        let path = request.url.path().to_string();

        let response = self.transport.execute(request).await?;
        if response.is_error() {
            let remote = RemoteError::from_response(response.status, &response.body);
            warn!(
                %method,
                path = %path,
                status = response.status,
                error = %remote,
                "Remote service returned an error"
            );
            return Err(ShotgunError::Remote(remote));
        }

        debug!(%method, path = %path, status = response.status, "Request completed");
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    fn entity_url(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Url, ShotgunError> {
        let mut url = self.config.endpoint(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }
}

fn fields_query(fields: &[&str]) -> Vec<(String, String)> {
    if fields.is_empty() {
        Vec::new()
    } else {
        vec![("fields".to_string(), fields.join(","))]
    }
}

#[async_trait]
impl QueryGateway for ShotgunClient {
    #[instrument(skip(self, fields))]
    async fn find(
        &self,
        entity_type: &str,
        id: i64,
        fields: &[&str],
    ) -> Result<Value, ShotgunError> {
        let url = self.entity_url(&format!("entity/{}/{}", entity_type, id), &fields_query(fields))?;
        self.send(ApiRequest::new(HttpMethod::Get, url)).await
    }

    #[instrument(skip(self, filters, fields, sort))]
    async fn search(
        &self,
        entity_type: &str,
        filters: &Filters,
        fields: &[&str],
        page: Option<PageParam>,
        sort: &[SortParam],
    ) -> Result<Value, ShotgunError> {
        let url = self.entity_url(&format!("entity/{}/_search", entity_type), &[])?;
        let body = serde_json::to_vec(&SearchRequest::new(filters, fields, page, sort))?;
        let request = ApiRequest::new(HttpMethod::Post, url)
            .header("Content-Type", SEARCH_CONTENT_TYPE)
            .body(body);
        self.send(request).await
    }

    #[instrument(skip(self, body))]
    async fn create(&self, entity_type: &str, body: &Value) -> Result<Value, ShotgunError> {
        let url = self.entity_url(&format!("entity/{}", entity_type), &[])?;
        let request = ApiRequest::new(HttpMethod::Post, url)
            .header("Content-Type", JSON_CONTENT_TYPE)
            .body(serde_json::to_vec(body)?);
        self.send(request).await
    }

    #[instrument(skip(self, fields, body))]
    async fn update(
        &self,
        entity_type: &str,
        id: i64,
        fields: &[&str],
        body: &Value,
    ) -> Result<Value, ShotgunError> {
        let url = self.entity_url(&format!("entity/{}/{}", entity_type, id), &fields_query(fields))?;
        let request = ApiRequest::new(HttpMethod::Put, url)
            .header("Content-Type", JSON_CONTENT_TYPE)
            .body(serde_json::to_vec(body)?);
        self.send(request).await
    }

    #[instrument(skip(self, query))]
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, ShotgunError> {
        let url = self.entity_url(path, query)?;
        self.send(ApiRequest::new(HttpMethod::Get, url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use serde_json::json;
    use std::time::Duration;

    fn token_body(expires_in: u64) -> Value {
        json!({
            "access_token": "abc123",
            "token_type": "Bearer",
            "expires_in": expires_in,
            "refresh_token": "r1"
        })
    }

    fn setup() -> (Arc<MockTransport>, ShotgunClient) {
        let transport = Arc::new(MockTransport::new());
        transport.respond_json(HttpMethod::Post, "/auth/access_token", 200, &token_body(600));
        let config = ShotgunConfig::new("https://studio.example.com/api/v1", "feed_script", "s3cret");
        let client = ShotgunClient::new(config, transport.clone()).unwrap();
        (transport, client)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let transport = Arc::new(MockTransport::new());
        let config = ShotgunConfig::new("", "feed_script", "s3cret");
        let result = ShotgunClient::new(config, transport);
        assert!(matches!(result, Err(ShotgunError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_authenticate_sends_client_credentials_form() {
        let (transport, client) = setup();

        let token = client.authenticate().await.unwrap();
        assert_eq!(token.authorization(), "Bearer abc123");

        let requests = transport.requests_to("/auth/access_token");
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url.as_str(), "https://studio.example.com/api/v1/auth/access_token");
        assert_eq!(request.header_value("content-type"), Some(FORM_CONTENT_TYPE));
        let body = String::from_utf8(request.body.clone().unwrap()).unwrap();
        assert_eq!(
            body,
            "grant_type=client_credentials&client_id=feed_script&client_secret=s3cret"
        );
    }

    #[tokio::test]
    async fn test_token_is_reused_while_fresh() {
        let (transport, client) = setup();
        transport.respond_json(HttpMethod::Get, "/entity/Version/7", 200, &json!({"data": {}}));

        client.find("Version", 7, &["code"]).await.unwrap();
        client.find("Version", 7, &["code"]).await.unwrap();

        assert_eq!(transport.requests_to("/auth/access_token").len(), 1);
        assert_eq!(transport.requests_to("/entity/Version/7").len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_token_is_refreshed_before_expiry() {
        let (transport, client) = setup();

        client.authenticate().await.unwrap();
        tokio::time::advance(Duration::from_secs(571)).await;
        client.authenticate().await.unwrap();

        assert_eq!(transport.requests_to("/auth/access_token").len(), 2);
    }

    #[tokio::test]
    async fn test_authentication_failure_is_wrapped() {
        let transport = Arc::new(MockTransport::new());
        transport.respond_json(
            HttpMethod::Post,
            "/auth/access_token",
            400,
            &json!({"errors": [{"status": 400, "code": 102, "title": "Bad credentials", "detail": "wrong secret"}]}),
        );
        let config = ShotgunConfig::new("https://studio.example.com/api/v1", "feed_script", "nope");
        let client = ShotgunClient::new(config, transport.clone()).unwrap();

        let err = client.find("Version", 1, &[]).await.unwrap_err();
        assert!(matches!(err, ShotgunError::Authentication(_)));
        assert_eq!(err.remote().unwrap().message(), "Bad credentials: wrong secret");
        assert_eq!(transport.requests_to("/entity/Version/1").len(), 0);
    }

    #[tokio::test]
    async fn test_authenticate_user_uses_password_grant() {
        let (transport, client) = setup();

        client.authenticate_user("jane", "pw&1").await.unwrap();

        let request = &transport.requests_to("/auth/access_token")[0];
        let body = String::from_utf8(request.body.clone().unwrap()).unwrap();
        assert_eq!(body, "grant_type=password&username=jane&password=pw%261");
    }

    #[tokio::test]
    async fn test_requests_carry_authorization_and_fields() {
        let (transport, client) = setup();
        transport.respond_json(HttpMethod::Get, "/entity/Attachment/900", 200, &json!({"data": {"id": 900}}));

        let value = client.find("Attachment", 900, &["id", "this_file", "name"]).await.unwrap();
        assert_eq!(value["data"]["id"], 900);

        let request = &transport.requests_to("/entity/Attachment/900")[0];
        assert_eq!(request.header_value("authorization"), Some("Bearer abc123"));
        assert_eq!(request.header_value("accept"), Some(JSON_CONTENT_TYPE));
        assert_eq!(request.query_value("fields").as_deref(), Some("id,this_file,name"));
    }

    #[tokio::test]
    async fn test_search_posts_array_filters() {
        let (transport, client) = setup();
        transport.respond_json(HttpMethod::Post, "/entity/Note/_search", 200, &json!({"data": []}));

        let filters = Filters::new().with("tasks.Task.id", "is", 42);
        client
            .search(
                "Note",
                &filters,
                &["id", "subject"],
                Some(PageParam::new(25, 1)),
                &[SortParam::ascending("created_at")],
            )
            .await
            .unwrap();

        let request = &transport.requests_to("/entity/Note/_search")[0];
        assert_eq!(request.header_value("content-type"), Some(SEARCH_CONTENT_TYPE));
        let body: Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "filters": [["tasks.Task.id", "is", 42]],
                "fields": ["id", "subject"],
                "page": {"size": 25, "number": 1},
                "sort": "created_at"
            })
        );
    }

    #[tokio::test]
    async fn test_remote_error_is_decoded() {
        let (transport, client) = setup();
        transport.respond_json(
            HttpMethod::Get,
            "/entity/Version/5/activity_stream",
            422,
            &json!({"errors": [
                {"status": 422, "code": 103, "title": "Invalid", "detail": "bad limit"},
                {"status": 422, "code": 103, "title": "Invalid", "detail": "bad cursor"}
            ]}),
        );

        let err = client.get("entity/Version/5/activity_stream", &[]).await.unwrap_err();
        match err {
            ShotgunError::Remote(remote) => {
                assert_eq!(remote.status, 422);
                assert_eq!(remote.message(), "Invalid: bad limit\nInvalid: bad cursor");
            }
            other => panic!("expected remote error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_success_body_is_decode_error() {
        let (transport, client) = setup();
        transport.respond(HttpMethod::Get, "/entity/Version/9", 200, "<html>");

        let err = client.find("Version", 9, &[]).await.unwrap_err();
        assert!(matches!(err, ShotgunError::Decode(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let (transport, client) = setup();
        transport.fail(HttpMethod::Get, "/entity/Version/9", "connection reset");

        let err = client.find("Version", 9, &[]).await.unwrap_err();
        assert!(matches!(err, ShotgunError::Transport(msg) if msg == "connection reset"));
    }

    #[tokio::test]
    async fn test_update_uses_put_with_fields() {
        let (transport, client) = setup();
        transport.respond_json(HttpMethod::Put, "/entity/Version/3", 200, &json!({"data": {"id": 3}}));

        client
            .update("Version", 3, &["sg_status_list"], &json!({"sg_status_list": "apr"}))
            .await
            .unwrap();

        let request = &transport.requests_to("/entity/Version/3")[0];
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.query_value("fields").as_deref(), Some("sg_status_list"));
    }
}
