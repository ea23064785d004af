//! Mock transport for testing and local development.
//!
//! The `MockTransport` answers requests from pre-registered routes and records
//! every request it receives, allowing tests to run without network access.
//!
//! # Example
//!
//! ```ignore
//! use serde_json::json;
//! use shotgun_gateway::{HttpMethod, MockTransport};
//!
//! let transport = MockTransport::new();
//! transport.respond_json(
//!     HttpMethod::Post,
//!     "/auth/access_token",
//!     200,
//!     &json!({"access_token": "abc", "token_type": "Bearer", "expires_in": 600}),
//! );
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::ShotgunError;
use crate::interfaces::{ApiRequest, ApiResponse, HttpMethod, Transport};

#[derive(Debug, Clone)]
enum MockReply {
    Respond(ApiResponse),
    Fail(String),
}

/// Mock transport that returns pre-configured responses.
///
/// Routes are keyed by method and path suffix, so tests can register
/// `/entity/Attachment/900` without repeating the base URL. Unknown routes
/// answer `404` with a remote error body.
pub struct MockTransport {
    routes: RwLock<HashMap<(HttpMethod, String), MockReply>>,
    requests: Mutex<Vec<ApiRequest>>,
    delay: Option<Duration>,
}

impl MockTransport {
    /// Create a new mock transport with no routes.
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Delay every reply, to exercise timeouts and cancellation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Register a raw response for a route.
    pub fn respond(&self, method: HttpMethod, path: &str, status: u16, body: impl Into<Vec<u8>>) {
        self.routes.write().unwrap().insert(
            (method, path.to_string()),
            MockReply::Respond(ApiResponse::new(status, body)),
        );
    }

    /// Register a JSON response for a route.
    pub fn respond_json(&self, method: HttpMethod, path: &str, status: u16, body: &Value) {
        self.respond(method, path, status, body.to_string());
    }

    /// Register a transport failure for a route.
    pub fn fail(&self, method: HttpMethod, path: &str, message: &str) {
        self.routes
            .write()
            .unwrap()
            .insert((method, path.to_string()), MockReply::Fail(message.to_string()));
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose path ends with `path`.
    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.path().ends_with(path))
            .collect()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn lookup(&self, method: HttpMethod, path: &str) -> Option<MockReply> {
        let routes = self.routes.read().unwrap();
        routes
            .iter()
            .filter(|((m, suffix), _)| *m == method && path.ends_with(suffix.as_str()))
            .max_by_key(|((_, suffix), _)| suffix.len())
            .map(|(_, reply)| reply.clone())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ShotgunError> {
        let method = request.method;
        let path = request.url.path().to_string();
        self.requests.lock().unwrap().push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.lookup(method, &path) {
            Some(MockReply::Respond(response)) => Ok(response),
            Some(MockReply::Fail(message)) => Err(ShotgunError::transport(message)),
            None => {
                let body = json!({
                    "errors": [{
                        "status": 404,
                        "code": 404,
                        "title": "Not Found",
                        "detail": format!("no mock route for {} {}", method, path)
                    }]
                });
                Ok(ApiResponse::new(404, body.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn request(method: HttpMethod, url: &str) -> ApiRequest {
        ApiRequest::new(method, Url::parse(url).unwrap())
    }

    #[tokio::test]
    async fn test_mock_matches_path_suffix() {
        let transport = MockTransport::new();
        transport.respond(HttpMethod::Get, "/entity/Attachment/900", 200, "{}");

        let response = transport
            .execute(request(HttpMethod::Get, "https://studio.example.com/api/v1/entity/Attachment/900?fields=id"))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(transport.requests_to("/entity/Attachment/900").len(), 1);
    }

    #[tokio::test]
    async fn test_mock_method_is_part_of_the_route() {
        let transport = MockTransport::new();
        transport.respond(HttpMethod::Post, "/entity/Note", 201, "{}");

        let response = transport
            .execute(request(HttpMethod::Get, "https://studio.example.com/api/v1/entity/Note"))
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert!(String::from_utf8_lossy(&response.body).contains("no mock route"));
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let transport = MockTransport::new();
        transport.fail(HttpMethod::Get, "/entity/Shot/1", "connection reset");

        let result = transport
            .execute(request(HttpMethod::Get, "https://studio.example.com/api/v1/entity/Shot/1"))
            .await;

        assert!(matches!(result, Err(ShotgunError::Transport(msg)) if msg == "connection reset"));
        assert_eq!(transport.request_count(), 1);
    }
}
