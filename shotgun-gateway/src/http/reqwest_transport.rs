//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::{debug, error};

use crate::errors::ShotgunError;
use crate::interfaces::{ApiRequest, ApiResponse, HttpMethod, Transport};

/// Transport that executes requests with a single shared `reqwest::Client`.
///
/// The client is built once so connections are pooled across every gateway
/// call made through it.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use shotgun_gateway::http::ReqwestTransport;
///
/// let transport = ReqwestTransport::new(Duration::from_secs(30))?;
/// ```
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ShotgunError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ShotgunError::transport(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client, e.g. one shared with other parts of an application.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ShotgunError> {
        let method = request.method;
        let path = request.url.path().to_string();

        let mut builder = self.client.request(to_method(method), request.url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!(method = %method, path = %path, error = %e, "HTTP request failed");
            ShotgunError::transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            error!(method = %method, path = %path, status, error = %e, "Failed to read response body");
            ShotgunError::read_body(e.to_string())
        })?;

        debug!(method = %method, path = %path, status, bytes = body.len(), "HTTP request completed");

        Ok(ApiResponse::new(status, body.to_vec()))
    }
}
