// HTTP transport
// Sends one request and reports status + body; knows nothing about tokens

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Whether a request takes part in the bearer/refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Carries the stored access token and may be refreshed once on 401
    Authenticated,
    /// Login, register and the refresh call itself
    Anonymous,
}

/// A request as it travels down the pipeline
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, starting with '/'
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Bearer token to attach; filled in by the refresh stage
    pub bearer: Option<String>,
    pub kind: RequestKind,
    /// Set once the request has been through a refresh-and-retry cycle
    pub retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
            kind: RequestKind::Authenticated,
            retried: false,
        }
    }

    pub fn anonymous(method: Method, path: impl Into<String>) -> Self {
        Self {
            kind: RequestKind::Anonymous,
            ..Self::new(method, path)
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Raw response: status code and the body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body; an empty body decodes like JSON `null`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let body = self.body.trim();
        let body = if body.is_empty() { "null" } else { body };
        serde_json::from_str(body).map_err(|e| {
            ClientError::Decode(format!("{} (HTTP {}): {}", e, self.status, truncate(body, 200)))
        })
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Lowest pipeline stage: puts a request on the wire
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport failures are `ClientError::Network`; any HTTP status is `Ok`
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        (**self).send(request).await
    }
}

/// reqwest-backed transport rooted at the API base URL
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = reqwest::Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("invalid API URL {}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "API URL must be http(s): {}",
                base_url
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        tracing::debug!("{} {} -> {}", request.method, request.path, status);
        Ok(ApiResponse { status, body })
    }
}
