// Session client
// Entry point for every API call: observer -> refresh stage -> transport

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::observer::{LoadingObserver, NoopObserver, RequestLifecycle};
use super::refresh::RefreshingTransport;
use super::transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
use crate::config::Config;
use crate::error::Result;
use crate::session::Session;

/// Authenticated HTTP client over the task API
pub struct SessionClient {
    pipeline: RefreshingTransport<Arc<dyn Transport>>,
    observer: Arc<dyn LoadingObserver>,
}

impl SessionClient {
    /// Client talking to `config.api_url` over reqwest
    pub fn from_config(config: &Config, session: Arc<Session>) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.api_url, config.request_timeout)?;
        Ok(Self::with_transport(Arc::new(transport), session))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, session: Arc<Session>) -> Self {
        Self {
            pipeline: RefreshingTransport::new(transport, session),
            observer: Arc::new(NoopObserver),
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn LoadingObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn session(&self) -> &Arc<Session> {
        self.pipeline.session()
    }

    /// Run a request through the pipeline. The observer sees exactly one
    /// start and one end per call, whatever happens in between.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let _lifecycle = RequestLifecycle::start(self.observer.as_ref());
        self.pipeline.execute(request).await
    }

    /// Authenticated request with an optional JSON body
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse> {
        let mut request = ApiRequest::new(method, path);
        request.body = body;
        self.execute(request).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, None).await?.json()
    }

    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let request = query
            .iter()
            .fold(ApiRequest::new(Method::GET, path), |req, (k, v)| {
                req.with_query(*k, v.clone())
            });
        self.execute(request).await?.json()
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, Some(body)).await?.json()
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::PUT, path, Some(body)).await?.json()
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.request(Method::DELETE, path, None).await?;
        Ok(())
    }

    /// POST outside the refresh cycle (login, register)
    pub async fn post_anonymous<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.execute(ApiRequest::anonymous(Method::POST, path).with_body(body))
            .await?
            .json()
    }
}
