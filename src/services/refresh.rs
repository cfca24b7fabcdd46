// Bearer + refresh-on-401 stage
// Sits between the session client and the transport

use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::transport::{ApiRequest, ApiResponse, RequestKind, Transport};
use crate::error::{AuthError, ClientError, Result};
use crate::session::Session;

pub const REFRESH_PATH: &str = "/api/token/refresh/";

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
    /// Present when the API rotates refresh tokens
    #[serde(default)]
    refresh: Option<String>,
}

/// Attaches the stored access token and recovers a single 401 per request
/// by refreshing the token and re-issuing the request once.
///
/// Concurrent refreshes are coalesced: whoever takes the lock second sees the
/// rotated token and retries with it instead of refreshing again.
pub struct RefreshingTransport<T> {
    inner: T,
    session: Arc<Session>,
    refresh_lock: Mutex<()>,
}

impl<T: Transport> RefreshingTransport<T> {
    pub fn new(inner: T, session: Arc<Session>) -> Self {
        Self {
            inner,
            session,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Run a request through the stage. Non-2xx becomes `ClientError::Api`.
    pub async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        if request.kind == RequestKind::Authenticated {
            request.bearer = self.session.access_token().await;
        }

        let response = self.inner.send(&request).await?;
        if response.status != 401
            || request.kind != RequestKind::Authenticated
            || request.retried
        {
            return check_status(response);
        }

        request.retried = true;
        let access = self.refresh_after_rejection(request.bearer.as_deref()).await?;
        request.bearer = Some(access);

        tracing::info!("Retrying {} {} with refreshed token", request.method, request.path);
        let retry = self.inner.send(&request).await?;
        check_status(retry)
    }

    async fn refresh_after_rejection(&self, rejected: Option<&str>) -> Result<String> {
        // A refresh token that vanishes while queued means another refresh failed
        let had_refresh_token = self.session.refresh_token().await.is_some();
        let _guard = self.refresh_lock.lock().await;

        if let Some(current) = self.session.access_token().await {
            if rejected != Some(current.as_str()) {
                tracing::debug!("Access token already rotated by another request");
                return Ok(current);
            }
        }

        let Some(refresh) = self.session.refresh_token().await else {
            if had_refresh_token {
                tracing::warn!("Session was cleared by a failed refresh while waiting");
                return Err(AuthError::RefreshFailed.into());
            }
            tracing::warn!("Got 401 but no refresh token is stored");
            return Err(AuthError::MissingRefreshToken.into());
        };

        match self.request_new_access(refresh).await {
            Ok(tokens) => {
                let access = tokens.access.clone();
                self.session.rotate(tokens.access, tokens.refresh).await;
                tracing::info!("Refreshed access token");
                Ok(access)
            }
            Err(e) => {
                tracing::warn!("Token refresh failed: {} - clearing session", e);
                if let Err(e) = self.session.clear().await {
                    tracing::warn!("Failed to clear session after refresh failure: {}", e);
                }
                Err(AuthError::RefreshFailed.into())
            }
        }
    }

    async fn request_new_access(&self, refresh: String) -> Result<RefreshResponse> {
        let request =
            ApiRequest::anonymous(Method::POST, REFRESH_PATH).with_body(json!({ "refresh": refresh }));
        let response = check_status(self.inner.send(&request).await?)?;
        response.json()
    }
}

fn check_status(response: ApiResponse) -> Result<ApiResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Api {
            status: response.status,
            body: response.body,
        })
    }
}
