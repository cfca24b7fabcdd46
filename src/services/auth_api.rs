// Auth API
// Endpoints: POST /auth/login/, POST /auth/register/, GET /auth/user

use serde_json::Value;
use std::sync::Arc;

use super::client::SessionClient;
use crate::error::{ClientError, Result};
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, User};

#[derive(Clone)]
pub struct AuthApi {
    client: Arc<SessionClient>,
}

impl AuthApi {
    pub fn new(client: Arc<SessionClient>) -> Self {
        Self { client }
    }

    /// POST /auth/login/ - exchange credentials for a token pair and keep it
    pub async fn login(&self, request: &LoginRequest) -> Result<User> {
        tracing::info!("Logging in as {}", request.email);

        let response: LoginResponse = self.client.post_anonymous("/auth/login/", request).await?;
        self.client
            .session()
            .set_tokens(response.tokens.access, response.tokens.refresh)
            .await?;

        tracing::info!("Logged in as user {}", response.user.id);
        Ok(response.user)
    }

    /// POST /auth/register/ - returns whatever the API echoes back
    pub async fn register(&self, request: &RegisterRequest) -> Result<Value> {
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(ClientError::Invalid(
                "email and password are required".to_string(),
            ));
        }
        tracing::info!("Registering account {}", request.email);
        self.client.post_anonymous("/auth/register/", request).await
    }

    /// GET /auth/user
    pub async fn current_user(&self) -> Result<User> {
        self.client.get_json("/auth/user").await
    }

    /// Forget both tokens
    pub async fn logout(&self) -> Result<()> {
        tracing::info!("Logging out");
        self.client.session().clear().await
    }

    /// Route guard: who is logged in, if anyone.
    ///
    /// A session the API no longer accepts is cleared and reported as
    /// logged out; any other failure propagates.
    pub async fn check_auth(&self) -> Result<Option<User>> {
        if !self.client.session().is_authenticated().await {
            return Ok(None);
        }

        match self.current_user().await {
            Ok(user) => Ok(Some(user)),
            Err(e) if e.is_auth_failure() => {
                tracing::info!("Stored session rejected ({}) - clearing it", e);
                self.client.session().clear().await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
