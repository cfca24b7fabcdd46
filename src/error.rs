// Client errors
// Everything the session client and API facades can fail with

use thiserror::Error;

/// Failures on the credential refresh path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// A 401 arrived but no refresh token is stored
    #[error("no refresh token stored")]
    MissingRefreshToken,
    /// The refresh endpoint rejected the token or could not be reached
    #[error("access token refresh failed")]
    RefreshFailed,
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, connect, timeout, broken body)
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response from the API
    #[error("API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Response body did not match the expected shape
    #[error("could not decode response: {0}")]
    Decode(String),

    /// Request rejected before it was sent
    #[error("invalid request: {0}")]
    Invalid(String),

    #[error("credential store error: {0}")]
    Store(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// HTTP status carried by an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for a 401 that survived the refresh cycle (or skipped it)
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Short machine-readable kind, used in JSON error output
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Api { .. } => "api",
            Self::Auth(AuthError::MissingRefreshToken) => "missing_refresh_token",
            Self::Auth(AuthError::RefreshFailed) => "refresh_failed",
            Self::Decode(_) => "decode",
            Self::Invalid(_) => "invalid",
            Self::Store(_) => "store",
            Self::Config(_) => "config",
        }
    }

    /// True when the caller should send the user back to login
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Auth(_)) || self.is_unauthorized()
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_for_api_errors() {
        let err = ClientError::Api {
            status: 404,
            body: "not found".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(ClientError::Network("down".to_string()).status(), None);
    }

    #[test]
    fn test_auth_failure_classification() {
        assert!(ClientError::Auth(AuthError::RefreshFailed).is_auth_failure());
        assert!(ClientError::Auth(AuthError::MissingRefreshToken).is_auth_failure());
        assert!(ClientError::Api {
            status: 401,
            body: String::new()
        }
        .is_auth_failure());
        assert!(!ClientError::Api {
            status: 500,
            body: String::new()
        }
        .is_auth_failure());
        assert!(!ClientError::Network("timeout".to_string()).is_auth_failure());
    }

    #[test]
    fn test_codes() {
        assert_eq!(ClientError::Network("x".to_string()).code(), "network");
        assert_eq!(
            ClientError::Auth(AuthError::RefreshFailed).code(),
            "refresh_failed"
        );
    }

    #[test]
    fn test_error_display() {
        let err = ClientError::Api {
            status: 400,
            body: "{\"title\":[\"required\"]}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API returned HTTP 400: {\"title\":[\"required\"]}"
        );

        let err: ClientError = AuthError::RefreshFailed.into();
        assert_eq!(
            err.to_string(),
            "authentication failed: access token refresh failed"
        );
    }
}
