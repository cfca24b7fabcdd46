// Configuration - Environment variables
// Read after dotenvy has loaded any .env file

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the task API
    pub api_url: String,
    /// Where the access/refresh tokens are kept between runs
    pub session_file: PathBuf,
    /// Log file for the file tracing layer
    pub log_file: PathBuf,
    /// Per-request transport timeout
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            api_url: lookup("TASKHUB_API_URL")
                .or_else(|| lookup("NEXT_PUBLIC_API_URL"))
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            session_file: lookup("TASKHUB_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(default_session_file),
            log_file: lookup("TASKHUB_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(default_log_file),
            request_timeout: Duration::from_secs(
                lookup("TASKHUB_TIMEOUT_SECS")
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }

    /// Validate that required configuration is usable
    pub fn validate(&self) -> Result<(), String> {
        let url = reqwest::Url::parse(&self.api_url)
            .map_err(|e| format!("TASKHUB_API_URL '{}' is not a URL: {}", self.api_url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "TASKHUB_API_URL must use http or https, got '{}'",
                url.scheme()
            ));
        }
        if url.scheme() == "http" && !matches!(url.host_str(), Some("localhost" | "127.0.0.1")) {
            tracing::warn!("TASKHUB_API_URL is plain http - tokens will be sent unencrypted");
        }
        if self.request_timeout.is_zero() {
            return Err("TASKHUB_TIMEOUT_SECS must be greater than zero".to_string());
        }
        Ok(())
    }
}

fn default_session_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskhub")
        .join("session.json")
}

fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("taskhub")
        .join("taskhub.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.session_file.ends_with("taskhub/session.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_and_fallback_name() {
        let config = config_from(&[
            ("NEXT_PUBLIC_API_URL", "https://tasks.example.com/api"),
            ("TASKHUB_SESSION_FILE", "/tmp/s.json"),
            ("TASKHUB_TIMEOUT_SECS", "5"),
        ]);
        assert_eq!(config.api_url, "https://tasks.example.com/api");
        assert_eq!(config.session_file, PathBuf::from("/tmp/s.json"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));

        let config = config_from(&[
            ("TASKHUB_API_URL", "https://primary.example.com"),
            ("NEXT_PUBLIC_API_URL", "https://fallback.example.com"),
        ]);
        assert_eq!(config.api_url, "https://primary.example.com");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(config_from(&[("TASKHUB_API_URL", "localhost:8000")])
            .validate()
            .is_err());
        assert!(config_from(&[("TASKHUB_API_URL", "ftp://example.com")])
            .validate()
            .is_err());
        assert!(config_from(&[("TASKHUB_TIMEOUT_SECS", "0")]).validate().is_err());
    }
}
