//! Client configuration.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_URL: &str = "http://localhost:5001/graphql";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Query client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Query endpoint URL.
    #[serde(default = "default_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `LOGVIZ_URL` | Query endpoint URL |
    /// | `LOGVIZ_TIMEOUT` | Request timeout in seconds |
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("LOGVIZ_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(default_url),
            timeout_secs: std::env::var("LOGVIZ_TIMEOUT")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or_else(default_timeout),
        }
    }

    /// Set the endpoint URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Parse and validate the endpoint URL.
    pub fn endpoint(&self) -> ClientResult<Url> {
        let url = Url::parse(self.url.trim()).map_err(|e| ClientError::Config {
            message: format!("invalid endpoint url '{}': {}", self.url, e),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ClientError::Config {
                message: format!("unsupported url scheme '{}' (expected http or https)", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.url, "http://localhost:5001/graphql");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.endpoint().is_ok());
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let config: ClientConfig = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
        assert_eq!(config.url, DEFAULT_URL);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn rejects_bad_urls() {
        let err = ClientConfig::default()
            .with_url("not a url")
            .endpoint()
            .unwrap_err();
        assert!(matches!(err, ClientError::Config { .. }));

        let err = ClientConfig::default()
            .with_url("ftp://example.com/graphql")
            .endpoint()
            .unwrap_err();
        assert!(err.to_string().contains("unsupported url scheme 'ftp'"));
    }

    #[test]
    #[serial]
    fn from_env_reads_overrides() {
        std::env::set_var("LOGVIZ_URL", "https://logs.example.com/graphql");
        std::env::set_var("LOGVIZ_TIMEOUT", "7");
        let config = ClientConfig::from_env();
        std::env::remove_var("LOGVIZ_URL");
        std::env::remove_var("LOGVIZ_TIMEOUT");

        assert_eq!(config.url, "https://logs.example.com/graphql");
        assert_eq!(config.timeout_secs, 7);
    }

    #[test]
    #[serial]
    fn from_env_ignores_garbage_timeout() {
        std::env::remove_var("LOGVIZ_URL");
        std::env::set_var("LOGVIZ_TIMEOUT", "soon");
        let config = ClientConfig::from_env();
        std::env::remove_var("LOGVIZ_TIMEOUT");

        assert_eq!(config, ClientConfig::default());
    }
}
