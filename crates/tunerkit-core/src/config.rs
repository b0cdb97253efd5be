//! SDK configuration

use crate::error::{TunerkitError, TunerkitResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Default base URL of the Tunerkit backend
pub const DEFAULT_BASE_URL: &str = "https://app.tunerkit.dev";

/// Configuration for the interception layer's own backend: the primary log
/// endpoint and the simulation endpoint share the same base URL and API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TunerkitConfig {
    /// API key sent as a bearer token to the log and simulation endpoints
    pub api_key: String,
    /// Base URL of the Tunerkit backend
    pub base_url: String,
}

impl Default for TunerkitConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl TunerkitConfig {
    /// Create a config with the default base URL
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Override the backend base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Load configuration from environment variables.
    ///
    /// `TUNERKIT_API_KEY` is required; `TUNERKIT_BASE_URL` overrides the
    /// default backend URL when set.
    pub fn from_env() -> TunerkitResult<Self> {
        let api_key = env::var("TUNERKIT_API_KEY")
            .map_err(|_| TunerkitError::config("TUNERKIT_API_KEY is not set"))?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = env::var("TUNERKIT_BASE_URL") {
            config.base_url = base_url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration before any network component is built
    pub fn validate(&self) -> TunerkitResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(TunerkitError::config("API key must not be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(TunerkitError::config(format!(
                "Base URL must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        Ok(())
    }

    /// Absolute URL for a backend endpoint path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_base_url() {
        let config = TunerkitConfig::new("tk-key").with_base_url("http://localhost:8787");
        assert_eq!(config.endpoint("/api/logs"), "http://localhost:8787/api/logs");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let config = TunerkitConfig::new("tk-key").with_base_url("http://localhost:8787/");
        assert_eq!(
            config.endpoint("/api/completions"),
            "http://localhost:8787/api/completions"
        );
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let config = TunerkitConfig::new("  ");
        assert!(matches!(
            config.validate(),
            Err(TunerkitError::Config(_))
        ));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let config = TunerkitConfig::new("tk-key").with_base_url("ftp://example.com");
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_base_url_validates() {
        assert!(TunerkitConfig::new("tk-key").validate().is_ok());
    }
}
