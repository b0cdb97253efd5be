//! Trace-collector sink speaking the Helicone wire contract

use crate::error::{TunerkitError, TunerkitResult};
use crate::record::InvocationRecord;
use crate::sinks::LoggingSink;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::env;
use tracing::warn;

/// Default base URL of the Helicone collector
pub const DEFAULT_HELICONE_BASE_URL: &str = "https://api.hconeai.com";

/// Configuration for [`HeliconeSink`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeliconeConfig {
    /// API key for the collector, sent as a bearer token
    pub api_key: String,
    /// Base URL of the collector
    pub base_url: String,
}

impl HeliconeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_HELICONE_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Load from `HELICONE_API_KEY` / `HELICONE_BASE_URL`
    pub fn from_env() -> TunerkitResult<Self> {
        let api_key = env::var("HELICONE_API_KEY")
            .map_err(|_| TunerkitError::config("HELICONE_API_KEY is not set"))?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = env::var("HELICONE_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }
}

/// Sink mapping invocation records into Helicone's provider-neutral trace
/// envelope: `{providerRequest, providerResponse, timing}`.
pub struct HeliconeSink {
    http_client: Client,
    endpoint: String,
    api_key: String,
}

impl HeliconeSink {
    pub fn new(config: &HeliconeConfig) -> Self {
        Self {
            http_client: Client::new(),
            endpoint: format!("{}/trace/log", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        }
    }

    fn envelope(record: &InvocationRecord) -> Value {
        let mut meta = Map::new();
        for (name, value) in record.headers.iter() {
            meta.insert(name.to_string(), Value::String(value.to_string()));
        }
        if let Some(entries) = &record.meta {
            for (key, value) in entries {
                meta.insert(key.clone(), Value::String(value.clone()));
            }
        }

        json!({
            "providerRequest": {
                "url": record.method().unwrap_or_default(),
                "json": record.params,
                "meta": meta,
            },
            "providerResponse": {
                "status": 200,
                "headers": {},
                "json": record.response,
            },
            "timing": record.timing,
        })
    }
}

#[async_trait]
impl LoggingSink for HeliconeSink {
    fn name(&self) -> &str {
        "helicone"
    }

    async fn log(&self, record: &InvocationRecord) -> TunerkitResult<()> {
        if record.params.is_null() {
            // Caller programming error: report, never throw.
            warn!(sink = self.name(), "record has no params; skipping delivery");
            return Ok(());
        }

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&Self::envelope(record))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| TunerkitError::logging(format!("Trace request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(TunerkitError::logging(format!(
                "Trace collector returned status {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::{names, CallHeaders};
    use crate::record::META_METHOD;
    use crate::timing::TimingRecord;

    #[test]
    fn envelope_carries_request_response_and_meta() {
        let headers = CallHeaders::new().with(names::SESSION_ID, "sess-1");
        let record = InvocationRecord::new(
            json!({"prompt": "hi"}),
            json!({"text": "hello"}),
            headers,
            TimingRecord::instant(),
        )
        .with_meta_entry(META_METHOD, "chat.completions.create");

        let envelope = HeliconeSink::envelope(&record);
        assert_eq!(
            envelope["providerRequest"]["url"],
            json!("chat.completions.create")
        );
        assert_eq!(envelope["providerRequest"]["json"], json!({"prompt": "hi"}));
        assert_eq!(
            envelope["providerRequest"]["meta"]["Tunerkit-Session-Id"],
            json!("sess-1")
        );
        assert_eq!(envelope["providerResponse"]["status"], json!(200));
        assert_eq!(
            envelope["providerResponse"]["json"],
            json!({"text": "hello"})
        );
        assert!(envelope["timing"]["startTime"].is_object());
    }
}
