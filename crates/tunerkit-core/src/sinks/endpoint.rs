//! Primary log endpoint delivery

use crate::config::TunerkitConfig;
use crate::error::{TunerkitError, TunerkitResult};
use crate::record::InvocationRecord;
use crate::sinks::LoggingSink;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

/// Sink delivering records to the Tunerkit log endpoint.
///
/// Body shape is `{request, response, timing}`; correlation travels in the
/// `Tunerkit-*` headers alongside the bearer token.
pub struct TunerkitLogSink {
    http_client: Client,
    endpoint: String,
    api_key: String,
}

impl TunerkitLogSink {
    pub fn new(config: &TunerkitConfig) -> Self {
        Self {
            http_client: Client::new(),
            endpoint: config.endpoint("/api/logs"),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl LoggingSink for TunerkitLogSink {
    fn name(&self) -> &str {
        "tunerkit"
    }

    async fn log(&self, record: &InvocationRecord) -> TunerkitResult<()> {
        let body = json!({
            "request": {
                "url": record.method().unwrap_or_default(),
                "body": record.params,
            },
            "response": record.response,
            "timing": record.timing,
        });

        let mut request = self
            .http_client
            .post(&self.endpoint)
            .json(&body)
            .bearer_auth(&self.api_key);
        for (name, value) in record.headers.iter() {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TunerkitError::logging(format!("Log request failed: {e}")))
            .context("Failed to send record to the log endpoint")?;

        if !response.status().is_success() {
            return Err(TunerkitError::logging(format!(
                "Log endpoint returned status {}",
                response.status()
            )));
        }
        Ok(())
    }
}
