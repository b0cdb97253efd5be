//! Dev-mode simulation gate
//!
//! Before a real method executes, the gate can ask a remote decision point
//! whether to run it or substitute a pre-computed response. The gate call is
//! awaited (its result decides control flow), unlike log delivery. A gate
//! failure aborts the call rather than silently running the real method, so
//! a developer who intended a simulation never incurs the real cost.

use crate::config::TunerkitConfig;
use crate::error::{TunerkitError, TunerkitResult};
use crate::headers::CallHeaders;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Decision returned by the simulation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationDecision {
    /// When true, the real method runs and any supplied response is ignored
    pub run_model: bool,
    /// Substituted verbatim for the real result when `run_model` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl SimulationDecision {
    /// Let the real method run
    pub fn run() -> Self {
        Self {
            run_model: true,
            response: None,
        }
    }

    /// Skip the real method and substitute `response`
    pub fn simulated(response: Value) -> Self {
        Self {
            run_model: false,
            response: Some(response),
        }
    }
}

/// Decision point consulted before a real method executes
#[async_trait]
pub trait SimulationGate: Send + Sync {
    /// Ask whether the real method should run or a simulated response is
    /// supplied. Any error here is fatal for the call.
    async fn decide(
        &self,
        params: &Value,
        headers: &CallHeaders,
    ) -> TunerkitResult<SimulationDecision>;
}

/// Gate backed by the remote simulation endpoint
pub struct HttpSimulationGate {
    http_client: Client,
    endpoint: String,
    api_key: String,
}

impl HttpSimulationGate {
    pub fn new(config: &TunerkitConfig) -> Self {
        Self {
            http_client: Client::new(),
            endpoint: config.endpoint("/api/completions"),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl SimulationGate for HttpSimulationGate {
    async fn decide(
        &self,
        params: &Value,
        headers: &CallHeaders,
    ) -> TunerkitResult<SimulationDecision> {
        let mut request = self
            .http_client
            .post(&self.endpoint)
            .json(params)
            .bearer_auth(&self.api_key);
        for (name, value) in headers.iter() {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(|e| {
            TunerkitError::simulation_unavailable(None, format!("Request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TunerkitError::simulation_unavailable(
                Some(status.as_u16()),
                body,
            ));
        }

        let decision: SimulationDecision = response.json().await.map_err(|e| {
            TunerkitError::simulation_unavailable(
                Some(status.as_u16()),
                format!("Malformed decision body: {e}"),
            )
        })?;

        debug!(run_model = decision.run_model, "simulation decision received");
        Ok(decision)
    }
}
