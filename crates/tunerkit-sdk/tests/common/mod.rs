//! Shared fixtures for SDK integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tunerkit_sdk::{
    CallHeaders, InvocationRecord, LoggingSink, SimulationDecision, SimulationGate,
    TunerkitClient, TunerkitConfig, TunerkitError, TunerkitResult,
};

/// Sink that remembers every record it receives
#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<InvocationRecord>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn records(&self) -> Vec<InvocationRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl LoggingSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn log(&self, record: &InvocationRecord) -> TunerkitResult<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Sink whose transport is permanently down
pub struct FailingSink;

#[async_trait]
impl LoggingSink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    async fn log(&self, _record: &InvocationRecord) -> TunerkitResult<()> {
        Err(TunerkitError::logging("transport always down"))
    }
}

/// Gate that returns a fixed decision and counts consultations
pub struct FixedGate {
    decision: SimulationDecision,
    consulted: AtomicUsize,
}

impl FixedGate {
    pub fn new(decision: SimulationDecision) -> Arc<Self> {
        Arc::new(Self {
            decision,
            consulted: AtomicUsize::new(0),
        })
    }

    pub fn consulted(&self) -> usize {
        self.consulted.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SimulationGate for FixedGate {
    async fn decide(
        &self,
        _params: &Value,
        _headers: &CallHeaders,
    ) -> TunerkitResult<SimulationDecision> {
        self.consulted.fetch_add(1, Ordering::SeqCst);
        Ok(self.decision.clone())
    }
}

/// Gate whose endpoint is unreachable
pub struct UnavailableGate;

#[async_trait]
impl SimulationGate for UnavailableGate {
    async fn decide(
        &self,
        _params: &Value,
        _headers: &CallHeaders,
    ) -> TunerkitResult<SimulationDecision> {
        Err(TunerkitError::simulation_unavailable(
            Some(503),
            "maintenance",
        ))
    }
}

/// A client with no network sinks, wired to the given sink and gate
pub fn client_with(
    sink: Arc<dyn LoggingSink>,
    gate: Option<Arc<dyn SimulationGate>>,
) -> TunerkitClient {
    let mut builder = TunerkitClient::builder(TunerkitConfig::new("test-key"))
        .without_log_endpoint()
        .with_sink(sink);
    if let Some(gate) = gate {
        builder = builder.with_gate(gate);
    }
    builder.build().expect("client builds")
}
