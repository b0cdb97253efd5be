//! SDK client implementation

use crate::instrument::InstrumentedFn;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;
use tunerkit_core::interceptor::{Interceptor, SessionOptions};
use tunerkit_core::registry::{CallOutcome, MethodPath, MethodRegistry};
use tunerkit_core::simulation::{HttpSimulationGate, SimulationGate};
use tunerkit_core::sinks::{HeliconeConfig, HeliconeSink, LoggingSink, TunerkitLogSink};
use tunerkit_core::{CallHeaders, SessionContext, TunerkitConfig, TunerkitResult};

/// High-level client wrapping the interception engine.
///
/// Construction wires the method registry, the simulation gate, and the sink
/// set together; afterwards the client is cheap to clone and safe to share
/// (all state lives behind `Arc`s).
///
/// # Sessions and concurrency
///
/// The session context is process-wide for this client instance. Set it
/// before a batch of correlated calls; starting a session concurrently with
/// in-flight calls makes it nondeterministic which session those calls are
/// attributed to.
#[derive(Clone)]
pub struct TunerkitClient {
    interceptor: Arc<Interceptor>,
    registry: Arc<MethodRegistry>,
    config: TunerkitConfig,
}

impl TunerkitClient {
    /// Create a client with the default gate and the primary log sink
    pub fn new(config: TunerkitConfig) -> TunerkitResult<Self> {
        Self::builder(config).build()
    }

    /// Start building a client with custom sinks or a custom gate
    pub fn builder(config: TunerkitConfig) -> TunerkitClientBuilder {
        TunerkitClientBuilder {
            config,
            gate: None,
            sinks: Vec::new(),
            log_endpoint: true,
        }
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &TunerkitConfig {
        &self.config
    }

    /// The registry of callable paths. Registration is allowed at any time;
    /// paths resolve lazily on each call.
    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Register an async method returning a [`CallOutcome`]
    pub fn register<F, Fut>(&self, path: impl Into<MethodPath>, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TunerkitResult<CallOutcome>> + Send + 'static,
    {
        self.registry.register(path, handler);
    }

    /// Register an async method returning a plain JSON value
    pub fn register_value<F, Fut>(&self, path: impl Into<MethodPath>, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TunerkitResult<Value>> + Send + 'static,
    {
        self.registry.register_value(path, handler);
    }

    /// A lazy call-site node one segment deep. Chaining [`MethodCall::at`]
    /// descends further; nothing is resolved until
    /// [`call`](MethodCall::call).
    pub fn at(&self, segment: impl Into<String>) -> MethodCall {
        MethodCall {
            interceptor: Arc::clone(&self.interceptor),
            path: MethodPath::new().child(segment),
        }
    }

    /// A lazy call-site node for a full dotted path
    pub fn method(&self, path: impl Into<MethodPath>) -> MethodCall {
        MethodCall {
            interceptor: Arc::clone(&self.interceptor),
            path: path.into(),
        }
    }

    /// Invoke the method registered at `path` directly
    pub async fn call(
        &self,
        path: impl Into<MethodPath>,
        params: Value,
        headers: Option<CallHeaders>,
    ) -> TunerkitResult<Value> {
        self.interceptor.invoke(&path.into(), params, headers).await
    }

    /// Wrap a known function in the interception protocol. The returned
    /// wrapper runs the same six steps as a proxied call, with trivial
    /// resolution and the per-call `dev` flag as the simulation trigger.
    pub fn instrument<F, Fut>(&self, name: impl Into<String>, handler: F) -> InstrumentedFn
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TunerkitResult<Value>> + Send + 'static,
    {
        InstrumentedFn::new(Arc::clone(&self.interceptor), name.into(), handler)
    }

    /// Open a session and return its header set. See
    /// [`Interceptor::start_session`].
    pub fn start_session(
        &self,
        inputs: Value,
        dataset_id: impl Into<String>,
        options: SessionOptions,
    ) -> CallHeaders {
        self.interceptor.start_session(inputs, dataset_id, options)
    }

    /// Emit the closing boundary event for a session captured earlier
    pub fn end_session(&self, outputs: Value, headers: CallHeaders) {
        self.interceptor.end_session(outputs, headers);
    }

    /// Overwrite session identifiers without emitting boundary events
    pub fn set_session(&self, session_id: impl Into<String>, session_name: impl Into<String>) {
        self.interceptor.set_session(session_id, session_name);
    }

    /// Snapshot of the active session context
    pub fn session(&self) -> SessionContext {
        self.interceptor.session()
    }

    /// Drain in-flight log deliveries before shutdown
    pub async fn flush(&self) {
        self.interceptor.flush().await;
    }
}

impl fmt::Debug for TunerkitClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TunerkitClient")
            .field("base_url", &self.config.base_url)
            .field("registered_methods", &self.registry.len())
            .finish()
    }
}

/// Builder for [`TunerkitClient`]
pub struct TunerkitClientBuilder {
    config: TunerkitConfig,
    gate: Option<Arc<dyn SimulationGate>>,
    sinks: Vec<Arc<dyn LoggingSink>>,
    log_endpoint: bool,
}

impl TunerkitClientBuilder {
    /// Replace the HTTP simulation gate (useful for tests and self-hosted
    /// decision points)
    pub fn with_gate(mut self, gate: Arc<dyn SimulationGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Attach an additional logging sink
    pub fn with_sink(mut self, sink: Arc<dyn LoggingSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Attach the bundled trace-collector sink
    pub fn with_helicone(self, config: HeliconeConfig) -> Self {
        self.with_sink(Arc::new(HeliconeSink::new(&config)))
    }

    /// Skip the primary log endpoint sink. Attached sinks still receive
    /// every record.
    pub fn without_log_endpoint(mut self) -> Self {
        self.log_endpoint = false;
        self
    }

    pub fn build(self) -> TunerkitResult<TunerkitClient> {
        self.config.validate()?;

        let registry = Arc::new(MethodRegistry::new());
        let gate = self
            .gate
            .unwrap_or_else(|| Arc::new(HttpSimulationGate::new(&self.config)));

        let mut sinks = self.sinks;
        if self.log_endpoint {
            sinks.insert(0, Arc::new(TunerkitLogSink::new(&self.config)));
        }
        debug!(
            base_url = %self.config.base_url,
            sinks = sinks.len(),
            "created Tunerkit client"
        );

        let interceptor = Arc::new(Interceptor::new(Arc::clone(&registry), gate, sinks));
        Ok(TunerkitClient {
            interceptor,
            registry,
            config: self.config,
        })
    }
}

/// A lazily-resolved call site.
///
/// Mirrors property access on the wrapped client: descending with
/// [`at`](Self::at) never consults the registry, so a node for an
/// unregistered path is valid; only [`call`](Self::call) resolves, at call
/// time.
#[derive(Clone)]
pub struct MethodCall {
    interceptor: Arc<Interceptor>,
    path: MethodPath,
}

impl MethodCall {
    /// Descend one path segment
    pub fn at(&self, segment: impl Into<String>) -> Self {
        Self {
            interceptor: Arc::clone(&self.interceptor),
            path: self.path.child(segment),
        }
    }

    /// The dotted path this node addresses
    pub fn path(&self) -> &MethodPath {
        &self.path
    }

    /// Invoke the method at this path
    pub async fn call(&self, params: Value) -> TunerkitResult<Value> {
        self.call_with_headers(params, None).await
    }

    /// Invoke with explicit headers; their fields override session-derived
    /// fields
    pub async fn call_with_headers(
        &self,
        params: Value,
        headers: Option<CallHeaders>,
    ) -> TunerkitResult<Value> {
        self.interceptor.invoke(&self.path, params, headers).await
    }
}

impl fmt::Debug for MethodCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodCall").field("path", &self.path.to_string()).finish()
    }
}
