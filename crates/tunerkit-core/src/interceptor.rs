//! Call interceptor: the engine composing session propagation, the
//! simulation gate, stream normalization, timing capture, and sink dispatch
//! around every registered method.
//!
//! Each invocation runs the same protocol:
//!
//! 1. session-derived headers are merged under any explicit per-call headers
//! 2. the path is resolved against the live registry
//! 3. the simulation gate may short-circuit with a substituted response
//! 4. otherwise the registered handler runs with its own receiver
//! 5. a streaming result is buffered into the non-streaming shape
//! 6. timing closes over steps 3-5
//! 7. the finished record is dispatched fire-and-forget to every sink
//! 8. the response is returned to the caller
//!
//! Errors from the handler propagate unchanged. Errors in sink delivery are
//! reported and swallowed; they can never alter or delay the returned value.

use crate::error::{TunerkitError, TunerkitResult};
use crate::headers::CallHeaders;
use crate::record::{InvocationRecord, META_METHOD};
use crate::registry::{CallOutcome, MethodHandler, MethodPath, MethodRegistry};
use crate::session::{SessionContext, SessionPath, SessionType};
use crate::simulation::SimulationGate;
use crate::sinks::LoggingSink;
use crate::streaming;
use crate::timing::{CallTimer, TimingRecord};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::task::TaskTracker;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Optional identifiers for [`Interceptor::start_session`]; missing ids are
/// generated
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub session_id: Option<String>,
    pub record_id: Option<String>,
    pub session_parent_id: Option<String>,
    pub session_type: SessionType,
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_record_id(mut self, record_id: impl Into<String>) -> Self {
        self.record_id = Some(record_id.into());
        self
    }

    pub fn with_parent_id(mut self, parent_id: impl Into<String>) -> Self {
        self.session_parent_id = Some(parent_id.into());
        self
    }

    pub fn with_session_type(mut self, session_type: SessionType) -> Self {
        self.session_type = session_type;
        self
    }
}

/// The dynamic call interceptor for one wrapped client.
///
/// Owns the proxy scaffolding: the method registry, the shared session
/// context, the simulation gate, and the sink set. Shared across call sites
/// through an `Arc`.
pub struct Interceptor {
    registry: Arc<MethodRegistry>,
    session: RwLock<SessionContext>,
    gate: Arc<dyn SimulationGate>,
    sinks: Vec<Arc<dyn LoggingSink>>,
    tasks: TaskTracker,
}

impl Interceptor {
    pub fn new(
        registry: Arc<MethodRegistry>,
        gate: Arc<dyn SimulationGate>,
        sinks: Vec<Arc<dyn LoggingSink>>,
    ) -> Self {
        Self {
            registry,
            session: RwLock::new(SessionContext::new()),
            gate,
            sinks,
            tasks: TaskTracker::new(),
        }
    }

    /// The registry this interceptor resolves against
    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Snapshot of the active session context
    pub fn session(&self) -> SessionContext {
        self.session.read().clone()
    }

    /// Invoke the method registered at `path`.
    ///
    /// Resolution happens now, against the live registry, so methods
    /// registered after this interceptor (or a lazy call site) was built are
    /// honored. A `test` session routes the call through the simulation gate.
    #[instrument(skip(self, params, headers), fields(path = %path))]
    pub async fn invoke(
        &self,
        path: &MethodPath,
        params: Value,
        headers: Option<CallHeaders>,
    ) -> TunerkitResult<Value> {
        let handler = self
            .registry
            .resolve(path)
            .ok_or_else(|| TunerkitError::method_not_found(path.to_string()))?;
        let simulate = self.session.read().session_type == SessionType::Test;
        self.run(path.to_string(), handler, params, headers, simulate)
            .await
    }

    /// The shared call protocol.
    ///
    /// Used by proxied calls (resolution + session-type trigger) and by the
    /// instrumented-function variant (trivial resolution + per-call `dev`
    /// trigger); the two activation triggers stay independent.
    pub async fn run(
        &self,
        tag: String,
        handler: MethodHandler,
        params: Value,
        headers: Option<CallHeaders>,
        simulate: bool,
    ) -> TunerkitResult<Value> {
        let mut merged = self.session.read().to_headers();
        if let Some(explicit) = headers {
            merged = merged.merged_with(explicit);
        }

        let timer = CallTimer::start();

        let response = match self.gate_decision(simulate, &params, &merged).await? {
            Some(simulated) => simulated,
            None => self.execute(handler, &params).await?,
        };

        let timing = timer.finish();

        let record = InvocationRecord::new(params, response.clone(), merged, timing)
            .with_meta_entry(META_METHOD, tag);
        self.dispatch(record);

        Ok(response)
    }

    async fn gate_decision(
        &self,
        simulate: bool,
        params: &Value,
        headers: &CallHeaders,
    ) -> TunerkitResult<Option<Value>> {
        if !simulate {
            return Ok(None);
        }
        let decision = self.gate.decide(params, headers).await?;
        if decision.run_model {
            debug!("simulation gate approved real execution");
            Ok(None)
        } else {
            Ok(Some(decision.response.unwrap_or(Value::Null)))
        }
    }

    async fn execute(&self, handler: MethodHandler, params: &Value) -> TunerkitResult<Value> {
        match handler(params.clone()).await? {
            CallOutcome::Value(value) => Ok(value),
            CallOutcome::Stream(stream) => streaming::collect_stream(stream).await,
        }
    }

    /// Fire-and-forget delivery to every sink. Never awaited by the caller;
    /// tracked so [`flush`](Self::flush) can drain before shutdown.
    fn dispatch(&self, record: InvocationRecord) {
        for sink in &self.sinks {
            let sink = Arc::clone(sink);
            let record = record.clone();
            self.tasks.spawn(async move {
                if let Err(error) = sink.log(&record).await {
                    warn!(sink = sink.name(), %error, "log delivery failed");
                }
            });
        }
    }

    /// Open a session: generate missing ids, make the context active, emit a
    /// `__START__` boundary event carrying `inputs`, and return the header
    /// set for subsequent correlated operations (and for `end_session`).
    pub fn start_session(
        &self,
        inputs: Value,
        dataset_id: impl Into<String>,
        options: SessionOptions,
    ) -> CallHeaders {
        let context = SessionContext {
            dataset_id: Some(dataset_id.into()),
            session_id: Some(options.session_id.unwrap_or_else(generate_id)),
            record_id: Some(options.record_id.unwrap_or_else(generate_id)),
            session_parent_id: options.session_parent_id,
            session_type: options.session_type,
        };
        let headers = context.to_headers();
        *self.session.write() = context;

        let record = InvocationRecord::new(
            inputs,
            Value::Null,
            headers.clone().with_path(SessionPath::Start),
            TimingRecord::instant(),
        );
        self.dispatch(record);

        headers
    }

    /// Close a session: emit an `__END__` boundary event carrying `outputs`,
    /// using the supplied headers. These need not match the active context,
    /// so a session captured earlier can be closed after the context moved
    /// on. Boundary events are not required to pair; the log store
    /// reconciles completeness.
    pub fn end_session(&self, outputs: Value, headers: CallHeaders) {
        let record = InvocationRecord::new(
            outputs,
            Value::Null,
            headers.with_path(SessionPath::End),
            TimingRecord::instant(),
        );
        self.dispatch(record);
    }

    /// Overwrite identifying fields without emitting boundary events. Used
    /// by the instrumented-function variant.
    pub fn set_session(&self, session_id: impl Into<String>, session_name: impl Into<String>) {
        let mut session = self.session.write();
        session.session_id = Some(session_id.into());
        session.dataset_id = Some(session_name.into());
    }

    /// Wait until every in-flight log delivery has finished.
    ///
    /// Deliveries remain fire-and-forget with respect to callers; this is
    /// the drain primitive for graceful shutdown.
    pub async fn flush(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }
}

fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
