//! Instrumented functions: the narrow variant of the call protocol
//!
//! Where the dynamic proxy intercepts an arbitrary dotted path, this wraps
//! one statically-known function. Resolution is trivial (the function is
//! given directly) and the simulation gate is triggered by the per-call
//! `dev` flag rather than the session type; everything else — header merge,
//! timing, stream normalization, fire-and-forget logging — is the same
//! protocol.

use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tunerkit_core::interceptor::Interceptor;
use tunerkit_core::registry::{CallOutcome, MethodFuture, MethodHandler};
use tunerkit_core::{CallHeaders, TunerkitResult};

/// Per-call options for an instrumented function
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Route this call through the simulation gate
    pub dev: bool,
    /// Explicit headers; their fields override session-derived fields
    pub headers: Option<CallHeaders>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable dev mode for this call
    pub fn dev(mut self) -> Self {
        self.dev = true;
        self
    }

    pub fn with_headers(mut self, headers: CallHeaders) -> Self {
        self.headers = Some(headers);
        self
    }
}

/// A known function wrapped in the interception protocol.
///
/// Built with [`TunerkitClient::instrument`](crate::TunerkitClient::instrument).
pub struct InstrumentedFn {
    name: String,
    handler: MethodHandler,
    interceptor: Arc<Interceptor>,
}

impl InstrumentedFn {
    pub(crate) fn new<F, Fut>(interceptor: Arc<Interceptor>, name: String, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TunerkitResult<Value>> + Send + 'static,
    {
        let handler: MethodHandler = Arc::new(move |params| -> MethodFuture {
            let fut = handler(params);
            Box::pin(async move { Ok(CallOutcome::Value(fut.await?)) })
        });
        Self {
            name,
            handler,
            interceptor,
        }
    }

    /// The name this function is logged under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke with default options (no dev mode, no explicit headers)
    pub async fn call(&self, params: Value) -> TunerkitResult<Value> {
        self.call_with(params, CallOptions::default()).await
    }

    /// Invoke with per-call options
    pub async fn call_with(&self, params: Value, options: CallOptions) -> TunerkitResult<Value> {
        self.interceptor
            .run(
                self.name.clone(),
                Arc::clone(&self.handler),
                params,
                options.headers,
                options.dev,
            )
            .await
    }
}

impl fmt::Debug for InstrumentedFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstrumentedFn")
            .field("name", &self.name)
            .finish()
    }
}
