//! Method registry: the dispatch table behind the call interceptor
//!
//! Rust cannot intercept arbitrary property access on an object of unknown
//! shape, so the integrator registers the dotted paths they intend to call,
//! each bound to an async handler closure. The closure owns (or holds an
//! `Arc` to) its natural receiver, which preserves the semantics of calling
//! the method on its parent object. Lookups happen at call time and resolved
//! handlers are never cached, so paths registered after a call site was
//! constructed are honored.

use crate::error::TunerkitResult;
use crate::streaming::ChunkStream;
use dashmap::DashMap;
use futures::future::BoxFuture;
use futures::Stream;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Result shape produced by a registered method
pub enum CallOutcome {
    /// A complete structured response
    Value(Value),
    /// An incremental emitter; normalized into a single value before the
    /// call completes
    Stream(ChunkStream),
}

impl CallOutcome {
    /// Wrap a chunk emitter
    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = TunerkitResult<Vec<u8>>> + Send + 'static,
    {
        Self::Stream(Box::pin(stream))
    }
}

impl fmt::Debug for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Boxed future returned by a method handler
pub type MethodFuture = BoxFuture<'static, TunerkitResult<CallOutcome>>;

/// A registered method. The closure's captures are the method's receiver.
pub type MethodHandler = Arc<dyn Fn(Value) -> MethodFuture + Send + Sync>;

/// Ordered sequence of property names locating a method inside the wrapped
/// client, e.g. `chat.completions.create`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MethodPath {
    segments: Vec<String>,
}

impl MethodPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a deeper path node. Never consults any registry.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for MethodPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl From<&str> for MethodPath {
    fn from(path: &str) -> Self {
        Self {
            segments: path
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl From<String> for MethodPath {
    fn from(path: String) -> Self {
        Self::from(path.as_str())
    }
}

impl From<Vec<String>> for MethodPath {
    fn from(segments: Vec<String>) -> Self {
        Self { segments }
    }
}

/// Registry of callable paths for one wrapped client
#[derive(Default)]
pub struct MethodRegistry {
    methods: DashMap<String, MethodHandler>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an async method returning a [`CallOutcome`].
    ///
    /// Replaces any handler previously registered at the same path.
    pub fn register<F, Fut>(&self, path: impl Into<MethodPath>, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TunerkitResult<CallOutcome>> + Send + 'static,
    {
        let handler: MethodHandler =
            Arc::new(move |params| -> MethodFuture { Box::pin(handler(params)) });
        self.methods.insert(path.into().to_string(), handler);
    }

    /// Register an async method returning a plain JSON value
    pub fn register_value<F, Fut>(&self, path: impl Into<MethodPath>, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TunerkitResult<Value>> + Send + 'static,
    {
        self.register(path, move |params| {
            let fut = handler(params);
            async move { Ok(CallOutcome::Value(fut.await?)) }
        });
    }

    /// Resolve a path against the current registry.
    ///
    /// Called on every invocation; the returned handle is used once and
    /// dropped, never cached.
    pub fn resolve(&self, path: &MethodPath) -> Option<MethodHandler> {
        self.methods
            .get(&path.to_string())
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Remove a registered path. Returns whether it existed.
    pub fn unregister(&self, path: &MethodPath) -> bool {
        self.methods.remove(&path.to_string()).is_some()
    }

    pub fn contains(&self, path: &MethodPath) -> bool {
        self.methods.contains_key(&path.to_string())
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("len", &self.methods.len())
            .finish()
    }
}
