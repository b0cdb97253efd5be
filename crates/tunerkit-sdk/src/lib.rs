//! Tunerkit SDK
//!
//! High-level client for transparent call interception. Wrap any client
//! whose methods you register once, then call them through the SDK: every
//! invocation picks up session correlation headers, can be routed through
//! the dev-mode simulation gate, has streaming results normalized, and is
//! delivered to the configured logging sinks — without changing the wrapped
//! client or the value your caller receives.
//!
//! # Example
//!
//! ```no_run
//! use serde_json::json;
//! use tunerkit_sdk::{SessionOptions, TunerkitClient, TunerkitConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TunerkitClient::new(TunerkitConfig::from_env()?)?;
//!
//! // Register the methods you intend to call, bound to their receiver.
//! client.register_value("chat.completions.create", |params| async move {
//!     // ... call the real backend here ...
//!     Ok(json!({"echo": params}))
//! });
//!
//! let headers = client.start_session(
//!     json!({"goal": "demo"}),
//!     "my-dataset",
//!     SessionOptions::new(),
//! );
//!
//! let response = client
//!     .at("chat")
//!     .at("completions")
//!     .at("create")
//!     .call(json!({"prompt": "hello"}))
//!     .await?;
//!
//! client.end_session(json!({"response": response}), headers);
//! client.flush().await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod instrument;

pub use client::{MethodCall, TunerkitClient, TunerkitClientBuilder};
pub use instrument::{CallOptions, InstrumentedFn};

// Re-export commonly used types from core
pub use tunerkit_core::{headers, streaming};
pub use tunerkit_core::{
    CallHeaders, CallOutcome, ChunkStream, HeliconeConfig, HeliconeSink, Interceptor,
    InvocationRecord, LoggingSink, MethodPath, MethodRegistry, SessionContext, SessionOptions,
    SessionPath, SessionType, SimulationDecision, SimulationGate, TimePoint, TimingRecord,
    TunerkitConfig, TunerkitError, TunerkitResult,
};
