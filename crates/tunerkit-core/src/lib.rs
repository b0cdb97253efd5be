//! Tunerkit core: transparent call interception for arbitrary clients
//!
//! This crate is the engine behind the Tunerkit SDK. It intercepts method
//! invocations made through a registered dispatch table, attaches
//! session/trace correlation headers, optionally routes calls through a
//! remote dev-mode simulation gate, normalizes streaming results, measures
//! wall-clock timing, and delivers finished records to pluggable logging
//! sinks — all without the wrapped client's cooperation.
//!
//! The building blocks:
//!
//! - [`registry::MethodRegistry`] — the dispatch table of callable paths
//! - [`interceptor::Interceptor`] — the call protocol and session lifecycle
//! - [`simulation::SimulationGate`] — the simulate-or-execute decision point
//! - [`streaming`] — buffering of chunked emitters into a single value
//! - [`sinks::LoggingSink`] — best-effort record delivery
//!
//! Most integrators use the `tunerkit-sdk` crate instead of this one.

pub mod config;
pub mod error;
pub mod headers;
pub mod interceptor;
pub mod record;
pub mod registry;
pub mod session;
pub mod simulation;
pub mod sinks;
pub mod streaming;
pub mod timing;

pub use config::TunerkitConfig;
pub use error::{TunerkitError, TunerkitResult};
pub use headers::CallHeaders;
pub use interceptor::{Interceptor, SessionOptions};
pub use record::InvocationRecord;
pub use registry::{CallOutcome, MethodHandler, MethodPath, MethodRegistry};
pub use session::{SessionContext, SessionPath, SessionType};
pub use simulation::{HttpSimulationGate, SimulationDecision, SimulationGate};
pub use sinks::{HeliconeConfig, HeliconeSink, LoggingSink, TunerkitLogSink};
pub use streaming::ChunkStream;
pub use timing::{TimePoint, TimingRecord};
