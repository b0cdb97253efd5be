//! Pluggable logging sinks
//!
//! A sink receives every finished [`InvocationRecord`] and is responsible
//! for delivering it somewhere. Delivery is best-effort: the dispatcher
//! catches and reports every sink error, and nothing a sink does can alter
//! or delay the intercepted call's result.

mod endpoint;
mod helicone;

pub use endpoint::TunerkitLogSink;
pub use helicone::{HeliconeConfig, HeliconeSink};

use crate::error::TunerkitResult;
use crate::record::InvocationRecord;
use async_trait::async_trait;

/// Destination for finished invocation records
#[async_trait]
pub trait LoggingSink: Send + Sync {
    /// Stable sink name used in diagnostics
    fn name(&self) -> &str;

    /// Deliver one record. Errors are reported by the dispatcher and never
    /// reach the caller of the intercepted method.
    async fn log(&self, record: &InvocationRecord) -> TunerkitResult<()>;
}
