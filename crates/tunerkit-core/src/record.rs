//! Invocation records: the unit handed to logging sinks

use crate::headers::CallHeaders;
use crate::timing::TimingRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Meta key under which the interceptor records the resolved method path
pub const META_METHOD: &str = "tunerkit-method";

/// Everything one intercepted call produced.
///
/// Invariant: `response` is exactly the value the original caller received,
/// whether it came from the real method or the simulation gate. The log path
/// and the return path never diverge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationRecord {
    /// Parameters the caller passed to the method
    pub params: Value,
    /// The value returned to the caller (real or simulated)
    pub response: Value,
    /// Correlation headers attached to the call
    pub headers: CallHeaders,
    /// Optional metadata: resolved method path, integrator-supplied tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, String>>,
    /// Wall-clock interval of the invocation
    pub timing: TimingRecord,
}

impl InvocationRecord {
    pub fn new(
        params: Value,
        response: Value,
        headers: CallHeaders,
        timing: TimingRecord,
    ) -> Self {
        Self {
            params,
            response,
            headers,
            meta: None,
            timing,
        }
    }

    /// Attach one metadata entry
    pub fn with_meta_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// The resolved method path, when the interceptor recorded one
    pub fn method(&self) -> Option<&str> {
        self.meta
            .as_ref()
            .and_then(|meta| meta.get(META_METHOD))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> InvocationRecord {
        InvocationRecord::new(
            json!({"prompt": "hi"}),
            json!({"text": "hello"}),
            CallHeaders::new(),
            TimingRecord::instant(),
        )
    }

    #[test]
    fn method_reads_the_meta_entry() {
        let rec = record().with_meta_entry(META_METHOD, "chat.completions.create");
        assert_eq!(rec.method(), Some("chat.completions.create"));
        assert_eq!(record().method(), None);
    }

    #[test]
    fn meta_is_omitted_from_serialization_when_absent() {
        let json = serde_json::to_value(record()).unwrap();
        assert!(json.get("meta").is_none());
        assert!(json.get("timing").is_some());
    }
}
