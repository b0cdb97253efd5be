//! Correlation headers merged into every outgoing request

use crate::session::SessionPath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wire names of the correlation header set
pub mod names {
    pub const DATASET_ID: &str = "Tunerkit-Dataset-Id";
    pub const SESSION_ID: &str = "Tunerkit-Session-Id";
    pub const RECORD_ID: &str = "Tunerkit-Record-Id";
    pub const SESSION_PARENT_ID: &str = "Tunerkit-Session-Parent-Id";
    pub const SESSION_TYPE: &str = "Tunerkit-Session-Type";
    pub const SESSION_PATH: &str = "Tunerkit-Session-Path";
}

/// The wire representation of a session context, plus the optional
/// `Tunerkit-Session-Path` boundary marker.
///
/// Absent fields are omitted, never sent as empty strings. Iteration order is
/// stable (sorted by header name).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallHeaders {
    entries: BTreeMap<String, String>,
}

impl CallHeaders {
    /// Create an empty header set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing any existing value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Tag this header set as a session boundary event
    pub fn with_path(self, path: SessionPath) -> Self {
        self.with(names::SESSION_PATH, path.as_str())
    }

    /// Look up a header value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// The boundary marker, if this set carries one
    pub fn session_path(&self) -> Option<&str> {
        self.get(names::SESSION_PATH)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over `(name, value)` pairs in header-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Merge `overrides` on top of this set.
    ///
    /// Overriding fields win; fields only present in `self` are kept. This is
    /// the precedence rule for explicit per-call headers over session-derived
    /// headers.
    pub fn merged_with(mut self, overrides: CallHeaders) -> Self {
        self.entries.extend(overrides.entries);
        self
    }
}

impl FromIterator<(String, String)> for CallHeaders {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_and_gaps_are_filled() {
        let session = CallHeaders::new()
            .with(names::SESSION_ID, "sess-1")
            .with(names::DATASET_ID, "ds-1");
        let explicit = CallHeaders::new().with(names::SESSION_ID, "sess-2");

        let merged = session.merged_with(explicit);
        assert_eq!(merged.get(names::SESSION_ID), Some("sess-2"));
        assert_eq!(merged.get(names::DATASET_ID), Some("ds-1"));
    }

    #[test]
    fn boundary_marker_round_trips() {
        let headers = CallHeaders::new().with_path(SessionPath::Start);
        assert_eq!(headers.session_path(), Some("__START__"));

        let plain = CallHeaders::new();
        assert_eq!(plain.session_path(), None);
    }

    #[test]
    fn iteration_is_name_ordered() {
        let headers = CallHeaders::new()
            .with(names::SESSION_ID, "s")
            .with(names::DATASET_ID, "d");
        let names: Vec<&str> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec![names::DATASET_ID, names::SESSION_ID]);
    }

    #[test]
    fn serializes_as_a_flat_map() {
        let headers = CallHeaders::new().with(names::RECORD_ID, "rec-1");
        let json = serde_json::to_value(&headers).unwrap();
        assert_eq!(json, serde_json::json!({ "Tunerkit-Record-Id": "rec-1" }));
    }
}
