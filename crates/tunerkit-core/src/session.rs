//! Session context: the correlation identifiers attached to every record
//!
//! One context is shared across all call sites of a client instance. It is
//! overwritten by session lifecycle calls and never destroyed. Setting a
//! session concurrently with in-flight calls is racy by design: a call that
//! reads the context late picks up whichever session is active at that
//! moment. Set the session before a batch of correlated calls.

use crate::error::TunerkitError;
use crate::headers::{names, CallHeaders};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Session kind. `Test` routes every proxied call through the simulation
/// gate; `Real` executes methods directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    #[default]
    Real,
    Test,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = TunerkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "real" => Ok(Self::Real),
            "test" => Ok(Self::Test),
            other => Err(TunerkitError::invalid_input(format!(
                "Unknown session type '{other}'"
            ))),
        }
    }
}

/// Marker distinguishing session boundary events from ordinary call logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPath {
    Start,
    End,
}

impl SessionPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "__START__",
            Self::End => "__END__",
        }
    }
}

/// Correlation identifiers for a logical grouping of calls.
///
/// Created empty at client construction and overwritten by
/// `start_session`/`set_session`. An inactive context contributes no headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub dataset_id: Option<String>,
    pub session_id: Option<String>,
    pub record_id: Option<String>,
    pub session_parent_id: Option<String>,
    pub session_type: SessionType,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any correlation identifier has been assigned
    pub fn is_active(&self) -> bool {
        self.dataset_id.is_some()
            || self.session_id.is_some()
            || self.record_id.is_some()
            || self.session_parent_id.is_some()
    }

    /// Wire representation: the non-empty subset of the `Tunerkit-*` headers.
    ///
    /// The session type is only sent once the context is active, so calls
    /// made before any session was started carry no correlation headers.
    pub fn to_headers(&self) -> CallHeaders {
        let mut headers = CallHeaders::new();
        if let Some(dataset_id) = &self.dataset_id {
            headers.insert(names::DATASET_ID, dataset_id);
        }
        if let Some(session_id) = &self.session_id {
            headers.insert(names::SESSION_ID, session_id);
        }
        if let Some(record_id) = &self.record_id {
            headers.insert(names::RECORD_ID, record_id);
        }
        if let Some(parent_id) = &self.session_parent_id {
            headers.insert(names::SESSION_PARENT_ID, parent_id);
        }
        if self.is_active() {
            headers.insert(names::SESSION_TYPE, self.session_type.as_str());
        }
        headers
    }
}
