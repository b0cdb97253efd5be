//! Error types for the Tunerkit SDK

use thiserror::Error;

/// Result type alias for Tunerkit operations
pub type TunerkitResult<T> = Result<T, TunerkitError>;

/// Main error type for the Tunerkit SDK
#[derive(Error, Debug, Clone)]
pub enum TunerkitError {
    /// Requested path does not resolve to a registered method
    #[error("Method not found: {path}")]
    MethodNotFound { path: String },

    /// Simulation endpoint unreachable or returned a non-success status.
    /// The real call is never attempted after this error.
    #[error("Simulation unavailable (status {status:?}): {message}")]
    SimulationUnavailable {
        status: Option<u16>,
        message: String,
    },

    /// Accumulated streamed text failed to decode as structured data
    #[error("Stream decode error: {0}")]
    StreamDecode(String),

    /// Delivery to a logging sink failed. Recovered inside the dispatcher;
    /// never surfaced to the caller of an intercepted method.
    #[error("Log delivery failed: {0}")]
    Logging(String),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("Error: {0}")]
    Other(String),
}

impl TunerkitError {
    /// Create a new method-not-found error
    pub fn method_not_found(path: impl Into<String>) -> Self {
        Self::MethodNotFound { path: path.into() }
    }

    /// Create a new simulation-unavailable error
    pub fn simulation_unavailable(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::SimulationUnavailable {
            status,
            message: message.into(),
        }
    }

    /// Create a new stream decode error
    pub fn stream_decode(message: impl Into<String>) -> Self {
        Self::StreamDecode(message.into())
    }

    /// Create a new log delivery error
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging(message.into())
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl From<anyhow::Error> for TunerkitError {
    fn from(error: anyhow::Error) -> Self {
        Self::Other(error.to_string())
    }
}

impl From<serde_json::Error> for TunerkitError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

impl From<reqwest::Error> for TunerkitError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error.to_string())
    }
}
