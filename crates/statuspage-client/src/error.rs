//! Statuspage Error Types

use thiserror::Error;

/// Errors from calls to the Statuspage API
#[derive(Debug, Error)]
pub enum StatuspageError {
    /// Request never produced a response (connect, TLS, timeout)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Statuspage answered with a non-success status
    #[error("Statuspage returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Client could not be built from the given settings
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}
