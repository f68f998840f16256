//! Translation Error Types

use thiserror::Error;

/// Malformed payload errors: raised when an inbound notification cannot be turned into an incident.
///
/// Every variant means the payload is malformed; the invocation must abort
/// before any outbound call is made.
#[derive(Debug, Error)]
pub enum MalformedPayloadError {
    /// `message.data` was a string but not valid base64
    #[error("message data is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// Decoded bytes were not UTF-8
    #[error("message data is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Payload could not be parsed as the expected JSON document
    #[error("invalid JSON document: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Envelope shape not recognised
    #[error("unrecognised envelope: {0}")]
    InvalidEnvelope(String),

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A field was present but carried an unrecognised value
    #[error("invalid value {value:?} for {field}")]
    InvalidValue { field: &'static str, value: String },
}

impl MalformedPayloadError {
    pub(crate) fn invalid_value(field: &'static str, value: impl Into<String>) -> Self {
        MalformedPayloadError::InvalidValue {
            field,
            value: value.into(),
        }
    }
}
