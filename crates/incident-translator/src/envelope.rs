//! Inbound Notification Envelope
//!
//! Cloud Monitoring publishes incident notifications to Pub/Sub. They reach
//! us either as a Pub/Sub push body (`{"message": {"data": ...}}`) or wrapped
//! in a structured-mode CloudEvent whose `data` holds that same body. The
//! message `data` is normally base64-encoded JSON, but an already-decoded
//! object is accepted too.

use crate::error::MalformedPayloadError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Decoded notification document
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationPayload {
    pub incident: Option<IncidentPayload>,
}

/// `incident` object of a Cloud Monitoring notification (schema 1.2)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncidentPayload {
    pub incident_id: Option<String>,
    pub state: Option<String>,
    pub policy_name: Option<String>,
    /// User labels attached to the alerting policy
    #[serde(default)]
    pub policy_user_labels: Option<HashMap<String, Value>>,
    #[serde(default)]
    pub documentation: Option<Documentation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Documentation {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, alias = "mimeType")]
    pub mime_type: Option<String>,
}

/// Pub/Sub push body
#[derive(Debug, Clone, Deserialize)]
struct PushEnvelope {
    message: Option<PubsubMessage>,
    #[serde(default)]
    subscription: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct PubsubMessage {
    data: Option<Value>,
    #[serde(default, rename = "messageId", alias = "message_id")]
    message_id: Option<String>,
}

/// Decode a raw request body into a notification payload.
pub fn decode_body(body: &[u8]) -> Result<NotificationPayload, MalformedPayloadError> {
    let value: Value = serde_json::from_slice(body)?;
    decode_event(value)
}

/// Decode an already-parsed envelope into a notification payload.
pub fn decode_event(event: Value) -> Result<NotificationPayload, MalformedPayloadError> {
    let envelope = unwrap_cloud_event(event)?;
    let envelope: PushEnvelope = serde_json::from_value(envelope)?;

    let message = envelope
        .message
        .ok_or(MalformedPayloadError::MissingField("message"))?;

    debug!(
        message_id = message.message_id.as_deref().unwrap_or("-"),
        subscription = envelope.subscription.as_deref().unwrap_or("-"),
        "Decoding notification message"
    );

    let data = message
        .data
        .ok_or(MalformedPayloadError::MissingField("message.data"))?;

    let document = match data {
        Value::String(encoded) => decode_base64_json(&encoded)?,
        Value::Object(map) => Value::Object(map),
        other => {
            return Err(MalformedPayloadError::InvalidEnvelope(format!(
                "message.data must be a base64 string or an object, got {}",
                json_kind(&other)
            )))
        }
    };

    Ok(serde_json::from_value(document)?)
}

/// Structured-mode CloudEvents carry the push body under `data`.
fn unwrap_cloud_event(event: Value) -> Result<Value, MalformedPayloadError> {
    match event {
        Value::Object(mut map) if map.contains_key("specversion") => map
            .remove("data")
            .ok_or(MalformedPayloadError::MissingField("data")),
        Value::Object(map) => Ok(Value::Object(map)),
        other => Err(MalformedPayloadError::InvalidEnvelope(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn decode_base64_json(encoded: &str) -> Result<Value, MalformedPayloadError> {
    let bytes = STANDARD.decode(encoded.trim())?;
    let text = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&text)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
