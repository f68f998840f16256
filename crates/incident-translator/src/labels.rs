//! Policy User Label Parsing
//!
//! Alerting policies carry `statuspage_*` user labels that steer how the
//! incident is mirrored on Statuspage.

use crate::error::MalformedPayloadError;
use crate::model::{ComponentStatus, IncidentImpact};
use serde_json::Value;
use std::collections::HashMap;

/// Label holding an explicit impact override
pub const LABEL_INCIDENT_IMPACT: &str = "statuspage_incident_impact";
/// Label holding the status applied to affected components
pub const LABEL_COMPONENTS_STATUS: &str = "statuspage_components_status";
/// Label toggling subscriber notifications
pub const LABEL_SEND_NOTIFICATION: &str = "statuspage_send_notification";
/// Label listing affected component ids
pub const LABEL_AFFECTED_COMPONENTS: &str = "statuspage_affected_components";

/// Separator between component ids. Label values may not contain commas.
pub const COMPONENT_SEPARATOR: &str = "__";

/// Statuspage settings read from policy user labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSettings {
    pub impact: Option<IncidentImpact>,
    pub components_status: ComponentStatus,
    pub send_notifications: bool,
    pub affected_components: Vec<String>,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            impact: None,
            components_status: ComponentStatus::default(),
            send_notifications: true,
            affected_components: Vec::new(),
        }
    }
}

impl LabelSettings {
    /// Read settings from a label map, applying defaults for absent labels.
    pub fn from_labels(labels: &HashMap<String, Value>) -> Result<Self, MalformedPayloadError> {
        let impact = label_str(labels, LABEL_INCIDENT_IMPACT)?
            .map(|v| v.parse::<IncidentImpact>())
            .transpose()?;

        let components_status = label_str(labels, LABEL_COMPONENTS_STATUS)?
            .map(|v| v.parse::<ComponentStatus>())
            .transpose()?
            .unwrap_or_default();

        let send_notifications = match labels.get(LABEL_SEND_NOTIFICATION) {
            None | Some(Value::Null) => true,
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(raw)) => parse_flag(raw)?,
            Some(other) => {
                return Err(MalformedPayloadError::invalid_value(
                    LABEL_SEND_NOTIFICATION,
                    other.to_string(),
                ))
            }
        };

        let affected_components = label_str(labels, LABEL_AFFECTED_COMPONENTS)?
            .map(split_components)
            .unwrap_or_default();

        Ok(Self {
            impact,
            components_status,
            send_notifications,
            affected_components,
        })
    }
}

/// Split a component label into ids, dropping empty segments.
///
/// Order is preserved and duplicates are kept.
pub fn split_components(raw: &str) -> Vec<String> {
    raw.split(COMPONENT_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

fn label_str<'a>(
    labels: &'a HashMap<String, Value>,
    key: &'static str,
) -> Result<Option<&'a str>, MalformedPayloadError> {
    match labels.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.as_str())),
        Some(other) => Err(MalformedPayloadError::invalid_value(key, other.to_string())),
    }
}

fn parse_flag(raw: &str) -> Result<bool, MalformedPayloadError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(MalformedPayloadError::invalid_value(LABEL_SEND_NOTIFICATION, raw)),
    }
}
