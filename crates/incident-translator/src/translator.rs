//! Event Translator
//!
//! Turns a Cloud Monitoring notification into a validated [`Incident`].

use crate::docs::{extract_tag, PublicTag};
use crate::envelope::{self, NotificationPayload};
use crate::error::MalformedPayloadError;
use crate::labels::LabelSettings;
use crate::model::{Incident, IncidentParts, IncidentState};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Fallback public texts used when the policy documentation has none
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Incident title when `<public-name>` is missing
    pub default_name: String,
    /// Opening message when `<public-start-info>` is missing
    pub default_start_info: String,
    /// Closing message when `<public-end-info>` is missing
    pub default_end_info: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            default_name: "Service disruption".to_string(),
            default_start_info: "We are investigating an issue affecting this service."
                .to_string(),
            default_end_info: "This incident has been resolved.".to_string(),
        }
    }
}

/// Translator from inbound notifications to incidents
#[derive(Debug, Clone, Default)]
pub struct Translator {
    config: TranslatorConfig,
}

impl Translator {
    /// Create a new translator with the given defaults
    pub fn new(config: TranslatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translate a raw request body (Pub/Sub push or CloudEvent JSON)
    pub fn translate_body(&self, body: &[u8]) -> Result<Incident, MalformedPayloadError> {
        self.translate_payload(envelope::decode_body(body)?)
    }

    /// Translate an already-parsed envelope
    pub fn translate(&self, event: Value) -> Result<Incident, MalformedPayloadError> {
        self.translate_payload(envelope::decode_event(event)?)
    }

    /// Translate a decoded notification document
    pub fn translate_payload(
        &self,
        payload: NotificationPayload,
    ) -> Result<Incident, MalformedPayloadError> {
        let incident = payload
            .incident
            .ok_or(MalformedPayloadError::MissingField("incident"))?;

        let id = incident
            .incident_id
            .ok_or(MalformedPayloadError::MissingField("incident.incident_id"))?;
        let state: IncidentState = incident
            .state
            .as_deref()
            .ok_or(MalformedPayloadError::MissingField("incident.state"))?
            .parse()?;
        let policy_name = incident
            .policy_name
            .ok_or(MalformedPayloadError::MissingField("incident.policy_name"))?;

        let labels = incident.policy_user_labels.unwrap_or_default();
        let settings = LabelSettings::from_labels(&labels)?;

        let docs = incident
            .documentation
            .as_ref()
            .and_then(|d| d.content.as_deref());

        let parts = IncidentParts {
            id,
            state,
            policy_name,
            name: extract_tag(docs, PublicTag::Name, &self.config.default_name),
            start_info: extract_tag(docs, PublicTag::StartInfo, &self.config.default_start_info),
            end_info: extract_tag(docs, PublicTag::EndInfo, &self.config.default_end_info),
            impact: settings.impact,
            affected_components: settings.affected_components,
            set_components_status: settings.components_status,
            send_notifications: settings.send_notifications,
        };

        let incident = Incident::new(parts)?;

        debug!(
            incident_id = incident.id(),
            state = %incident.state(),
            policy = incident.policy_name(),
            components = incident.affected_components().len(),
            "Translated notification"
        );

        Ok(incident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComponentStatus, IncidentImpact};
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde_json::json;

    fn config() -> TranslatorConfig {
        TranslatorConfig {
            default_name: "Default name".to_string(),
            default_start_info: "Policy breached.".to_string(),
            default_end_info: "Up and running.".to_string(),
        }
    }

    fn push(document: Value) -> Value {
        json!({ "message": { "data": STANDARD.encode(document.to_string()) } })
    }

    fn document(docs: Option<&str>) -> Value {
        let mut incident = json!({
            "incident_id": "abcd",
            "state": "open",
            "policy_name": "policy",
            "policy_user_labels": { "key": "value" },
        });
        if let Some(content) = docs {
            incident["documentation"] = json!({ "content": content, "mime_type": "text/markdown" });
        }
        json!({ "incident": incident })
    }

    #[test]
    fn test_missing_documentation_uses_defaults() {
        let translator = Translator::new(config());
        let incident = translator.translate(push(document(None))).unwrap();

        assert_eq!(incident.id(), "abcd");
        assert_eq!(incident.state(), IncidentState::Open);
        assert_eq!(incident.policy_name(), "policy");
        assert_eq!(incident.name(), "Default name");
        assert_eq!(incident.start_info(), "Policy breached.");
        assert_eq!(incident.end_info(), "Up and running.");
        assert_eq!(incident.impact(), None);
        assert!(incident.affected_components().is_empty());
        assert_eq!(incident.set_components_status(), ComponentStatus::MajorOutage);
        assert!(incident.send_notifications());
    }

    #[test]
    fn test_documentation_without_tags_uses_defaults() {
        let translator = Translator::new(config());
        let incident = translator
            .translate(push(document(Some("Some doc text."))))
            .unwrap();

        assert_eq!(incident.name(), "Default name");
        assert_eq!(incident.start_info(), "Policy breached.");
        assert_eq!(incident.end_info(), "Up and running.");
    }

    #[test]
    fn test_only_name_overridden() {
        let translator = Translator::new(config());
        let docs = "<public-name>\n\n\t Custom incident name \n\n</public-name>";
        let incident = translator.translate(push(document(Some(docs)))).unwrap();

        assert_eq!(incident.name(), "Custom incident name");
        assert_eq!(incident.start_info(), "Policy breached.");
        assert_eq!(incident.end_info(), "Up and running.");
    }

    #[test]
    fn test_defaults_are_trimmed() {
        let translator = Translator::new(TranslatorConfig {
            default_name: "  Padded  ".to_string(),
            ..config()
        });
        let incident = translator.translate(push(document(None))).unwrap();
        assert_eq!(incident.name(), "Padded");
    }

    #[test]
    fn test_labels_applied() {
        let translator = Translator::default();
        let event = push(json!({
            "incident": {
                "incident_id": "0.n1",
                "state": "closed",
                "policy_name": "latency",
                "policy_user_labels": {
                    "statuspage_incident_impact": "critical",
                    "statuspage_components_status": "degraded_performance",
                    "statuspage_send_notification": "false",
                    "statuspage_affected_components": "ab2tkbv09nzj__cdl8227q4vlf",
                }
            }
        }));

        let incident = translator.translate(event).unwrap();
        assert_eq!(incident.state(), IncidentState::Closed);
        assert_eq!(incident.impact(), Some(IncidentImpact::Critical));
        assert_eq!(
            incident.set_components_status(),
            ComponentStatus::DegradedPerformance
        );
        assert!(!incident.send_notifications());
        assert_eq!(incident.affected_components(), ["ab2tkbv09nzj", "cdl8227q4vlf"]);
    }

    #[test]
    fn test_decoded_and_encoded_forms_agree() {
        let translator = Translator::new(config());
        let doc = document(Some("<public-end-info> bye </public-end-info>"));

        let encoded = translator.translate(push(doc.clone())).unwrap();
        let decoded = translator
            .translate(json!({ "message": { "data": doc } }))
            .unwrap();
        assert_eq!(encoded, decoded);
    }

    #[test]
    fn test_missing_labels_map() {
        let translator = Translator::default();
        let event = push(json!({
            "incident": { "incident_id": "x", "state": "open", "policy_name": "p" }
        }));
        let incident = translator.translate(event).unwrap();
        assert!(incident.affected_components().is_empty());
    }

    #[test]
    fn test_required_fields() {
        let translator = Translator::default();

        for (field, expected) in [
            ("incident_id", "incident.incident_id"),
            ("state", "incident.state"),
            ("policy_name", "incident.policy_name"),
        ] {
            let mut doc = document(None);
            doc["incident"].as_object_mut().unwrap().remove(field);
            match translator.translate(push(doc)) {
                Err(MalformedPayloadError::MissingField(name)) => assert_eq!(name, expected),
                other => panic!("expected missing {expected}, got {other:?}"),
            }
        }

        assert!(matches!(
            translator.translate(push(json!({ "version": "1.2" }))),
            Err(MalformedPayloadError::MissingField("incident"))
        ));
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut doc = document(None);
        doc["incident"]["incident_id"] = json!("");
        assert!(Translator::default().translate(push(doc)).is_err());
    }

    #[test]
    fn test_unknown_state_rejected() {
        let mut doc = document(None);
        doc["incident"]["state"] = json!("acknowledged");
        assert!(matches!(
            Translator::default().translate(push(doc)),
            Err(MalformedPayloadError::InvalidValue { field: "incident.state", .. })
        ));
    }

    #[test]
    fn test_undecodable_body() {
        let translator = Translator::default();
        assert!(translator.translate_body(b"not json").is_err());
        assert!(translator
            .translate_body(br#"{"message":{"data":"%%%"}}"#)
            .is_err());
    }
}
