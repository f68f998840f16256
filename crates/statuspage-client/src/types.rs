//! Statuspage Wire Types
//!
//! Request and response bodies for the incident endpoints.
//! https://developer.statuspage.io/#tag/incidents

use incident_translator::{ComponentStatus, IncidentImpact};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Value of `metadata.data.created_by` on incidents opened by this service
pub const CREATED_BY: &str = "statuspage-manager";

/// Incident status on Statuspage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Investigating,
    Identified,
    Monitoring,
    Resolved,
}

/// Component id to status map, in insertion order.
///
/// A repeated id keeps its first position; JSON objects cannot hold
/// duplicate keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentStatuses(Vec<(String, ComponentStatus)>);

impl ComponentStatuses {
    /// Assign the same status to every id
    pub fn uniform<I, S>(ids: I, status: ComponentStatus) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<(String, ComponentStatus)> = Vec::new();
        for id in ids {
            let id = id.into();
            if !entries.iter().any(|(existing, _)| *existing == id) {
                entries.push((id, status));
            }
        }
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(id, _)| id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<ComponentStatus> {
        self.0
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, status)| *status)
    }
}

impl Serialize for ComponentStatuses {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, status) in &self.0 {
            map.serialize_entry(id, status)?;
        }
        map.end()
    }
}

/// `metadata.data` written on incidents created by this service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeMetadata {
    pub created_by: String,
    pub gcp_incident_id: String,
    pub gcp_policy_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncidentMetadata {
    pub data: BridgeMetadata,
}

/// Body of `POST incidents`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateIncidentRequest {
    pub incident: NewIncident,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewIncident {
    pub name: String,
    pub status: IncidentStatus,
    pub metadata: IncidentMetadata,
    pub deliver_notifications: bool,
    pub body: String,
    pub components: ComponentStatuses,
    pub component_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact_override: Option<IncidentImpact>,
}

/// Body of `PATCH incidents/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateIncidentRequest {
    pub incident: IncidentUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncidentUpdate {
    pub status: IncidentStatus,
    pub body: String,
    pub components: ComponentStatuses,
}

/// Incident as returned by Statuspage. Only the fields used here are kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteIncident {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub components: Vec<RemoteComponent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteComponent {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl RemoteIncident {
    /// Source incident id stored in `metadata.data.gcp_incident_id`
    pub fn correlation_id(&self) -> Option<&str> {
        self.metadata
            .as_ref()?
            .get("data")?
            .get("gcp_incident_id")?
            .as_str()
    }

    pub fn component_ids(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.id.as_str())
    }
}
