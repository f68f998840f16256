//! Statuspage Request Builders

use incident_translator::{ComponentStatus, Incident};
use statuspage_client::{
    BridgeMetadata, ComponentStatuses, CreateIncidentRequest, IncidentMetadata, IncidentStatus,
    IncidentUpdate, NewIncident, RemoteIncident, UpdateIncidentRequest, CREATED_BY,
};

/// Title given to every incident opened on Statuspage
pub const PUBLIC_INCIDENT_NAME: &str = "Service outage";

/// Build the `POST incidents` body for an opening incident
pub fn open_request(incident: &Incident) -> CreateIncidentRequest {
    let component_ids = incident.affected_components().to_vec();

    CreateIncidentRequest {
        incident: NewIncident {
            name: PUBLIC_INCIDENT_NAME.to_string(),
            status: IncidentStatus::Investigating,
            metadata: IncidentMetadata {
                data: BridgeMetadata {
                    created_by: CREATED_BY.to_string(),
                    gcp_incident_id: incident.id().to_string(),
                    gcp_policy_name: incident.policy_name().to_string(),
                },
            },
            deliver_notifications: incident.send_notifications(),
            body: incident.start_info().to_string(),
            components: ComponentStatuses::uniform(
                component_ids.iter().cloned(),
                incident.set_components_status(),
            ),
            component_ids,
            impact_override: incident.impact(),
        },
    }
}

/// Build the `PATCH incidents/{id}` body resolving `remote`
///
/// Every component attached to the remote incident goes back to operational.
pub fn resolve_request(incident: &Incident, remote: &RemoteIncident) -> UpdateIncidentRequest {
    UpdateIncidentRequest {
        incident: IncidentUpdate {
            status: IncidentStatus::Resolved,
            body: incident.end_info().to_string(),
            components: ComponentStatuses::uniform(
                remote.component_ids(),
                ComponentStatus::Operational,
            ),
        },
    }
}
