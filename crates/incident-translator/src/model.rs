//! Incident Value Objects
//!
//! Closed enumerations for the lifecycle, impact and component status of an
//! incident, plus the immutable [`Incident`] produced by the translator.

use crate::error::MalformedPayloadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle signal carried by a Cloud Monitoring incident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentState {
    Open,
    Closed,
}

impl IncidentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentState::Open => "open",
            IncidentState::Closed => "closed",
        }
    }
}

impl FromStr for IncidentState {
    type Err = MalformedPayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(IncidentState::Open),
            "closed" => Ok(IncidentState::Closed),
            other => Err(MalformedPayloadError::invalid_value("incident.state", other)),
        }
    }
}

impl fmt::Display for IncidentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit incident impact override.
///
/// When absent, Statuspage derives the impact from the statuses of the
/// affected components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentImpact {
    None,
    Maintenance,
    Minor,
    Major,
    Critical,
}

impl IncidentImpact {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentImpact::None => "none",
            IncidentImpact::Maintenance => "maintenance",
            IncidentImpact::Minor => "minor",
            IncidentImpact::Major => "major",
            IncidentImpact::Critical => "critical",
        }
    }
}

impl FromStr for IncidentImpact {
    type Err = MalformedPayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(IncidentImpact::None),
            "maintenance" => Ok(IncidentImpact::Maintenance),
            "minor" => Ok(IncidentImpact::Minor),
            "major" => Ok(IncidentImpact::Major),
            "critical" => Ok(IncidentImpact::Critical),
            _ => Err(MalformedPayloadError::invalid_value(
                "statuspage_incident_impact",
                s,
            )),
        }
    }
}

impl fmt::Display for IncidentImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a Statuspage component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    Operational,
    UnderMaintenance,
    DegradedPerformance,
    PartialOutage,
    #[default]
    MajorOutage,
}

impl ComponentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentStatus::Operational => "operational",
            ComponentStatus::UnderMaintenance => "under_maintenance",
            ComponentStatus::DegradedPerformance => "degraded_performance",
            ComponentStatus::PartialOutage => "partial_outage",
            ComponentStatus::MajorOutage => "major_outage",
        }
    }
}

impl FromStr for ComponentStatus {
    type Err = MalformedPayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "operational" => Ok(ComponentStatus::Operational),
            "under_maintenance" => Ok(ComponentStatus::UnderMaintenance),
            "degraded_performance" => Ok(ComponentStatus::DegradedPerformance),
            "partial_outage" => Ok(ComponentStatus::PartialOutage),
            "major_outage" => Ok(ComponentStatus::MajorOutage),
            _ => Err(MalformedPayloadError::invalid_value(
                "statuspage_components_status",
                s,
            )),
        }
    }
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A translated Cloud Monitoring incident.
///
/// Only [`Translator::translate`](crate::Translator::translate) builds this
/// value; it is read-only afterwards and lives for a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incident {
    id: String,
    state: IncidentState,
    policy_name: String,
    name: String,
    start_info: String,
    end_info: String,
    impact: Option<IncidentImpact>,
    affected_components: Vec<String>,
    set_components_status: ComponentStatus,
    send_notifications: bool,
}

/// Field set handed to [`Incident::new`]
#[derive(Debug, Clone)]
pub(crate) struct IncidentParts {
    pub id: String,
    pub state: IncidentState,
    pub policy_name: String,
    pub name: String,
    pub start_info: String,
    pub end_info: String,
    pub impact: Option<IncidentImpact>,
    pub affected_components: Vec<String>,
    pub set_components_status: ComponentStatus,
    pub send_notifications: bool,
}

impl Incident {
    pub(crate) fn new(parts: IncidentParts) -> Result<Self, MalformedPayloadError> {
        if parts.id.trim().is_empty() {
            return Err(MalformedPayloadError::MissingField("incident.incident_id"));
        }

        Ok(Self {
            id: parts.id,
            state: parts.state,
            policy_name: parts.policy_name,
            name: parts.name,
            start_info: parts.start_info,
            end_info: parts.end_info,
            impact: parts.impact,
            affected_components: parts.affected_components,
            set_components_status: parts.set_components_status,
            send_notifications: parts.send_notifications,
        })
    }

    /// Source incident id, used as the correlation key
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> IncidentState {
        self.state
    }

    pub fn policy_name(&self) -> &str {
        &self.policy_name
    }

    /// Public-facing incident title
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Public message shown when the incident opens
    pub fn start_info(&self) -> &str {
        &self.start_info
    }

    /// Public message shown when the incident is resolved
    pub fn end_info(&self) -> &str {
        &self.end_info
    }

    pub fn impact(&self) -> Option<IncidentImpact> {
        self.impact
    }

    /// Statuspage component ids, in label order
    pub fn affected_components(&self) -> &[String] {
        &self.affected_components
    }

    /// Status applied to every affected component on open
    pub fn set_components_status(&self) -> ComponentStatus {
        self.set_components_status
    }

    pub fn send_notifications(&self) -> bool {
        self.send_notifications
    }
}
