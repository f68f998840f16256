//! Reconciliation Dispatcher
//!
//! Opens a Statuspage incident for every opening Cloud Monitoring incident
//! and resolves every unresolved Statuspage incident that was opened for a
//! closing one.

use crate::error::DispatchError;
use crate::requests::{open_request, resolve_request};
use incident_translator::{Incident, IncidentState};
use statuspage_client::IncidentService;
use std::sync::Arc;
use tracing::{debug, error, info};

/// What a dispatch did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Create call issued; `remote_id` is `None` when it failed
    Opened { remote_id: Option<String> },
    /// Close handled against the unresolved incident listing
    Resolved {
        /// Remote incidents carrying the source incident id
        matched: usize,
        /// Matches successfully resolved
        resolved: usize,
        /// Matches whose update call failed
        failed: usize,
    },
}

/// Dispatcher bound to one incident service
#[derive(Clone)]
pub struct Dispatcher {
    service: Arc<dyn IncidentService>,
}

impl Dispatcher {
    /// Create a new dispatcher
    pub fn new(service: Arc<dyn IncidentService>) -> Self {
        Self { service }
    }

    /// Mirror `incident` onto Statuspage according to its state
    pub async fn dispatch(&self, incident: &Incident) -> Result<DispatchOutcome, DispatchError> {
        info!(
            incident_id = incident.id(),
            state = %incident.state(),
            "Received status change signal"
        );

        match incident.state() {
            IncidentState::Open => Ok(self.open_incident(incident).await),
            IncidentState::Closed => self.resolve_incidents(incident).await,
        }
    }

    /// Issue one create call. Failures are logged, never retried.
    pub async fn open_incident(&self, incident: &Incident) -> DispatchOutcome {
        let request = open_request(incident);

        match self.service.create_incident(&request).await {
            Ok(remote) => {
                metrics::counter!("statuspage_incidents_created_total").increment(1);
                info!(
                    incident_id = incident.id(),
                    remote_id = %remote.id,
                    components = request.incident.component_ids.len(),
                    "Statuspage incident created"
                );
                DispatchOutcome::Opened {
                    remote_id: Some(remote.id),
                }
            }
            Err(e) => {
                metrics::counter!("statuspage_incidents_create_failed_total").increment(1);
                error!(
                    incident_id = incident.id(),
                    error = %e,
                    "POST call to Statuspage failed"
                );
                DispatchOutcome::Opened { remote_id: None }
            }
        }
    }

    /// Resolve every unresolved remote incident correlated with `incident`.
    ///
    /// A failing listing aborts the whole close; a failing update only
    /// affects its own incident.
    pub async fn resolve_incidents(
        &self,
        incident: &Incident,
    ) -> Result<DispatchOutcome, DispatchError> {
        let unresolved = self
            .service
            .list_unresolved()
            .await
            .map_err(DispatchError::ListUnresolved)?;

        let total = unresolved.len();
        let matches: Vec<_> = unresolved
            .into_iter()
            .filter(|remote| remote.correlation_id() == Some(incident.id()))
            .collect();

        debug!(
            incident_id = incident.id(),
            unresolved = total,
            matched = matches.len(),
            "Matched unresolved Statuspage incidents"
        );

        let mut resolved = 0;
        let mut failed = 0;

        for remote in &matches {
            let request = resolve_request(incident, remote);
            match self.service.update_incident(&remote.id, &request).await {
                Ok(_) => {
                    resolved += 1;
                    metrics::counter!("statuspage_incidents_resolved_total").increment(1);
                    debug!(incident_id = incident.id(), remote_id = %remote.id, "Statuspage incident resolved");
                }
                Err(e) => {
                    failed += 1;
                    metrics::counter!("statuspage_incidents_resolve_failed_total").increment(1);
                    error!(
                        incident_id = incident.id(),
                        remote_id = %remote.id,
                        error = %e,
                        "PATCH call to Statuspage failed"
                    );
                }
            }
        }

        info!(
            incident_id = incident.id(),
            resolved,
            failed,
            "{} incident(s) marked as resolved",
            resolved
        );

        Ok(DispatchOutcome::Resolved {
            matched: matches.len(),
            resolved,
            failed,
        })
    }
}
