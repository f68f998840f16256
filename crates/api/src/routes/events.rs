//! Incident Event Route
//!
//! Pub/Sub push endpoint. Any non-2xx response makes Pub/Sub redeliver the
//! message, so only failures that abort the invocation map to one.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use incident_translator::MalformedPayloadError;
use reconciler::{DispatchError, DispatchOutcome};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

use crate::AppState;

/// Failures that terminate an invocation
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Unable to parse incident notification: {0}")]
    Malformed(#[from] MalformedPayloadError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let status = match &self {
            EventError::Malformed(_) => StatusCode::BAD_REQUEST,
            EventError::Dispatch(DispatchError::ListUnresolved(_)) => StatusCode::BAD_GATEWAY,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Translate the pushed notification and mirror it onto Statuspage
pub async fn receive_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<StatusCode, EventError> {
    let incident = state.translator.translate_body(&body).map_err(|e| {
        metrics::counter!("statuspage_events_rejected_total").increment(1);
        error!(error = %e, "Unable to parse incident notification");
        e
    })?;

    let outcome = state.dispatcher.dispatch(&incident).await.map_err(|e| {
        error!(incident_id = incident.id(), error = %e, "Incident reconciliation aborted");
        e
    })?;

    match &outcome {
        DispatchOutcome::Opened { remote_id } => {
            debug!(incident_id = incident.id(), remote_id = ?remote_id, "Open signal handled");
        }
        DispatchOutcome::Resolved {
            matched,
            resolved,
            failed,
        } => {
            debug!(incident_id = incident.id(), matched, resolved, failed, "Close signal handled");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}
