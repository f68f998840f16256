//! Statuspage Client
//!
//! Wire types and an async client for the Statuspage incident endpoints
//! (create, list unresolved, update).

mod client;
mod error;
mod types;

pub use client::{ClientConfig, IncidentService, StatuspageClient, DEFAULT_API_BASE_URL};
pub use error::StatuspageError;
pub use types::{
    BridgeMetadata, ComponentStatuses, CreateIncidentRequest, IncidentMetadata, IncidentStatus,
    IncidentUpdate, NewIncident, RemoteComponent, RemoteIncident, UpdateIncidentRequest,
    CREATED_BY,
};
