//! Incident Reconciliation
//!
//! Mirrors the lifecycle of Cloud Monitoring incidents onto Statuspage:
//! opening incidents create a Statuspage incident, closing incidents resolve
//! every unresolved Statuspage incident carrying the same source id.

mod dispatcher;
mod error;
mod requests;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::DispatchError;
pub use requests::{open_request, resolve_request, PUBLIC_INCIDENT_NAME};
