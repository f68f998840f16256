//! Incident Translation
//!
//! Parses Cloud Monitoring incident notifications (delivered through Pub/Sub)
//! into validated, immutable [`Incident`] values:
//! - base64 or pre-decoded message data
//! - `statuspage_*` policy label parsing with defaults
//! - public texts extracted from tagged policy documentation

mod docs;
mod envelope;
mod error;
mod labels;
mod model;
mod translator;

pub use docs::{extract_tag, PublicTag};
pub use envelope::{decode_body, decode_event, Documentation, IncidentPayload, NotificationPayload};
pub use error::MalformedPayloadError;
pub use labels::{split_components, LabelSettings, COMPONENT_SEPARATOR};
pub use model::{ComponentStatus, Incident, IncidentImpact, IncidentState};
pub use translator::{Translator, TranslatorConfig};
