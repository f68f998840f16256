//! Dispatch Error Types

use statuspage_client::StatuspageError;
use thiserror::Error;

/// Failures that abort a dispatch.
///
/// Create and per-incident resolve failures are logged and do not appear
/// here.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Unresolved incidents could not be listed, so nothing can be resolved
    #[error("Failed to list unresolved incidents: {0}")]
    ListUnresolved(#[source] StatuspageError),
}
