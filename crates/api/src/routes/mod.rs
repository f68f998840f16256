//! HTTP Routes

pub mod events;
pub mod metrics;
