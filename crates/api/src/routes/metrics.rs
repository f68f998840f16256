//! Metrics Route

use axum::{extract::State, http::header, response::IntoResponse};
use std::sync::Arc;

use crate::AppState;

/// Prometheus text exposition
pub async fn render_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        state.metrics.render(),
    )
}
