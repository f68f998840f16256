//! Statuspage Manager HTTP Server
//!
//! Receives Cloud Monitoring incident notifications pushed by Pub/Sub and
//! mirrors them onto Statuspage.

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use incident_translator::Translator;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use reconciler::Dispatcher;
use serde::Serialize;
use statuspage_client::{IncidentService, StatuspageClient, StatuspageError};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod settings;

pub use settings::{Settings, SettingsError};

/// Application state shared across handlers
pub struct AppState {
    /// Inbound notification translator
    pub translator: Translator,
    /// Outbound reconciliation
    pub dispatcher: Dispatcher,
    /// Prometheus exposition handle
    pub metrics: PrometheusHandle,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create application state around an incident service
    pub fn new(
        translator: Translator,
        service: Arc<dyn IncidentService>,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            translator,
            dispatcher: Dispatcher::new(service),
            metrics,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Build state from settings with a live Statuspage client
    pub fn from_settings(
        settings: &Settings,
        metrics: PrometheusHandle,
    ) -> Result<Self, StatuspageError> {
        let client = StatuspageClient::new(&settings.client_config())?;
        Ok(Self::new(
            Translator::new(settings.translator_config()),
            Arc::new(client),
            metrics,
        ))
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(routes::events::receive_event))
        .route("/events", post(routes::events::receive_event))
        .route("/health", get(health_handler))
        .route("/metrics", get(routes::metrics::render_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

/// Initialize JSON logging; level comes from `RUST_LOG` (default `info`)
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .json()
        .init();
}

/// Install the global Prometheus recorder
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Run the server until SIGINT/SIGTERM
pub async fn run_server(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
