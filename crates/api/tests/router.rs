//! Router tests against an in-memory incident service

use api::{create_router, AppState};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use incident_translator::Translator;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use statuspage_client::{
    CreateIncidentRequest, IncidentService, RemoteIncident, StatuspageError, UpdateIncidentRequest,
};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
struct RecordingService {
    unresolved: Vec<RemoteIncident>,
    fail_list: bool,
    calls: Mutex<Vec<String>>,
}

impl RecordingService {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IncidentService for RecordingService {
    async fn create_incident(
        &self,
        request: &CreateIncidentRequest,
    ) -> Result<RemoteIncident, StatuspageError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("POST {}", request.incident.metadata.data.gcp_incident_id));
        Ok(serde_json::from_value(json!({ "id": "remote-1" }))?)
    }

    async fn list_unresolved(&self) -> Result<Vec<RemoteIncident>, StatuspageError> {
        self.calls.lock().unwrap().push("GET unresolved".to_string());
        if self.fail_list {
            return Err(StatuspageError::Status {
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(self.unresolved.clone())
    }

    async fn update_incident(
        &self,
        incident_id: &str,
        _request: &UpdateIncidentRequest,
    ) -> Result<RemoteIncident, StatuspageError> {
        self.calls.lock().unwrap().push(format!("PATCH {incident_id}"));
        Ok(serde_json::from_value(json!({ "id": incident_id }))?)
    }
}

fn app(service: Arc<RecordingService>) -> axum::Router {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    let state = AppState::new(Translator::default(), service, handle);
    create_router(Arc::new(state))
}

fn push_body(state: &str) -> Value {
    let document = json!({
        "incident": {
            "incident_id": "0.m3x",
            "state": state,
            "policy_name": "frontend-uptime",
            "policy_user_labels": { "statuspage_affected_components": "c1__c2" }
        }
    });
    json!({
        "message": { "data": STANDARD.encode(document.to_string()), "messageId": "42" },
        "subscription": "projects/p/subscriptions/statuspage"
    })
}

fn post(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn open_event_creates_incident() {
    let service = Arc::new(RecordingService::default());

    let response = app(service.clone())
        .oneshot(post("/", push_body("open").to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(service.calls(), vec!["POST 0.m3x"]);
}

#[tokio::test]
async fn close_event_resolves_matches() {
    let service = Arc::new(RecordingService {
        unresolved: vec![
            serde_json::from_value(json!({
                "id": "remote-1",
                "metadata": { "data": { "gcp_incident_id": "0.m3x" } },
                "components": [{ "id": "c1" }]
            }))
            .unwrap(),
            serde_json::from_value(json!({ "id": "remote-2", "metadata": {} })).unwrap(),
        ],
        ..Default::default()
    });

    let response = app(service.clone())
        .oneshot(post("/events", push_body("closed").to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(service.calls(), vec!["GET unresolved", "PATCH remote-1"]);
}

#[tokio::test]
async fn malformed_event_is_rejected_without_calls() {
    let service = Arc::new(RecordingService::default());

    let response = app(service.clone())
        .oneshot(post("/", json!({ "message": { "data": "***" } }).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("base64"));
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn listing_failure_is_bad_gateway() {
    let service = Arc::new(RecordingService {
        fail_list: true,
        ..Default::default()
    });

    let response = app(service.clone())
        .oneshot(post("/", push_body("closed").to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(service.calls(), vec!["GET unresolved"]);
}

#[tokio::test]
async fn health_reports_version() {
    let response = app(Arc::new(RecordingService::default()))
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn metrics_endpoint_serves_text() {
    let response = app(Arc::new(RecordingService::default()))
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}
