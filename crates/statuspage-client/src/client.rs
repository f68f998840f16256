//! Statuspage API Client
//!
//! [`IncidentService`] is the outbound interface the reconciler talks to;
//! [`StatuspageClient`] implements it over the Statuspage REST API.

use crate::error::StatuspageError;
use crate::types::{CreateIncidentRequest, RemoteIncident, UpdateIncidentRequest};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Public Statuspage API root
pub const DEFAULT_API_BASE_URL: &str = "https://api.statuspage.io/v1";

/// Default per-request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Outbound incident operations used by the reconciler
#[async_trait]
pub trait IncidentService: Send + Sync {
    /// `POST incidents`
    async fn create_incident(
        &self,
        request: &CreateIncidentRequest,
    ) -> Result<RemoteIncident, StatuspageError>;

    /// `GET incidents/unresolved`
    async fn list_unresolved(&self) -> Result<Vec<RemoteIncident>, StatuspageError>;

    /// `PATCH incidents/{incident_id}`
    async fn update_incident(
        &self,
        incident_id: &str,
        request: &UpdateIncidentRequest,
    ) -> Result<RemoteIncident, StatuspageError>;
}

/// Connection settings for a single Statuspage page
#[derive(Clone)]
pub struct ClientConfig {
    /// API root, without the `/pages/...` suffix
    pub api_base_url: String,
    pub page_id: String,
    /// API key, sent as `Authorization: OAuth <token>`
    pub auth_token: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(page_id: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_id: page_id.into(),
            auth_token: auth_token.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Page-scoped base URL, always ending with a slash
    pub fn page_url(&self) -> String {
        format!(
            "{}/pages/{}/",
            self.api_base_url.trim_end_matches('/'),
            self.page_id
        )
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base_url", &self.api_base_url)
            .field("page_id", &self.page_id)
            .field("auth_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// reqwest-backed Statuspage client
#[derive(Debug, Clone)]
pub struct StatuspageClient {
    client: reqwest::Client,
    page_url: String,
}

impl StatuspageClient {
    /// Create a client for the configured page
    pub fn new(config: &ClientConfig) -> Result<Self, StatuspageError> {
        if config.page_id.trim().is_empty() {
            return Err(StatuspageError::InvalidConfig("page id is empty".to_string()));
        }

        let mut auth = HeaderValue::from_str(&format!("OAuth {}", config.auth_token))
            .map_err(|_| {
                StatuspageError::InvalidConfig("auth token is not a valid header value".to_string())
            })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .user_agent(concat!("statuspage-manager/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let page_url = config.page_url();
        info!(page_url = %page_url, "Statuspage client initialized");

        Ok(Self { client, page_url })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.page_url, path))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<T, StatuspageError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(operation, status = %status, body = %body, "Statuspage request failed");
            return Err(StatuspageError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(operation, status = %status, "Statuspage request succeeded");
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl IncidentService for StatuspageClient {
    async fn create_incident(
        &self,
        request: &CreateIncidentRequest,
    ) -> Result<RemoteIncident, StatuspageError> {
        let builder = self.request(Method::POST, "incidents").json(request);
        self.send(builder, "create_incident").await
    }

    async fn list_unresolved(&self) -> Result<Vec<RemoteIncident>, StatuspageError> {
        let builder = self.request(Method::GET, "incidents/unresolved");
        self.send(builder, "list_unresolved").await
    }

    async fn update_incident(
        &self,
        incident_id: &str,
        request: &UpdateIncidentRequest,
    ) -> Result<RemoteIncident, StatuspageError> {
        let builder = self
            .request(Method::PATCH, &format!("incidents/{incident_id}"))
            .json(request);
        self.send(builder, "update_incident").await
    }
}
