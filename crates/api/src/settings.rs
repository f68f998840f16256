//! Service Settings
//!
//! Settings are layered: built-in defaults, then an optional
//! `statuspage-manager.toml`, then `STATUSPAGE_*` environment variables.
//! The bare `PAGE_ID`, `AUTH_TOKEN` and `PORT` variables are honoured as
//! defaults so existing deployments keep working.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use incident_translator::TranslatorConfig;
use serde::Deserialize;
use statuspage_client::{ClientConfig, DEFAULT_API_BASE_URL};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Optional configuration file, looked up in the working directory
const CONFIG_FILE: &str = "statuspage-manager";

/// Environment variable prefix
const ENV_PREFIX: &str = "STATUSPAGE";

/// Configuration errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Service settings
#[derive(Clone, Deserialize)]
pub struct Settings {
    /// Socket address the HTTP server binds to
    pub listen_addr: String,
    /// Statuspage page id
    pub page_id: String,
    /// Statuspage API key
    pub auth_token: String,
    /// Statuspage API root
    pub api_base_url: String,
    /// Per-request timeout for Statuspage calls
    pub request_timeout_secs: u64,
    /// Fallback incident title
    pub default_name: String,
    /// Fallback opening message
    pub default_start_info: String,
    /// Fallback closing message
    pub default_end_info: String,
}

impl Settings {
    /// Load settings from file and environment
    pub fn load() -> Result<Self, SettingsError> {
        let config = Self::defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        Self::from_config(config)
    }

    /// Builder pre-populated with defaults
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, SettingsError> {
        let translator = TranslatorConfig::default();
        let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());

        Ok(Config::builder()
            .set_default("listen_addr", format!("0.0.0.0:{port}"))?
            .set_default("page_id", std::env::var("PAGE_ID").unwrap_or_default())?
            .set_default("auth_token", std::env::var("AUTH_TOKEN").unwrap_or_default())?
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("request_timeout_secs", 10)?
            .set_default("default_name", translator.default_name)?
            .set_default("default_start_info", translator.default_start_info)?
            .set_default("default_end_info", translator.default_end_info)?)
    }

    /// Deserialize and validate a built configuration
    pub fn from_config(config: Config) -> Result<Self, SettingsError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.page_id.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "page_id must be set (STATUSPAGE_PAGE_ID or PAGE_ID)".into(),
            ));
        }
        if self.auth_token.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "auth_token must be set (STATUSPAGE_AUTH_TOKEN or AUTH_TOKEN)".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(SettingsError::Invalid(
                "request_timeout_secs must be > 0".into(),
            ));
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_base_url: self.api_base_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
            ..ClientConfig::new(self.page_id.clone(), self.auth_token.clone())
        }
    }

    pub fn translator_config(&self) -> TranslatorConfig {
        TranslatorConfig {
            default_name: self.default_name.clone(),
            default_start_info: self.default_start_info.clone(),
            default_end_info: self.default_end_info.clone(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("listen_addr", &self.listen_addr)
            .field("page_id", &self.page_id)
            .field("auth_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("default_name", &self.default_name)
            .field("default_start_info", &self.default_start_info)
            .field("default_end_info", &self.default_end_info)
            .finish()
    }
}
