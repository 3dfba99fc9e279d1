//! Application configuration loaded from environment variables.
//!
//! The deployment platform injects secret bindings as environment
//! variables, so the Strava client credentials are read through the
//! secret store seam (`secrets::EnvSecretStore`) rather than here.

use std::env;
use std::time::{Duration, Instant};

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// GCP project ID (user directory)
    pub gcp_project_id: String,

    /// Name of the secret holding the Strava client id/secret JSON blob
    pub strava_secret_name: String,
    /// Base URL of the Strava REST API
    pub strava_api_base: String,
    /// Strava OAuth token endpoint
    pub strava_token_url: String,

    /// Mail gateway messages endpoint (Mailgun-style)
    pub notify_url: String,
    /// Mail gateway API key
    pub notify_api_key: String,
    /// Sender address for goal notifications
    pub notify_from: String,

    /// Per-request timeout for upstream calls (seconds)
    pub request_timeout_secs: u64,
    /// Optional soft deadline for a whole batch invocation (seconds).
    /// Users not yet admitted when it elapses are reported as skipped.
    pub batch_deadline_secs: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),

            strava_secret_name: env::var("STRAVA_SECRET_NAME")
                .unwrap_or_else(|_| "STRAVA_CREDENTIALS".to_string()),
            strava_api_base: env::var("STRAVA_API_BASE")
                .unwrap_or_else(|_| "https://www.strava.com/api/v3".to_string()),
            strava_token_url: env::var("STRAVA_TOKEN_URL")
                .unwrap_or_else(|_| "https://www.strava.com/oauth/token".to_string()),

            notify_url: env::var("NOTIFY_URL").map_err(|_| ConfigError::Missing("NOTIFY_URL"))?,
            notify_api_key: env::var("NOTIFY_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("NOTIFY_API_KEY"))?,
            notify_from: env::var("NOTIFY_FROM")
                .unwrap_or_else(|_| "goals@stride.example".to_string()),

            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            batch_deadline_secs: env::var("BATCH_DEADLINE_SECS")
                .ok()
                .and_then(|v| v.parse().ok()),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            gcp_project_id: "test-project".to_string(),
            strava_secret_name: "STRAVA_CREDENTIALS".to_string(),
            strava_api_base: "https://www.strava.com/api/v3".to_string(),
            strava_token_url: "https://www.strava.com/oauth/token".to_string(),
            notify_url: "http://localhost:9/messages".to_string(),
            notify_api_key: "test_api_key".to_string(),
            notify_from: "goals@test.example".to_string(),
            request_timeout_secs: 5,
            batch_deadline_secs: None,
        }
    }

    /// Compute the soft deadline for one batch invocation, if configured.
    pub fn invocation_deadline(&self) -> Option<Instant> {
        self.batch_deadline_secs
            .map(|secs| Instant::now() + Duration::from_secs(secs))
    }

    /// Per-request timeout for upstream HTTP calls.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
