// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.
//!
//! Every fallible operation in the crate returns `Result<T, AppError>`,
//! so each call site decides locally whether to propagate, downgrade to
//! a per-user failure, or retry.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ─── Secret provider ─────────────────────────────────────────
    #[error("Secret has no payload: {0}")]
    SecretUnavailable(String),

    #[error("Secret payload malformed: {0}")]
    SecretMalformed(String),

    #[error("Secret store error: {0}")]
    SecretStore(String),

    // ─── OAuth token endpoint ────────────────────────────────────
    #[error("Token endpoint rejected refresh (HTTP {status}): {body}")]
    OAuthRejected { status: u16, body: String },

    #[error("Token endpoint unreachable: {0}")]
    OAuthUnreachable(String),

    #[error("Token request could not be built: {0}")]
    OAuthClient(String),

    // ─── Strava stats API ────────────────────────────────────────
    #[error("Strava API rejected request (HTTP {status}): {body}")]
    UpstreamRejected { status: u16, body: String },

    #[error("Strava API unreachable: {0}")]
    UpstreamUnreachable(String),

    #[error("Request setup failed: {0}")]
    RequestSetup(String),

    // ─── Collaborators ───────────────────────────────────────────
    #[error("User directory error: {0}")]
    Repository(String),

    #[error("Notification send failed: {0}")]
    Notification(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True for failures of the secret provider, which abort an entire
    /// invocation (no user can be processed without client credentials).
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            AppError::SecretUnavailable(_) | AppError::SecretMalformed(_) | AppError::SecretStore(_)
        )
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::SecretUnavailable(msg) | AppError::SecretMalformed(msg) => {
                tracing::error!(error = %msg, "Credential loading failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "credentials_error", None)
            }
            AppError::SecretStore(msg) => {
                tracing::error!(error = %msg, "Secret store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "secret_store_error", None)
            }
            AppError::OAuthRejected { status, body } => {
                tracing::warn!(status, body = %body, "OAuth refresh rejected");
                (StatusCode::BAD_GATEWAY, "oauth_rejected", None)
            }
            AppError::OAuthUnreachable(msg) | AppError::UpstreamUnreachable(msg) => {
                (StatusCode::BAD_GATEWAY, "upstream_unreachable", Some(msg.clone()))
            }
            AppError::UpstreamRejected { .. } => {
                (StatusCode::BAD_GATEWAY, "upstream_rejected", Some(self.to_string()))
            }
            AppError::OAuthClient(msg) | AppError::RequestSetup(msg) => {
                tracing::error!(error = %msg, "Request construction failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "request_setup_error", None)
            }
            AppError::Repository(msg) => {
                tracing::error!(error = %msg, "User directory error");
                (StatusCode::INTERNAL_SERVER_ERROR, "repository_error", None)
            }
            AppError::Notification(msg) => {
                (StatusCode::BAD_GATEWAY, "notification_error", Some(msg.clone()))
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
