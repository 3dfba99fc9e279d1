// SPDX-License-Identifier: MIT

//! Strava API client for token refresh and athlete statistics.
//!
//! Handles:
//! - Refreshing expired access tokens via the OAuth token endpoint
//! - Fetching per-athlete run totals
//! - Uniform three-way failure classification for every authenticated
//!   call (rejected by upstream / unreachable / request setup)

use crate::error::AppError;
use crate::secrets::Credentials;
use serde::Deserialize;
use std::time::Duration;

/// Strava API client.
///
/// Holds no credentials and no per-user state: the client id/secret
/// are passed into `refresh_token` and the athlete id/token into
/// `get_athlete_stats`, so one client instance serves every user.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    token_url: String,
}

impl StravaClient {
    /// Create a new Strava client with a bounded per-request timeout.
    ///
    /// The timeout keeps one slow user from starving a whole batch.
    pub fn new(base_url: String, token_url: String, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::RequestSetup(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            token_url,
        })
    }

    /// Exchange a refresh token for a fresh access token.
    ///
    /// Strava rotates refresh tokens: a successful exchange invalidates
    /// the token that was sent, so the caller must persist the returned
    /// pair before relying on the old one again. A failed exchange is
    /// never retried here.
    pub async fn refresh_token(
        &self,
        credentials: &Credentials,
        refresh_token: &str,
    ) -> Result<TokenRefreshResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(classify_oauth_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::OAuthRejected { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::OAuthClient(format!("Token response parse error: {}", e)))
    }

    /// Get year-to-date, recent, and all-time run totals for an athlete.
    pub async fn get_athlete_stats(
        &self,
        athlete_id: u64,
        access_token: &str,
    ) -> Result<StravaStats, AppError> {
        let url = format!("{}/athletes/{}/stats", self.base_url, athlete_id);
        self.get_json(&url, access_token).await
    }

    /// Generic authenticated GET with JSON response.
    ///
    /// Every authenticated call funnels through here so the failure
    /// classification stays uniform across endpoints.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(classify_upstream_error)?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();

            if status == 429 {
                tracing::warn!("Strava rate limit hit (429)");
            }

            return Err(AppError::UpstreamRejected { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JSON parse error: {}", e)))
    }
}

/// Classify a transport-level failure of the token exchange.
fn classify_oauth_error(e: reqwest::Error) -> AppError {
    if e.is_builder() {
        AppError::OAuthClient(e.to_string())
    } else {
        // Request was dispatched but no response came back
        // (timeout, connection refused/reset, DNS).
        AppError::OAuthUnreachable(e.to_string())
    }
}

/// Classify a transport-level failure of an authenticated API call.
fn classify_upstream_error(e: reqwest::Error) -> AppError {
    if e.is_builder() {
        AppError::RequestSetup(e.to_string())
    } else {
        AppError::UpstreamUnreachable(e.to_string())
    }
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

/// Athlete statistics response.
///
/// Distances are miles as returned by upstream; no conversion is
/// applied anywhere in this crate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StravaStats {
    #[serde(default)]
    pub recent_run_totals: RunTotals,
    #[serde(default)]
    pub all_run_totals: RunTotals,
    #[serde(default)]
    pub ytd_run_totals: RunTotals,
}

impl StravaStats {
    /// Year-to-date run distance; a missing total counts as zero.
    pub fn ytd_miles(&self) -> f64 {
        self.ytd_run_totals.distance.unwrap_or(0.0)
    }
}

/// One run-totals bucket from the stats endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunTotals {
    pub distance: Option<f64>,
    #[serde(default)]
    pub count: Option<u32>,
}
