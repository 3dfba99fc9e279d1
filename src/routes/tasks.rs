// SPDX-License-Identifier: MIT

//! Scheduled task routes.
//!
//! These endpoints are called by Cloud Scheduler, not directly by
//! users. Per-user failures never surface to the trigger platform;
//! only a credential-loading failure returns an error status.

use crate::secrets;
use crate::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::sync::Arc;

/// Header the platform attaches to scheduler-originated requests and
/// strips from external traffic.
const SCHEDULER_HEADER: &str = "x-cloudscheduler";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/tasks/evaluate-goals", post(evaluate_goals))
}

/// Run the daily goal-evaluation batch (called by the scheduler).
async fn evaluate_goals(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    // Security check: the platform strips this header from external
    // requests, so its presence guarantees scheduler origin.
    if headers.get(SCHEDULER_HEADER).is_none() {
        tracing::warn!("Blocked unauthorized access to evaluate_goals");
        return StatusCode::FORBIDDEN.into_response();
    }

    tracing::info!("Starting goal evaluation run");

    let credentials = match secrets::load_credentials(
        state.secrets.as_ref(),
        &state.config.strava_secret_name,
    )
    .await
    {
        Ok(c) => c,
        Err(e) => {
            // Fatal: no user can be processed without client credentials.
            tracing::error!(error = %e, "Aborting goal run, credentials unavailable");
            return e.into_response();
        }
    };

    match state
        .aggregator
        .evaluate_goals(&credentials, state.config.invocation_deadline())
        .await
    {
        Ok(summary) => {
            tracing::info!(
                processed = summary.processed,
                succeeded = summary.succeeded,
                failed = summary.failed,
                notified = summary.notified,
                skipped = summary.skipped,
                "Goal evaluation complete"
            );
            (StatusCode::OK, Json(summary)).into_response()
        }
        Err(e) => e.into_response(),
    }
}
