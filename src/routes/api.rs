// SPDX-License-Identifier: MIT

//! On-demand aggregate query.

use crate::error::AppError;
use crate::models::AggregateReport;
use crate::secrets;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/stats/aggregate", get(aggregate_stats))
}

/// Return summed year-to-date miles and goals across all users.
///
/// Best-effort: one user's bad token never fails the request; their
/// absence shows up in `failed_count`. Only a credential-loading
/// failure produces a 5xx.
async fn aggregate_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AggregateReport>, AppError> {
    // Credentials are loaded per invocation, never cached process-wide.
    let credentials =
        secrets::load_credentials(state.secrets.as_ref(), &state.config.strava_secret_name)
            .await?;

    let report = state
        .aggregator
        .aggregate_totals(&credentials, state.config.invocation_deadline())
        .await?;

    Ok(Json(report))
}
