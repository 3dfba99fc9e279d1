// SPDX-License-Identifier: MIT

//! Stride-Goals API Server
//!
//! Aggregates per-user running statistics from Strava, evaluates
//! year-to-date distance goals on a schedule, and serves aggregate
//! totals on demand.

use std::sync::Arc;
use stride_goals::{
    config::Config,
    db::FirestoreDirectory,
    secrets::EnvSecretStore,
    services::{AggregationService, HttpNotifier, StravaClient},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Stride-Goals API");

    // Initialize the user directory
    let directory = FirestoreDirectory::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Strava client with a bounded per-request timeout
    let strava = StravaClient::new(
        config.strava_api_base.clone(),
        config.strava_token_url.clone(),
        config.request_timeout(),
    )
    .expect("Failed to build Strava client");

    // Mail gateway for goal notifications
    let notifier = HttpNotifier::new(
        config.notify_url.clone(),
        config.notify_api_key.clone(),
        config.notify_from.clone(),
        config.request_timeout(),
    )
    .expect("Failed to build notifier");

    let aggregator =
        AggregationService::new(strava, Arc::new(directory), Arc::new(notifier));

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        secrets: Arc::new(EnvSecretStore),
        aggregator,
    });

    // Build router
    let app = stride_goals::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stride_goals=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
