// SPDX-License-Identifier: MIT

//! Stride-Goals: aggregate running stats and evaluate distance goals
//!
//! This crate provides the backend that pulls per-user run totals from
//! Strava, keeps OAuth tokens fresh, and notifies users who reach
//! their year-to-date distance goal.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod secrets;
pub mod services;

use config::Config;
use secrets::SecretStore;
use services::AggregationService;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub secrets: Arc<dyn SecretStore>,
    pub aggregator: AggregationService,
}
