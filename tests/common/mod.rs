// SPDX-License-Identifier: MIT

//! Shared test doubles: in-memory user directory, recording notifier,
//! map-backed secret store, and app/service builders.

// Each integration binary uses a different subset of these helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use stride_goals::config::Config;
use stride_goals::db::UserDirectory;
use stride_goals::error::AppError;
use stride_goals::models::{TokenUpdate, UserRecord};
use stride_goals::secrets::SecretStore;
use stride_goals::services::{AggregationService, Notifier, StravaClient};
use stride_goals::AppState;

/// In-memory user directory with failure injection for token updates.
#[derive(Default)]
pub struct InMemoryDirectory {
    users: Mutex<Vec<UserRecord>>,
    pub fail_updates: AtomicBool,
    pub list_calls: AtomicU32,
    updates: Mutex<Vec<(u64, TokenUpdate)>>,
}

impl InMemoryDirectory {
    pub fn with_users(users: Vec<UserRecord>) -> Arc<Self> {
        Arc::new(Self {
            users: Mutex::new(users),
            ..Self::default()
        })
    }

    /// Token updates applied so far, in order.
    pub fn recorded_updates(&self) -> Vec<(u64, TokenUpdate)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn list_users(&self) -> Result<Vec<UserRecord>, AppError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.lock().unwrap().clone())
    }

    async fn update_tokens(
        &self,
        athlete_id: u64,
        update: &TokenUpdate,
    ) -> Result<(), AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Repository("injected write failure".to_string()));
        }

        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.athlete_id == athlete_id) {
            user.access_token = update.access_token.clone();
            user.refresh_token = update.refresh_token.clone();
            user.expires_at = update.expires_at;
        }

        self.updates
            .lock()
            .unwrap()
            .push((athlete_id, update.clone()));
        Ok(())
    }
}

/// Notifier that records sends instead of delivering them.
#[derive(Default)]
pub struct RecordingNotifier {
    pub fail_sends: AtomicBool,
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingNotifier {
    pub fn sent_messages(&self) -> Vec<(String, String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), AppError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(AppError::Notification("injected send failure".to_string()));
        }
        self.sent.lock().unwrap().push((
            recipient.to_string(),
            subject.to_string(),
            body.to_string(),
        ));
        Ok(())
    }
}

/// Secret store backed by a plain map.
#[derive(Default)]
pub struct MapSecretStore(pub HashMap<String, String>);

impl MapSecretStore {
    pub fn with_strava_credentials() -> Self {
        Self(HashMap::from([(
            "STRAVA_CREDENTIALS".to_string(),
            r#"{"client_id":"test-client","client_secret":"test-secret"}"#.to_string(),
        )]))
    }
}

#[async_trait]
impl SecretStore for MapSecretStore {
    async fn get(&self, name: &str) -> Result<Option<String>, AppError> {
        Ok(self.0.get(name).cloned())
    }
}

/// Build a user record whose token expires at the given epoch second.
pub fn make_user(athlete_id: u64, expires_at: i64, goal_miles: Option<f64>) -> UserRecord {
    UserRecord {
        athlete_id,
        email: format!("runner{}@example.com", athlete_id),
        access_token: format!("access-{}", athlete_id),
        refresh_token: format!("refresh-{}", athlete_id),
        expires_at,
        goal_miles,
    }
}

/// A token expiry comfortably in the future.
pub fn far_future() -> i64 {
    chrono::Utc::now().timestamp() + 3600
}

/// A token expiry in the past.
pub fn in_past() -> i64 {
    chrono::Utc::now().timestamp() - 3600
}

/// Strava client pointed at a mock server.
pub fn strava_client(base_uri: &str) -> StravaClient {
    StravaClient::new(
        base_uri.to_string(),
        format!("{}/oauth/token", base_uri),
        Duration::from_secs(5),
    )
    .expect("client should build")
}

/// Aggregation service wired to the given doubles and mock server.
pub fn aggregation_service(
    base_uri: &str,
    directory: Arc<InMemoryDirectory>,
    notifier: Arc<RecordingNotifier>,
) -> AggregationService {
    AggregationService::new(strava_client(base_uri), directory, notifier)
}

/// Full test app with in-memory doubles. Returns the router plus the
/// directory and notifier for assertions.
pub fn create_test_app(
    base_uri: &str,
    users: Vec<UserRecord>,
    secrets: MapSecretStore,
) -> (axum::Router, Arc<InMemoryDirectory>, Arc<RecordingNotifier>) {
    let directory = InMemoryDirectory::with_users(users);
    let notifier = Arc::new(RecordingNotifier::default());

    let mut config = Config::test_default();
    config.strava_api_base = base_uri.to_string();
    config.strava_token_url = format!("{}/oauth/token", base_uri);

    let aggregator = aggregation_service(base_uri, directory.clone(), notifier.clone());

    let state = Arc::new(AppState {
        config,
        secrets: Arc::new(secrets),
        aggregator,
    });

    (
        stride_goals::routes::create_router(state),
        directory,
        notifier,
    )
}
