// SPDX-License-Identifier: MIT

//! Firestore-backed user directory.
//!
//! Thin pass-through adapter: read all user records, update the token
//! fields of one record. Everything else about the directory (record
//! creation, goal setting) happens in the onboarding frontend and is
//! not this service's concern.

use crate::db::{collections, UserDirectory};
use crate::error::AppError;
use crate::models::{TokenUpdate, UserRecord};
use async_trait::async_trait;
use futures_util::TryStreamExt;

/// Firestore user directory client.
#[derive(Clone)]
pub struct FirestoreDirectory {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDirectory {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Repository(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Repository(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All directory operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client.as_ref().ok_or_else(|| {
            AppError::Repository("Directory not connected (offline mode)".to_string())
        })
    }
}

#[async_trait]
impl UserDirectory for FirestoreDirectory {
    async fn list_users(&self) -> Result<Vec<UserRecord>, AppError> {
        // Streamed scan: the user collection has no natural upper bound.
        let stream = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj::<UserRecord>()
            .stream_query_with_errors()
            .await
            .map_err(|e| AppError::Repository(e.to_string()))?;

        stream
            .try_collect()
            .await
            .map_err(|e| AppError::Repository(e.to_string()))
    }

    async fn update_tokens(
        &self,
        athlete_id: u64,
        update: &TokenUpdate,
    ) -> Result<(), AppError> {
        let _: TokenUpdate = self
            .get_client()?
            .fluent()
            .update()
            .fields(firestore::paths!(TokenUpdate::{
                access_token,
                refresh_token,
                expires_at
            }))
            .in_col(collections::USERS)
            .document_id(athlete_id.to_string())
            .object(update)
            .execute()
            .await
            .map_err(|e| AppError::Repository(e.to_string()))?;
        Ok(())
    }
}
