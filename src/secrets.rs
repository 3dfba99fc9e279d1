// SPDX-License-Identifier: MIT

//! Strava client credential loading through the secret store seam.
//!
//! Credentials are loaded fresh per invocation and never cached
//! process-wide, so a rotated secret takes effect on the next run
//! without a restart.

use crate::error::AppError;
use async_trait::async_trait;
use serde::Deserialize;

/// Opaque secret payload access. The backing store only knows names
/// and blobs; parsing happens in `load_credentials`.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch a secret payload by name. `Ok(None)` means the store
    /// answered but holds no payload under that name.
    async fn get(&self, name: &str) -> Result<Option<String>, AppError>;
}

/// Secret store backed by environment variables.
///
/// The deployment platform injects secret bindings as env vars, so a
/// plain env read is the production path (as with Cloud Run secret
/// bindings).
#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore;

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get(&self, name: &str) -> Result<Option<String>, AppError> {
        match std::env::var(name) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(AppError::SecretStore(format!("{}: {}", name, e))),
        }
    }
}

/// Strava OAuth client credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Load and parse the client credentials blob.
///
/// No retry here; the entry points treat any failure as fatal for the
/// whole invocation since no user can be processed without it.
pub async fn load_credentials(
    store: &dyn SecretStore,
    secret_name: &str,
) -> Result<Credentials, AppError> {
    let payload = store
        .get(secret_name)
        .await?
        .ok_or_else(|| AppError::SecretUnavailable(secret_name.to_string()))?;

    serde_json::from_str(&payload)
        .map_err(|e| AppError::SecretMalformed(format!("{}: {}", secret_name, e)))
}
