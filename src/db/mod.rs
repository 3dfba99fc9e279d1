//! User directory access.

pub mod firestore;

pub use firestore::FirestoreDirectory;

use crate::error::AppError;
use crate::models::{TokenUpdate, UserRecord};
use async_trait::async_trait;

/// Firestore collection names
pub mod collections {
    pub const USERS: &str = "users";
}

/// Read/write façade over the external user directory store.
///
/// Failures surface as `AppError::Repository` with the store's message
/// attached; no semantic translation happens at this seam.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Read every registered user.
    async fn list_users(&self) -> Result<Vec<UserRecord>, AppError>;

    /// Persist a refreshed token triple on one user record. Only the
    /// token fields are touched.
    async fn update_tokens(&self, athlete_id: u64, update: &TokenUpdate)
        -> Result<(), AppError>;
}
