//! User model for the directory store.

use serde::{Deserialize, Serialize};

/// A registered user as stored in the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Strava athlete ID (also used as document ID)
    pub athlete_id: u64,
    /// Notification recipient address
    pub email: String,
    /// OAuth access token (short-lived)
    pub access_token: String,
    /// OAuth refresh token (long-lived, rotates on refresh)
    pub refresh_token: String,
    /// Access token expiry (epoch seconds)
    pub expires_at: i64,
    /// User-set year-to-date distance goal in miles, if any
    pub goal_miles: Option<f64>,
}

impl UserRecord {
    /// Whether the stored access token can be used at `now` (epoch
    /// seconds) without a refresh. A token expiring exactly now is
    /// treated as expired.
    pub fn token_valid_at(&self, now: i64) -> bool {
        !self.access_token.is_empty() && now < self.expires_at
    }
}

/// Partial write applied to a user record after a token refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUpdate {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}
