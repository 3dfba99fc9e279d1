// SPDX-License-Identifier: MIT

//! Goal notification delivery.
//!
//! Fire-and-forget: the workflow logs and counts a failed send but
//! never fails a batch because of one. Delivery goes through a
//! Mailgun-style HTTP mail gateway.

use crate::error::AppError;
use async_trait::async_trait;
use std::time::Duration;

/// Outbound notification seam.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), AppError>;
}

/// Notifier that posts messages to an HTTP mail gateway.
#[derive(Clone)]
pub struct HttpNotifier {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl HttpNotifier {
    pub fn new(
        endpoint: String,
        api_key: String,
        from: String,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::RequestSetup(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            api_key,
            from,
        })
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), AppError> {
        let response = self
            .http
            .post(&self.endpoint)
            .basic_auth("api", Some(self.api_key.as_str()))
            .form(&[
                ("from", self.from.as_str()),
                ("to", recipient),
                ("subject", subject),
                ("text", body),
            ])
            .send()
            .await
            .map_err(|e| AppError::Notification(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Notification(format!("HTTP {}: {}", status, body)));
        }

        Ok(())
    }
}

/// Build the subject and body for a goal-met notification.
pub fn goal_message(ytd_miles: f64, goal_miles: f64) -> (String, String) {
    let subject = "You hit your running goal! 🏃".to_string();
    let body = format!(
        "Congratulations! You've run {:.1} miles this year, meeting your goal of {:.1} miles.",
        ytd_miles, goal_miles
    );
    (subject, body)
}
