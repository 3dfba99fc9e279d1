// SPDX-License-Identifier: MIT

//! Goal-evaluation and aggregation workflow.
//!
//! One per-user pipeline drives both entry points:
//! 1. Refresh the access token if missing or expired, persisting the
//!    rotated pair before further use
//! 2. Fetch the athlete's run totals
//! 3. Accumulate year-to-date miles and, in goal mode, dispatch a
//!    notification when the goal is met
//!
//! A failure in any per-user step downgrades to a failure record for
//! that user; the batch always continues. Only credential loading
//! (done by the callers) is fatal to a whole invocation.

use crate::db::UserDirectory;
use crate::error::AppError;
use crate::models::{AggregateReport, BatchSummary, TokenUpdate, UserRecord};
use crate::secrets::Credentials;
use crate::services::notify::{goal_message, Notifier};
use crate::services::strava::StravaClient;
use std::sync::Arc;
use std::time::Instant;

/// Orchestrates per-user token lifecycle, stats fetching, goal
/// evaluation, and aggregation.
#[derive(Clone)]
pub struct AggregationService {
    strava: StravaClient,
    directory: Arc<dyn UserDirectory>,
    notifier: Arc<dyn Notifier>,
}

/// Whether a batch run dispatches goal notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchMode {
    EvaluateGoals,
    AggregateOnly,
}

/// Combined output of one batch run.
struct BatchOutcome {
    report: AggregateReport,
    summary: BatchSummary,
}

impl AggregationService {
    pub fn new(
        strava: StravaClient,
        directory: Arc<dyn UserDirectory>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            strava,
            directory,
            notifier,
        }
    }

    /// Scheduled entry point: evaluate every user's goal and notify
    /// those who met it. Returns the operational tally.
    pub async fn evaluate_goals(
        &self,
        credentials: &Credentials,
        deadline: Option<Instant>,
    ) -> Result<BatchSummary, AppError> {
        let outcome = self
            .run_batch(credentials, deadline, BatchMode::EvaluateGoals)
            .await?;
        Ok(outcome.summary)
    }

    /// Query entry point: best-effort aggregate totals over all users,
    /// with no notifications.
    pub async fn aggregate_totals(
        &self,
        credentials: &Credentials,
        deadline: Option<Instant>,
    ) -> Result<AggregateReport, AppError> {
        let outcome = self
            .run_batch(credentials, deadline, BatchMode::AggregateOnly)
            .await?;
        Ok(outcome.report)
    }

    /// Shared batch loop. Users are independent; processing is
    /// sequential and suspend-only on network I/O, with the aggregate
    /// accumulated at this single point.
    async fn run_batch(
        &self,
        credentials: &Credentials,
        deadline: Option<Instant>,
        mode: BatchMode,
    ) -> Result<BatchOutcome, AppError> {
        let users = self.directory.list_users().await?;

        let mut report = AggregateReport::default();
        let mut summary = BatchSummary::default();

        for user in &users {
            // Stop admitting new per-user work once the invocation
            // deadline has elapsed; the remainder is skipped, not failed.
            if deadline.is_some_and(|d| Instant::now() >= d) {
                summary.skipped += 1;
                continue;
            }

            summary.processed += 1;

            let ytd_miles = match self.fetch_user_ytd(credentials, user).await {
                Ok(miles) => miles,
                Err(e) => {
                    tracing::warn!(
                        athlete_id = user.athlete_id,
                        error = %e,
                        "Skipping user after per-user failure"
                    );
                    summary.failed += 1;
                    report.failed_count += 1;
                    continue;
                }
            };

            summary.succeeded += 1;
            report.total_miles += ytd_miles;
            if let Some(goal) = user.goal_miles {
                report.total_goal += goal;
            }

            // Goal is met when ytd meets-or-exceeds it, not strictly exceeds.
            let goal_met = user.goal_miles.filter(|goal| ytd_miles >= *goal);

            if let (BatchMode::EvaluateGoals, Some(goal)) = (mode, goal_met) {
                let (subject, body) = goal_message(ytd_miles, goal);

                match self.notifier.send(&user.email, &subject, &body).await {
                    Ok(()) => {
                        tracing::info!(
                            athlete_id = user.athlete_id,
                            ytd_miles,
                            goal,
                            "Goal met, notification sent"
                        );
                        summary.notified += 1;
                    }
                    Err(e) => {
                        tracing::warn!(
                            athlete_id = user.athlete_id,
                            error = %e,
                            "Goal met but notification failed"
                        );
                    }
                }
            }
        }

        tracing::info!(
            total_users = users.len(),
            processed = summary.processed,
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            "Batch run complete"
        );

        Ok(BatchOutcome { report, summary })
    }

    /// Per-user pipeline: ensure a valid access token, then fetch the
    /// year-to-date run distance.
    async fn fetch_user_ytd(
        &self,
        credentials: &Credentials,
        user: &UserRecord,
    ) -> Result<f64, AppError> {
        let now = chrono::Utc::now().timestamp();

        let access_token = if user.token_valid_at(now) {
            user.access_token.clone()
        } else {
            tracing::info!(athlete_id = user.athlete_id, "Access token expired, refreshing");

            let refreshed = self
                .strava
                .refresh_token(credentials, &user.refresh_token)
                .await?;

            let update = TokenUpdate {
                access_token: refreshed.access_token.clone(),
                refresh_token: refreshed.refresh_token.clone(),
                expires_at: refreshed.expires_at,
            };

            // Persist-then-use: the exchange rotated the refresh token
            // upstream, so the new pair must land in the directory
            // before anything else happens for this user. If the write
            // fails the rotation has still happened, so the in-memory
            // token remains good for this invocation's stats call.
            if let Err(e) = self.directory.update_tokens(user.athlete_id, &update).await {
                tracing::error!(
                    athlete_id = user.athlete_id,
                    error = %e,
                    "Failed to persist refreshed tokens; continuing with in-memory token"
                );
            }

            refreshed.access_token
        };

        let stats = self
            .strava
            .get_athlete_stats(user.athlete_id, &access_token)
            .await?;

        Ok(stats.ytd_miles())
    }
}
