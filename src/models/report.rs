//! Result shapes returned by the two batch entry points.

use serde::Serialize;

/// Aggregate totals over all successfully fetched users.
///
/// Built fresh per query invocation; distances are miles as returned
/// by Strava's run totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AggregateReport {
    /// Sum of year-to-date run distance across fetched users
    pub total_miles: f64,
    /// Sum of all defined goals (users without a goal excluded)
    pub total_goal: f64,
    /// Users whose refresh or stats fetch failed
    pub failed_count: u32,
}

/// Operational summary of one scheduled goal-evaluation run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BatchSummary {
    /// Users admitted to the per-user pipeline
    pub processed: u32,
    /// Users whose stats were fetched
    pub succeeded: u32,
    /// Users whose refresh or stats fetch failed
    pub failed: u32,
    /// Goal notifications dispatched
    pub notified: u32,
    /// Users not attempted because the invocation deadline elapsed
    pub skipped: u32,
}
