//! Data models shared across the crate.

pub mod report;
pub mod user;

pub use report::{AggregateReport, BatchSummary};
pub use user::{TokenUpdate, UserRecord};
