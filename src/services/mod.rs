//! Business logic services.

pub mod aggregate;
pub mod notify;
pub mod strava;

pub use aggregate::AggregationService;
pub use notify::{HttpNotifier, Notifier};
pub use strava::StravaClient;
