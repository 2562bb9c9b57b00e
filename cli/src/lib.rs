//! Fitlog CLI
//!
//! Reads an activity log exported as JSON and prints calorie, strength,
//! streak, dashboard and body-metric reports computed by `fitlog-shared`.

pub mod config;
pub mod input;
pub mod logging;
pub mod report;
