//! Fitlog Shared Library
//!
//! Pure calculation core for the fitness log: MET lookup, calorie
//! estimation, one-rep maxes, workout aggregation, calendar streaks,
//! dashboard statistics and body metrics. Used by the CLI and the WASM
//! bindings; performs no I/O.

pub mod aggregation;
pub mod body_metrics;
pub mod calendar;
pub mod calories;
pub mod dashboard;
pub mod errors;
pub mod mets;
pub mod models;
pub mod one_rep_max;

// Re-export commonly used items
pub use aggregation::{aggregate_workout_calories, analyze_volume, user_summary, WorkoutCalorieAggregator};
pub use body_metrics::{bmi_history, summarize_body_metrics, Gender, UserProfile};
pub use calendar::{consecutive_days_ending_at, month_grid, CalendarSettings, STREAK_CAP};
pub use calories::*;
pub use dashboard::{compute_dashboard_stats, format_value, DashboardConfig, DashboardStats, WidgetId};
pub use errors::*;
pub use mets::lookup_mets;
pub use models::*;
pub use one_rep_max::{estimate_one_rep_max, one_rep_max_history, OneRepMaxResult};

/// Round to one decimal place, half away from zero
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
