//! Dashboard statistics and widget configuration

use crate::aggregation::{saturating_sum, training_volume, WorkoutCalorieAggregator};
use crate::body_metrics::{profile_bmr, DailyCalorieNeeds, Gender, UserProfile};
use crate::calories::CalorieEstimator;
use crate::errors::CalcError;
use crate::models::{ActivityLog, BodyMetricRecord, Workout};
use crate::round1;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Widgets shown when nothing has been configured
pub const DEFAULT_MAX_WIDGETS: usize = 4;

// ============================================================================
// Statistics
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_workouts: u32,
    pub this_week_workouts: u32,
    pub total_volume: f64,
    pub this_week_volume: f64,
    pub this_week_calories_burned: u32,
    pub today_calories_burned: u32,
    /// Sedentary daily needs plus today's workouts, when BMR is known
    pub today_total_estimated_calories: Option<u32>,
    pub weight_change_since_last: Option<f64>,
    pub latest_weight: Option<f64>,
    pub user_age: Option<u32>,
    pub user_gender: Option<Gender>,
}

/// Monday of the week containing `date`, or the earliest representable day
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_signed(Duration::days(date.weekday().num_days_from_monday() as i64))
        .unwrap_or(NaiveDate::MIN)
}

fn weigh_ins_newest_first(records: &[BodyMetricRecord]) -> Vec<(NaiveDate, f64)> {
    let mut weigh_ins: Vec<(NaiveDate, f64)> = records
        .iter()
        .filter_map(|r| r.body_weight_kg.map(|w| (r.date, w)))
        .collect();
    weigh_ins.sort_by(|a, b| b.0.cmp(&a.0));
    weigh_ins
}

/// Headline numbers for the dashboard as of `today`
///
/// Workout counts only include completed workouts. Volume and calories cover
/// every logged workout, so an in-progress session already shows up.
pub fn compute_dashboard_stats(
    log: &ActivityLog,
    profile: &UserProfile,
    today: NaiveDate,
    estimator: &CalorieEstimator,
) -> DashboardStats {
    let monday = week_start(today);
    let sunday = monday
        .checked_add_signed(Duration::days(6))
        .unwrap_or(NaiveDate::MAX);
    let in_week = |w: &&Workout| w.date >= monday && w.date <= sunday;

    let weigh_ins = weigh_ins_newest_first(&log.body_metrics);
    let latest_weight = weigh_ins.first().map(|(_, w)| *w);
    let weight_change_since_last = match weigh_ins.as_slice() {
        [(_, latest), (_, previous), ..] => Some(round1(latest - previous)),
        _ => None,
    };

    let aggregator = WorkoutCalorieAggregator::new(estimator.clone()).with_body_weight(latest_weight);
    let today_calories_burned = aggregator.day(&log.workouts, today);
    let this_week_calories_burned =
        saturating_sum(log.workouts.iter().filter(in_week).map(|w| aggregator.workout(w)));

    let today_total_estimated_calories = latest_weight
        .and_then(|w| profile_bmr(profile, w, today))
        .map(|bmr| (DailyCalorieNeeds::from_bmr(bmr).sedentary as u32).saturating_add(today_calories_burned));

    DashboardStats {
        total_workouts: log.workouts.iter().filter(|w| w.is_completed).count() as u32,
        this_week_workouts: log
            .workouts
            .iter()
            .filter(in_week)
            .filter(|w| w.is_completed)
            .count() as u32,
        total_volume: round1(training_volume(&log.workouts)),
        this_week_volume: round1(training_volume(log.workouts.iter().filter(in_week))),
        this_week_calories_burned,
        today_calories_burned,
        today_total_estimated_calories,
        weight_change_since_last,
        latest_weight,
        user_age: profile.age_on(today),
        user_gender: profile.gender,
    }
}

// ============================================================================
// Widget catalog
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetId {
    TotalWorkouts,
    ThisWeekWorkouts,
    TotalVolume,
    ThisWeekVolume,
    TodayTotalEstimatedCalories,
    TodayCaloriesBurned,
    ThisWeekCaloriesBurned,
    WeightChangeSinceLast,
    LatestWeight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetCategory {
    Fitness,
    Health,
    Progress,
}

/// How a widget value is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetFormat {
    Number,
    Decimal,
    /// Signed, in kilograms
    Weight,
    Calories,
    Percentage,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WidgetDefinition {
    pub id: WidgetId,
    pub title: &'static str,
    pub description: &'static str,
    pub category: WidgetCategory,
    pub format: WidgetFormat,
    pub enabled_by_default: bool,
}

impl WidgetId {
    /// Catalog order
    pub const ALL: [WidgetId; 9] = [
        WidgetId::TotalWorkouts,
        WidgetId::ThisWeekWorkouts,
        WidgetId::TotalVolume,
        WidgetId::ThisWeekVolume,
        WidgetId::TodayTotalEstimatedCalories,
        WidgetId::TodayCaloriesBurned,
        WidgetId::ThisWeekCaloriesBurned,
        WidgetId::WeightChangeSinceLast,
        WidgetId::LatestWeight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetId::TotalWorkouts => "total_workouts",
            WidgetId::ThisWeekWorkouts => "this_week_workouts",
            WidgetId::TotalVolume => "total_volume",
            WidgetId::ThisWeekVolume => "this_week_volume",
            WidgetId::TodayTotalEstimatedCalories => "today_total_estimated_calories",
            WidgetId::TodayCaloriesBurned => "today_calories_burned",
            WidgetId::ThisWeekCaloriesBurned => "this_week_calories_burned",
            WidgetId::WeightChangeSinceLast => "weight_change_since_last",
            WidgetId::LatestWeight => "latest_weight",
        }
    }

    pub fn definition(&self) -> WidgetDefinition {
        use WidgetCategory::*;
        use WidgetFormat::*;

        let (title, description, category, format, enabled_by_default) = match self {
            WidgetId::TotalWorkouts => (
                "Total workouts",
                "Workouts completed so far",
                Fitness,
                Number,
                true,
            ),
            WidgetId::ThisWeekWorkouts => (
                "Workouts this week",
                "Workouts completed since Monday",
                Fitness,
                Number,
                true,
            ),
            WidgetId::TotalVolume => (
                "Total volume",
                "Cumulative training volume (kg)",
                Fitness,
                Decimal,
                true,
            ),
            WidgetId::ThisWeekVolume => (
                "Volume this week",
                "Training volume since Monday (kg)",
                Fitness,
                Decimal,
                true,
            ),
            WidgetId::TodayTotalEstimatedCalories => (
                "Estimated burn today",
                "BMR, daily activity and today's workouts combined",
                Health,
                Calories,
                false,
            ),
            WidgetId::TodayCaloriesBurned => (
                "Workout calories today",
                "Calories burned in today's workouts",
                Health,
                Calories,
                false,
            ),
            WidgetId::ThisWeekCaloriesBurned => (
                "Workout calories this week",
                "Calories burned in this week's workouts",
                Health,
                Calories,
                false,
            ),
            WidgetId::WeightChangeSinceLast => (
                "Weight change",
                "Change since the previous weigh-in",
                Progress,
                Weight,
                false,
            ),
            WidgetId::LatestWeight => (
                "Current weight",
                "Most recent weigh-in",
                Health,
                Weight,
                false,
            ),
        };

        WidgetDefinition {
            id: *self,
            title,
            description,
            category,
            format,
            enabled_by_default,
        }
    }

    /// The statistic this widget displays
    pub fn value(&self, stats: &DashboardStats) -> Option<f64> {
        match self {
            WidgetId::TotalWorkouts => Some(stats.total_workouts as f64),
            WidgetId::ThisWeekWorkouts => Some(stats.this_week_workouts as f64),
            WidgetId::TotalVolume => Some(stats.total_volume),
            WidgetId::ThisWeekVolume => Some(stats.this_week_volume),
            WidgetId::TodayTotalEstimatedCalories => {
                stats.today_total_estimated_calories.map(f64::from)
            }
            WidgetId::TodayCaloriesBurned => Some(stats.today_calories_burned as f64),
            WidgetId::ThisWeekCaloriesBurned => Some(stats.this_week_calories_burned as f64),
            WidgetId::WeightChangeSinceLast => stats.weight_change_since_last,
            WidgetId::LatestWeight => stats.latest_weight,
        }
    }

    /// Value rendered with the widget's format
    pub fn display(&self, stats: &DashboardStats) -> String {
        format_value(self.value(stats), self.definition().format)
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetId {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WidgetId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| CalcError::UnknownWidget(s.to_string()))
    }
}

pub fn available_widgets() -> Vec<WidgetDefinition> {
    WidgetId::ALL.iter().map(WidgetId::definition).collect()
}

// ============================================================================
// Configuration
// ============================================================================

/// Which widgets are shown, in display order
///
/// Ids are kept as strings so a stored configuration naming a widget this
/// build does not know still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    pub selected_widgets: Vec<String>,
    pub max_widgets: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            selected_widgets: WidgetId::ALL
                .iter()
                .filter(|id| id.definition().enabled_by_default)
                .map(|id| id.as_str().to_string())
                .collect(),
            max_widgets: DEFAULT_MAX_WIDGETS,
        }
    }
}

impl DashboardConfig {
    pub fn is_selected(&self, id: WidgetId) -> bool {
        self.selected_widgets.iter().any(|s| s == id.as_str())
    }

    /// Remove the widget if shown, otherwise add it at the end
    ///
    /// Adding to a full dashboard drops the first widget. Returns whether
    /// the widget is selected afterwards.
    pub fn toggle_widget(&mut self, id: WidgetId) -> bool {
        if self.is_selected(id) {
            self.selected_widgets.retain(|s| s != id.as_str());
            return false;
        }

        if self.selected_widgets.len() >= self.max_widgets && !self.selected_widgets.is_empty() {
            self.selected_widgets.remove(0);
        }
        self.selected_widgets.push(id.as_str().to_string());
        true
    }

    pub fn reorder_widgets(&mut self, new_order: Vec<String>) {
        self.selected_widgets = new_order;
    }

    /// Selected widgets that exist in the catalog, in display order
    pub fn selected_widgets(&self) -> Vec<WidgetDefinition> {
        self.selected_widgets
            .iter()
            .filter_map(|s| s.parse::<WidgetId>().ok())
            .map(|id| id.definition())
            .collect()
    }
}

/// Render a widget value; missing values show as `-`
pub fn format_value(value: Option<f64>, format: WidgetFormat) -> String {
    let Some(v) = value else {
        return "-".to_string();
    };

    match format {
        WidgetFormat::Number => v.to_string(),
        WidgetFormat::Decimal => format!("{:.1}", v),
        WidgetFormat::Weight => {
            let sign = if v >= 0.0 { "+" } else { "" };
            format!("{}{:.1}kg", sign, v)
        }
        WidgetFormat::Calories => format!("{}kcal", v.round()),
        WidgetFormat::Percentage => format!("{}%", v.round()),
    }
}
