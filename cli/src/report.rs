//! Report building and text rendering
//!
//! Each subcommand builds one report struct. Reports serialize to JSON for
//! `--json` and implement `Display` for the terminal.

use anyhow::Result;
use chrono::NaiveDate;
use fitlog_shared::aggregation::{
    analyze_volume, saturating_sum, user_summary, UserSummary, VolumeAnalysis, WorkoutCalorieAggregator,
};
use fitlog_shared::body_metrics::{
    bmi_history, summarize_body_metrics, BmiHistory, BodyAnalyticsSummary, UserProfile,
};
use fitlog_shared::calendar::{
    consecutive_days_ending_at_capped, month_grid, CalendarDay, CalendarSettings, StreakTier,
};
use fitlog_shared::dashboard::{compute_dashboard_stats, DashboardConfig, DashboardStats, WidgetId};
use fitlog_shared::mets::{is_known_exercise, lookup_mets};
use fitlog_shared::one_rep_max::{
    best_set_one_rep_max, estimate_one_rep_max, one_rep_max_history, try_estimate_one_rep_max,
    OneRepMaxHistory, OneRepMaxResult,
};
use fitlog_shared::{ActivityLog, CalorieCalculationParams, CalorieEstimator, CalorieMethod};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

fn or_dash<T: fmt::Display>(value: Option<T>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{}", v, unit),
        None => "-".to_string(),
    }
}

// ============================================================================
// calories / one-rep-max
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaloriesReport {
    pub kcal: u32,
    pub method: CalorieMethod,
    pub mets: f64,
    /// Whether `mets` came from the table rather than the type default
    pub known_exercise: bool,
}

/// Estimate calories for ad-hoc parameters
///
/// With `strict`, out-of-domain inputs are rejected instead of estimated.
pub fn calories_report(
    estimator: &CalorieEstimator,
    params: &CalorieCalculationParams,
    strict: bool,
) -> Result<CaloriesReport> {
    if strict {
        params.validate()?;
    }
    let known_exercise = params
        .exercise_name
        .as_deref()
        .is_some_and(is_known_exercise);
    if let (Some(name), false) = (params.exercise_name.as_deref(), known_exercise) {
        warn!(exercise = name, "no MET entry, using the {} default", params.exercise_type);
    }

    let estimate = estimator.estimate(params);
    Ok(CaloriesReport {
        kcal: estimate.kcal,
        method: estimate.method,
        mets: lookup_mets(params.exercise_name.as_deref(), params.exercise_type),
        known_exercise,
    })
}

impl fmt::Display for CaloriesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} kcal ({}, {} METs)", self.kcal, self.method, self.mets)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneRepMaxReport {
    pub weight_kg: f64,
    pub reps: u32,
    #[serde(flatten)]
    pub result: OneRepMaxResult,
}

/// Epley estimate for one lift
///
/// With `strict`, non-positive weight and zero reps are rejected.
pub fn one_rep_max_report(weight_kg: f64, reps: u32, strict: bool) -> Result<OneRepMaxReport> {
    let result = if strict {
        try_estimate_one_rep_max(weight_kg, reps)?
    } else {
        estimate_one_rep_max(weight_kg, reps)
    };
    Ok(OneRepMaxReport {
        weight_kg,
        reps,
        result,
    })
}

impl fmt::Display for OneRepMaxReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} kg x {} -> estimated 1RM {} kg ({})",
            self.weight_kg, self.reps, self.result.estimated_weight_kg, self.result.formula
        )
    }
}

// ============================================================================
// workout
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseLine {
    pub name: String,
    pub kcal: u32,
    pub method: Option<CalorieMethod>,
    pub one_rep_max: Option<OneRepMaxResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutSummary {
    pub date: NaiveDate,
    pub is_completed: bool,
    pub kcal: u32,
    pub exercises: Vec<ExerciseLine>,
    pub volume: VolumeAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutReport {
    pub workouts: Vec<WorkoutSummary>,
    pub total_kcal: u32,
}

/// Calories, volume and best lifts per workout, optionally for one day only
pub fn workout_report(
    log: &ActivityLog,
    estimator: &CalorieEstimator,
    date: Option<NaiveDate>,
) -> WorkoutReport {
    let aggregator = WorkoutCalorieAggregator::new(estimator.clone()).with_body_weight(log.latest_weight_kg());

    let workouts: Vec<WorkoutSummary> = log
        .workouts
        .iter()
        .filter(|w| date.map_or(true, |d| w.date == d))
        .map(|workout| {
            let exercises: Vec<ExerciseLine> = workout
                .exercises
                .iter()
                .map(|we| {
                    let estimate = aggregator.exercise_estimate(we);
                    ExerciseLine {
                        name: we.exercise.name.clone(),
                        kcal: estimate.map(|e| e.kcal).unwrap_or(0),
                        method: estimate.map(|e| e.method),
                        one_rep_max: best_set_one_rep_max(&we.sets),
                    }
                })
                .collect();

            WorkoutSummary {
                date: workout.date,
                is_completed: workout.is_completed,
                kcal: saturating_sum(exercises.iter().map(|e| e.kcal)),
                exercises,
                volume: analyze_volume(workout),
            }
        })
        .collect();

    debug!(workouts = workouts.len(), "built workout report");
    WorkoutReport {
        total_kcal: saturating_sum(workouts.iter().map(|w| w.kcal)),
        workouts,
    }
}

impl fmt::Display for WorkoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.workouts.is_empty() {
            return writeln!(f, "No workouts");
        }
        for workout in &self.workouts {
            let status = if workout.is_completed { "" } else { " (in progress)" };
            writeln!(
                f,
                "{}{}: {} kcal, volume {} kg over {} sets",
                workout.date, status, workout.kcal, workout.volume.total_volume, workout.volume.total_sets
            )?;
            for exercise in &workout.exercises {
                let method = or_dash(exercise.method, "");
                let one_rm = match &exercise.one_rep_max {
                    Some(r) => format!(", 1RM {} kg", r.estimated_weight_kg),
                    None => String::new(),
                };
                writeln!(f, "  {:<24} {:>5} kcal [{}]{}", exercise.name, exercise.kcal, method, one_rm)?;
            }
        }
        writeln!(f, "Total: {} kcal", self.total_kcal)
    }
}

// ============================================================================
// lifts / summary
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LiftsReport(pub OneRepMaxHistory);

pub fn lifts_report(log: &ActivityLog, exercise_name: &str) -> LiftsReport {
    LiftsReport(one_rep_max_history(&log.workouts, exercise_name))
}

impl fmt::Display for LiftsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = &self.0;
        if h.history.is_empty() {
            return write!(f, "No working sets of {}", h.exercise_name);
        }
        write!(f, "{}: best estimated 1RM {} kg", h.exercise_name, h.max_estimated_1rm)?;
        for entry in &h.history {
            write!(
                f,
                "\n  {}  {} kg x {} -> {} kg",
                entry.date, entry.weight_kg, entry.reps, entry.estimated_1rm
            )?;
            if let Some(rpe) = entry.rpe {
                write!(f, " @ RPE {}", rpe)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SummaryReport(pub UserSummary);

pub fn summary_report(log: &ActivityLog) -> SummaryReport {
    SummaryReport(user_summary(log))
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.0;
        writeln!(f, "Workouts:       {}", s.total_workouts)?;
        writeln!(f, "Working sets:   {}", s.total_sets)?;
        writeln!(f, "Total volume:   {} kg", s.total_volume)?;
        write!(f, "Latest workout: {}", or_dash(s.latest_workout_date, ""))
    }
}

// ============================================================================
// streak / calendar
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakReport {
    pub date: NaiveDate,
    pub streak: u32,
    pub tier: StreakTier,
}

pub fn streak_report(log: &ActivityLog, settings: &CalendarSettings, date: NaiveDate) -> StreakReport {
    let streak = consecutive_days_ending_at_capped(&log.workouts, date, settings.streak_cap);
    StreakReport {
        date,
        streak,
        tier: StreakTier::from_streak(streak),
    }
}

impl fmt::Display for StreakReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = if self.streak == 1 { "day" } else { "days" };
        write!(f, "{}: {} {} in a row", self.date, self.streak, unit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarReport {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

pub fn calendar_report(
    log: &ActivityLog,
    settings: &CalendarSettings,
    year: i32,
    month: u32,
) -> Result<CalendarReport> {
    Ok(CalendarReport {
        year,
        month,
        days: month_grid(&log.workouts, year, month, settings)?,
    })
}

fn tier_mark(tier: StreakTier) -> char {
    match tier {
        StreakTier::Rest => ' ',
        StreakTier::Light => '.',
        StreakTier::Medium => '+',
        StreakTier::Strong => '#',
    }
}

impl fmt::Display for CalendarReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}-{:02}", self.year, self.month)?;
        writeln!(f, " Su  Mo  Tu  We  Th  Fr  Sa")?;
        for week in self.days.chunks(7) {
            let line: Vec<String> = week
                .iter()
                .map(|day| {
                    if day.is_current_month {
                        format!("{:>3}{}", chrono::Datelike::day(&day.date), tier_mark(day.tier))
                    } else {
                        "    ".to_string()
                    }
                })
                .collect();
            writeln!(f, "{}", line.concat().trim_end())?;
        }
        write!(f, "(. 1-2 days  + 3-6 days  # 7+ days)")
    }
}

// ============================================================================
// dashboard / body
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetLine {
    pub id: WidgetId,
    pub title: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub stats: DashboardStats,
    pub widgets: Vec<WidgetLine>,
}

pub fn dashboard_report(
    log: &ActivityLog,
    profile: &UserProfile,
    today: NaiveDate,
    estimator: &CalorieEstimator,
    config: &DashboardConfig,
) -> DashboardReport {
    let stats = compute_dashboard_stats(log, profile, today, estimator);
    let widgets = config
        .selected_widgets()
        .into_iter()
        .map(|def| WidgetLine {
            id: def.id,
            title: def.title,
            value: def.id.display(&stats),
        })
        .collect();
    DashboardReport { stats, widgets }
}

impl fmt::Display for DashboardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for widget in &self.widgets {
            writeln!(f, "{:<28} {}", widget.title, widget.value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BmiReport(pub BmiHistory);

pub fn bmi_report(log: &ActivityLog, height_cm: f64, today: NaiveDate, days: u32) -> Result<BmiReport> {
    Ok(BmiReport(bmi_history(&log.body_metrics, height_cm, today, days)?))
}

impl fmt::Display for BmiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = &self.0;
        write!(
            f,
            "BMI over {} days at {} cm: latest {} ({} records)",
            h.period_days,
            h.height_cm,
            or_dash(h.latest_bmi, ""),
            h.total_records
        )?;
        for entry in &h.history {
            write!(
                f,
                "\n  {}  {} kg  BMI {} ({:?})",
                entry.date, entry.body_weight_kg, entry.bmi, entry.bmi_category
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BodyReport(pub BodyAnalyticsSummary);

pub fn body_report(log: &ActivityLog, profile: &UserProfile, today: NaiveDate) -> BodyReport {
    BodyReport(summarize_body_metrics(&log.body_metrics, profile, today))
}

impl fmt::Display for BodyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.0;
        writeln!(f, "Weight:        {}", or_dash(s.latest_weight, " kg"))?;
        writeln!(f, "BMI:           {}", or_dash(s.latest_bmi, ""))?;
        writeln!(f, "30-day change: {}", or_dash(s.weight_change_30days, " kg"))?;
        if let Some(range) = s.ideal_weight_range {
            writeln!(f, "Ideal weight:  {} - {} kg", range.min, range.max)?;
        }
        writeln!(f, "BMR:           {}", or_dash(s.bmr, " kcal"))?;
        if let Some(needs) = s.daily_calorie_needs {
            writeln!(
                f,
                "Daily needs:   {} / {} / {} / {} / {} kcal",
                needs.sedentary, needs.light, needs.moderate, needs.active, needs.very_active
            )?;
        }
        write!(f, "Body fat:      {:?} ({} records)", s.body_fat_trend, s.total_records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitlog_shared::{ExerciseType, Exercise, SetRecord, Workout, WorkoutExercise};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_calories_report_strict() {
        let params = CalorieCalculationParams::new(ExerciseType::Cardio)
            .with_weight(-1.0)
            .with_duration(600.0);
        let estimator = CalorieEstimator::default();
        assert!(calories_report(&estimator, &params, true).is_err());
        assert_eq!(calories_report(&estimator, &params, false).unwrap().kcal, 0);
    }

    #[test]
    fn test_one_rep_max_report() {
        let report = one_rep_max_report(100.0, 5, false).unwrap();
        assert_eq!(report.to_string(), "100 kg x 5 -> estimated 1RM 116.7 kg (Epley)");
        assert!(one_rep_max_report(100.0, 0, true).is_err());
    }

    #[test]
    fn test_one_rep_max_report_bodyweight() {
        let report = one_rep_max_report(0.0, 12, false).unwrap();
        assert_eq!(report.result.estimated_weight_kg, 0.0);
        assert!(one_rep_max_report(0.0, 12, true).is_err());
    }

    #[test]
    fn test_calories_report_flags_unknown_exercise() {
        let estimator = CalorieEstimator::default();
        let known = CalorieCalculationParams::new(ExerciseType::Cardio)
            .with_name("Running")
            .with_duration(3600.0);
        let report = calories_report(&estimator, &known, false).unwrap();
        assert!(report.known_exercise);
        assert_eq!(report.mets, 8.0);

        let unknown = CalorieCalculationParams::new(ExerciseType::Cardio)
            .with_name("underwater hockey")
            .with_duration(3600.0);
        let report = calories_report(&estimator, &unknown, false).unwrap();
        assert!(!report.known_exercise);
        assert_eq!(report.mets, 6.0);
    }

    #[test]
    fn test_calendar_rendering() {
        let log = ActivityLog {
            workouts: vec![Workout::new(
                date(2025, 3, 1),
                vec![WorkoutExercise::new(
                    Exercise::new("Squat", "legs", ExerciseType::Strength),
                    vec![SetRecord::strength(1, 100.0, 5)],
                )],
            )],
            body_metrics: vec![],
        };
        let report = calendar_report(&log, &CalendarSettings::default(), 2025, 3).unwrap();
        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "2025-03");
        // March 1st is a Saturday, last column of the first row
        assert!(lines[2].ends_with("  1."));
    }
}
