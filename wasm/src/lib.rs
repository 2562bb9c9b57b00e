//! Fitlog WASM Module
//!
//! Browser bindings for the calculation core. Structured inputs and outputs
//! cross the boundary as JSON strings; failures surface as a string
//! `JsValue` carrying the error message.

use chrono::NaiveDate;
use fitlog_shared::body_metrics::{self, Gender, UserProfile};
use fitlog_shared::calendar::{self, CalendarSettings};
use fitlog_shared::dashboard::{self, WidgetFormat};
use fitlog_shared::{
    ActivityLog, CalcError, CalorieCalculationParams, CalorieEstimator, ExerciseType,
    WorkoutExercise,
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use wasm_bindgen::prelude::*;

#[derive(Error, Debug)]
pub enum BindingError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date: {0}")]
    Date(#[from] chrono::ParseError),

    #[error(transparent)]
    Calc(#[from] CalcError),
}

impl From<BindingError> for JsValue {
    fn from(err: BindingError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

type BindingResult<T> = Result<T, BindingError>;

fn from_json<T: DeserializeOwned>(json: &str) -> BindingResult<T> {
    Ok(serde_json::from_str(json)?)
}

fn parse_date(value: &str) -> BindingResult<NaiveDate> {
    Ok(value.trim().parse::<NaiveDate>()?)
}

fn parse_exercise_type(value: &str) -> BindingResult<ExerciseType> {
    value
        .parse()
        .map_err(|e: String| CalcError::InvalidInput(e).into())
}

// ============================================================================
// Calories
// ============================================================================

fn lookup_mets_impl(exercise_name: Option<&str>, exercise_type: &str) -> BindingResult<f64> {
    let exercise_type = parse_exercise_type(exercise_type)?;
    Ok(fitlog_shared::lookup_mets(exercise_name, exercise_type))
}

fn estimate_calories_impl(params_json: &str) -> BindingResult<String> {
    let params: CalorieCalculationParams = from_json(params_json)?;
    let estimate = CalorieEstimator::default().estimate(&params);
    Ok(serde_json::to_string(&estimate)?)
}

fn workout_calories_impl(exercises_json: &str, body_weight_kg: Option<f64>) -> BindingResult<u32> {
    let exercises: Vec<WorkoutExercise> = from_json(exercises_json)?;
    let aggregator = fitlog_shared::WorkoutCalorieAggregator::default().with_body_weight(body_weight_kg);
    Ok(aggregator.total(&exercises))
}

/// MET value for an exercise name, falling back to the type default
#[wasm_bindgen]
pub fn lookup_mets(exercise_name: Option<String>, exercise_type: &str) -> Result<f64, JsValue> {
    Ok(lookup_mets_impl(exercise_name.as_deref(), exercise_type)?)
}

/// Estimate calories from a `CalorieCalculationParams` JSON object
///
/// Returns `{"kcal": n, "method": "..."}`.
#[wasm_bindgen]
pub fn estimate_calories(params_json: &str) -> Result<String, JsValue> {
    Ok(estimate_calories_impl(params_json)?)
}

/// Total calories for a JSON array of workout exercises
#[wasm_bindgen]
pub fn workout_calories(exercises_json: &str, body_weight_kg: Option<f64>) -> Result<u32, JsValue> {
    Ok(workout_calories_impl(exercises_json, body_weight_kg)?)
}

// ============================================================================
// Strength
// ============================================================================

fn estimate_one_rep_max_impl(weight_kg: f64, reps: u32) -> BindingResult<String> {
    let result = fitlog_shared::estimate_one_rep_max(weight_kg, reps);
    Ok(serde_json::to_string(&result)?)
}

/// Epley one-rep max as `{"estimated_weight_kg": w, "formula": "..."}`
#[wasm_bindgen]
pub fn estimate_one_rep_max(weight_kg: f64, reps: u32) -> Result<String, JsValue> {
    Ok(estimate_one_rep_max_impl(weight_kg, reps)?)
}

// ============================================================================
// Calendar
// ============================================================================

fn consecutive_days_impl(dates_json: &str, target_date: &str) -> BindingResult<u32> {
    let raw: Vec<String> = from_json(dates_json)?;
    let days = raw
        .iter()
        .map(|s| calendar::parse_day(s))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(calendar::consecutive_days_ending_at(&days, parse_date(target_date)?))
}

fn month_grid_impl(dates_json: &str, year: i32, month: u32) -> BindingResult<String> {
    let raw: Vec<String> = from_json(dates_json)?;
    let days = raw
        .iter()
        .map(|s| calendar::parse_day(s))
        .collect::<Result<Vec<_>, _>>()?;
    let grid = calendar::month_grid(&days, year, month, &CalendarSettings::default())?;
    Ok(serde_json::to_string(&grid)?)
}

/// Streak ending at `target_date` from a JSON array of date strings
#[wasm_bindgen]
pub fn consecutive_days(dates_json: &str, target_date: &str) -> Result<u32, JsValue> {
    Ok(consecutive_days_impl(dates_json, target_date)?)
}

/// Six-week month view as a JSON array of cells
#[wasm_bindgen]
pub fn month_grid(dates_json: &str, year: i32, month: u32) -> Result<String, JsValue> {
    Ok(month_grid_impl(dates_json, year, month)?)
}

// ============================================================================
// Dashboard
// ============================================================================

fn format_widget_value_impl(value: Option<f64>, format: &str) -> BindingResult<String> {
    let format: WidgetFormat = serde_json::from_value(serde_json::Value::String(format.to_string()))?;
    Ok(dashboard::format_value(value, format))
}

fn dashboard_stats_impl(log_json: &str, profile_json: &str, today: &str) -> BindingResult<String> {
    let log: ActivityLog = from_json(log_json)?;
    let profile: UserProfile = from_json(profile_json)?;
    let stats =
        dashboard::compute_dashboard_stats(&log, &profile, parse_date(today)?, &CalorieEstimator::default());
    Ok(serde_json::to_string(&stats)?)
}

#[wasm_bindgen]
pub fn format_widget_value(value: Option<f64>, format: &str) -> Result<String, JsValue> {
    Ok(format_widget_value_impl(value, format)?)
}

/// Dashboard statistics for an `ActivityLog` and `UserProfile`
#[wasm_bindgen]
pub fn dashboard_stats(log_json: &str, profile_json: &str, today: &str) -> Result<String, JsValue> {
    Ok(dashboard_stats_impl(log_json, profile_json, today)?)
}

// ============================================================================
// Body metrics
// ============================================================================

/// BMI from weight (kg) and height (cm); 0 for a non-positive height
#[wasm_bindgen]
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    body_metrics::calculate_bmi(weight_kg, height_cm).unwrap_or(0.0)
}

fn calculate_bmr_impl(weight_kg: f64, height_cm: f64, age_years: u32, gender: &str) -> BindingResult<Option<f64>> {
    let gender: Gender = gender
        .parse()
        .map_err(|e: String| BindingError::from(CalcError::InvalidInput(e)))?;
    Ok(body_metrics::calculate_bmr(weight_kg, height_cm, age_years, gender))
}

/// Mifflin-St Jeor BMR; `undefined` for gender "other"
#[wasm_bindgen]
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, gender: &str) -> Result<Option<f64>, JsValue> {
    Ok(calculate_bmr_impl(weight_kg, height_cm, age_years, gender)?)
}
