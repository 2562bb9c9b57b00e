//! Workout, set and body-metric records
//!
//! These are the shapes a caller maps the backend's records into before
//! handing them to the calculators. They are plain immutable values; nothing
//! in this crate stores or mutates them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ============================================================================
// Exercises
// ============================================================================

/// Exercise family; decides which calorie estimator applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseType {
    Strength,
    Cardio,
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseType::Strength => write!(f, "strength"),
            ExerciseType::Cardio => write!(f, "cardio"),
        }
    }
}

impl std::str::FromStr for ExerciseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strength" => Ok(ExerciseType::Strength),
            "cardio" => Ok(ExerciseType::Cardio),
            _ => Err(format!("Unknown exercise type: {}", s)),
        }
    }
}

/// Exercise definition as referenced from a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    #[serde(default)]
    pub muscle_group: String,
    pub exercise_type: ExerciseType,
}

impl Exercise {
    pub fn new(name: impl Into<String>, muscle_group: impl Into<String>, exercise_type: ExerciseType) -> Self {
        Self {
            name: name.into(),
            muscle_group: muscle_group.into(),
            exercise_type,
        }
    }
}

// ============================================================================
// Sets
// ============================================================================

/// Load and repetitions of a strength set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrengthSet {
    pub weight_kg: f64,
    pub reps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
}

/// Measurements of a cardio interval; every field is optional
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CardioSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incline_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_heart_rate: Option<u32>,
}

/// Payload of a set, keyed by exercise family
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SetKind {
    Strength(StrengthSet),
    Cardio(CardioSet),
}

/// One logged set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    /// 1-based position within the exercise
    pub set_index: u32,
    #[serde(default)]
    pub is_warmup: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(flatten)]
    pub kind: SetKind,
}

impl SetRecord {
    pub fn new(set_index: u32, kind: SetKind) -> Self {
        Self {
            set_index,
            is_warmup: false,
            note: None,
            kind,
        }
    }

    /// Working strength set without RPE
    pub fn strength(set_index: u32, weight_kg: f64, reps: u32) -> Self {
        Self::new(
            set_index,
            SetKind::Strength(StrengthSet {
                weight_kg,
                reps,
                rpe: None,
            }),
        )
    }

    pub fn cardio(set_index: u32, cardio: CardioSet) -> Self {
        Self::new(set_index, SetKind::Cardio(cardio))
    }

    /// Mark this set as a warm-up
    pub fn warmup(mut self) -> Self {
        self.is_warmup = true;
        self
    }

    pub fn as_strength(&self) -> Option<&StrengthSet> {
        match &self.kind {
            SetKind::Strength(set) => Some(set),
            SetKind::Cardio(_) => None,
        }
    }

    pub fn as_cardio(&self) -> Option<&CardioSet> {
        match &self.kind {
            SetKind::Cardio(set) => Some(set),
            SetKind::Strength(_) => None,
        }
    }

    /// Training volume (weight × reps); zero for cardio sets
    pub fn volume_kg(&self) -> f64 {
        self.as_strength()
            .map(|s| s.weight_kg * s.reps as f64)
            .unwrap_or(0.0)
    }
}

// ============================================================================
// Workouts
// ============================================================================

/// An exercise performed within a workout, with its sets in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub exercise: Exercise,
    #[serde(default)]
    pub sets: Vec<SetRecord>,
}

impl WorkoutExercise {
    pub fn new(exercise: Exercise, sets: Vec<SetRecord>) -> Self {
        Self { exercise, sets }
    }
}

/// A dated training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, alias = "workout_exercises")]
    pub exercises: Vec<WorkoutExercise>,
}

impl Workout {
    pub fn new(date: NaiveDate, exercises: Vec<WorkoutExercise>) -> Self {
        Self {
            date,
            note: None,
            is_completed: true,
            exercises,
        }
    }

    /// Iterate over every set of every exercise
    pub fn sets(&self) -> impl Iterator<Item = (&Exercise, &SetRecord)> {
        self.exercises
            .iter()
            .flat_map(|we| we.sets.iter().map(move |s| (&we.exercise, s)))
    }
}

// ============================================================================
// Body metrics
// ============================================================================

/// A body-weight / body-fat measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMetricRecord {
    pub date: NaiveDate,
    #[serde(default, alias = "body_weight", skip_serializing_if = "Option::is_none")]
    pub body_weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Everything a caller has fetched for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    #[serde(default)]
    pub workouts: Vec<Workout>,
    #[serde(default)]
    pub body_metrics: Vec<BodyMetricRecord>,
}

impl ActivityLog {
    /// Most recent body weight, if any measurement carries one
    pub fn latest_weight_kg(&self) -> Option<f64> {
        self.body_metrics
            .iter()
            .filter(|m| m.body_weight_kg.is_some())
            .max_by_key(|m| m.date)
            .and_then(|m| m.body_weight_kg)
    }
}

// ============================================================================
// Dated records
// ============================================================================

/// Anything that falls on a calendar day
///
/// Implementors drop any time-of-day component; two records on the same day
/// compare equal regardless of when during the day they were taken.
pub trait Dated {
    fn day(&self) -> NaiveDate;
}

impl Dated for NaiveDate {
    fn day(&self) -> NaiveDate {
        *self
    }
}

impl Dated for NaiveDateTime {
    fn day(&self) -> NaiveDate {
        self.date()
    }
}

impl Dated for DateTime<Utc> {
    fn day(&self) -> NaiveDate {
        self.date_naive()
    }
}

impl Dated for Workout {
    fn day(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for BodyMetricRecord {
    fn day(&self) -> NaiveDate {
        self.date
    }
}

impl<D: Dated + ?Sized> Dated for &D {
    fn day(&self) -> NaiveDate {
        (**self).day()
    }
}

/// Generic date-tagged payload
///
/// `date` deserializes from a plain date or any timestamp
/// [`parse_day`](crate::calendar::parse_day) accepts; only the day is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedRecord<T> {
    #[serde(deserialize_with = "deserialize_day")]
    pub date: NaiveDate,
    pub payload: T,
}

impl<T> Dated for DatedRecord<T> {
    fn day(&self) -> NaiveDate {
        self.date
    }
}

fn deserialize_day<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    crate::calendar::parse_day(&raw).map_err(serde::de::Error::custom)
}
