//! Workout-level aggregation
//!
//! Rolls logged sets up into per-exercise totals, feeds those into the
//! calorie selector, and sums the results per workout and per day. Also
//! provides the training-volume breakdown shown for a workout.
//!
//! Integer totals saturate at `u32::MAX` instead of wrapping.

use crate::calories::{CalorieCalculationParams, CalorieEstimate, CalorieEstimator};
use crate::models::{ActivityLog, ExerciseType, SetKind, SetRecord, StrengthSet, Workout, WorkoutExercise};
use crate::round1;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// Per-exercise totals
// ============================================================================

/// Sums over the sets of one exercise
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExerciseTotals {
    pub set_count: usize,
    pub total_duration_seconds: f64,
    pub total_distance_km: f64,
    /// Σ weight × reps
    pub total_weight_kg: f64,
    pub total_reps: u32,
    /// Mean over the sets that reported a heart rate; 0 when none did
    pub avg_heart_rate: f64,
}

impl ExerciseTotals {
    pub fn from_sets(sets: &[SetRecord]) -> Self {
        let mut totals = ExerciseTotals {
            set_count: sets.len(),
            ..Default::default()
        };
        let mut heart_rate_sum = 0.0;
        let mut heart_rate_sets = 0u32;

        for set in sets {
            match &set.kind {
                SetKind::Strength(s) => {
                    totals.total_weight_kg += s.weight_kg * s.reps as f64;
                    totals.total_reps = totals.total_reps.saturating_add(s.reps);
                }
                SetKind::Cardio(c) => {
                    totals.total_duration_seconds += c.duration_seconds.unwrap_or(0) as f64;
                    totals.total_distance_km += c.distance_km.unwrap_or(0.0);
                    if let Some(hr) = c.avg_heart_rate.filter(|hr| *hr > 0) {
                        heart_rate_sum += hr as f64;
                        heart_rate_sets += 1;
                    }
                }
            }
        }

        if heart_rate_sets > 0 {
            totals.avg_heart_rate = heart_rate_sum / heart_rate_sets as f64;
        }
        totals
    }

    /// Duration to estimate over
    ///
    /// Strength work with nothing logged is assumed to take
    /// `seconds_per_set` for every set.
    pub fn effective_duration(&self, exercise_type: ExerciseType, seconds_per_set: u32) -> f64 {
        if exercise_type == ExerciseType::Strength && self.total_duration_seconds == 0.0 {
            (self.set_count as u64 * seconds_per_set as u64) as f64
        } else {
            self.total_duration_seconds
        }
    }
}

// ============================================================================
// Calorie aggregation
// ============================================================================

/// Sums calorie estimates over exercises, workouts and days
#[derive(Debug, Clone, Default)]
pub struct WorkoutCalorieAggregator {
    estimator: CalorieEstimator,
    body_weight_kg: Option<f64>,
}

impl WorkoutCalorieAggregator {
    pub fn new(estimator: CalorieEstimator) -> Self {
        Self {
            estimator,
            body_weight_kg: None,
        }
    }

    /// Use this body weight instead of the configured default
    pub fn with_body_weight(mut self, body_weight_kg: Option<f64>) -> Self {
        self.body_weight_kg = body_weight_kg;
        self
    }

    /// Calculator inputs for one exercise, or `None` when it has no sets
    pub fn exercise_params(&self, workout_exercise: &WorkoutExercise) -> Option<CalorieCalculationParams> {
        if workout_exercise.sets.is_empty() {
            return None;
        }

        let exercise = &workout_exercise.exercise;
        let totals = ExerciseTotals::from_sets(&workout_exercise.sets);
        let duration = totals.effective_duration(
            exercise.exercise_type,
            self.estimator.settings().strength_seconds_per_set,
        );

        Some(CalorieCalculationParams {
            weight_kg: self.body_weight_kg,
            duration_seconds: Some(duration),
            distance_km: Some(totals.total_distance_km),
            avg_heart_rate: (totals.avg_heart_rate > 0.0).then_some(totals.avg_heart_rate),
            exercise_type: exercise.exercise_type,
            exercise_name: Some(exercise.name.clone()),
            total_weight_kg: Some(totals.total_weight_kg),
            total_reps: Some(totals.total_reps as f64),
        })
    }

    pub fn exercise_estimate(&self, workout_exercise: &WorkoutExercise) -> Option<CalorieEstimate> {
        let params = self.exercise_params(workout_exercise)?;
        let estimate = self.estimator.estimate(&params);
        debug!(
            exercise = %workout_exercise.exercise.name,
            sets = workout_exercise.sets.len(),
            duration_seconds = params.duration_seconds.unwrap_or(0.0),
            method = %estimate.method,
            kcal = estimate.kcal,
            "estimated exercise calories"
        );
        Some(estimate)
    }

    /// Calories for one exercise; zero when it has no sets
    pub fn exercise_calories(&self, workout_exercise: &WorkoutExercise) -> u32 {
        self.exercise_estimate(workout_exercise)
            .map(|e| e.kcal)
            .unwrap_or(0)
    }

    /// Sum of per-exercise estimates
    pub fn total(&self, exercises: &[WorkoutExercise]) -> u32 {
        saturating_sum(exercises.iter().map(|we| self.exercise_calories(we)))
    }

    pub fn workout(&self, workout: &Workout) -> u32 {
        self.total(&workout.exercises)
    }

    /// Calories across every workout on `date`
    pub fn day<'a>(&self, workouts: impl IntoIterator<Item = &'a Workout>, date: NaiveDate) -> u32 {
        saturating_sum(
            workouts
                .into_iter()
                .filter(|w| w.date == date)
                .map(|w| self.workout(w)),
        )
    }
}

/// Sum of kilocalorie figures, clamped at `u32::MAX`
pub fn saturating_sum(values: impl IntoIterator<Item = u32>) -> u32 {
    values.into_iter().fold(0, u32::saturating_add)
}

/// Total calories for a workout's exercises with default settings and weight
pub fn aggregate_workout_calories(exercises: &[WorkoutExercise]) -> u32 {
    WorkoutCalorieAggregator::default().total(exercises)
}

// ============================================================================
// Training volume
// ============================================================================

/// Volume for one exercise within a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseVolume {
    pub exercise_name: String,
    pub muscle_group: String,
    pub sets: u32,
    pub total_volume: f64,
    pub total_reps: u32,
    /// Mean load per set, one decimal
    pub avg_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeAnalysis {
    pub workout_date: NaiveDate,
    /// One decimal
    pub total_volume: f64,
    pub total_sets: u32,
    pub exercise_breakdown: Vec<ExerciseVolume>,
}

fn working_strength_sets(
    workout: &Workout,
) -> impl Iterator<Item = (&WorkoutExercise, &SetRecord, &StrengthSet)> {
    workout.exercises.iter().flat_map(|we| {
        we.sets
            .iter()
            .filter(|s| !s.is_warmup)
            .filter_map(move |s| s.as_strength().map(|strength| (we, s, strength)))
    })
}

/// Break a workout's volume down by exercise
///
/// Only working (non-warm-up) strength sets count. Exercises appear in the
/// order they were first performed; repeated entries of the same exercise
/// are merged.
pub fn analyze_volume(workout: &Workout) -> VolumeAnalysis {
    let mut breakdown: Vec<ExerciseVolume> = Vec::new();
    let mut weight_sums: Vec<f64> = Vec::new();
    let mut total_volume = 0.0;
    let mut total_sets = 0;

    for (we, set, strength) in working_strength_sets(workout) {
        let volume = set.volume_kg();
        let index = match breakdown
            .iter()
            .position(|e| e.exercise_name == we.exercise.name)
        {
            Some(i) => i,
            None => {
                breakdown.push(ExerciseVolume {
                    exercise_name: we.exercise.name.clone(),
                    muscle_group: we.exercise.muscle_group.clone(),
                    sets: 0,
                    total_volume: 0.0,
                    total_reps: 0,
                    avg_weight: 0.0,
                });
                weight_sums.push(0.0);
                breakdown.len() - 1
            }
        };

        let entry = &mut breakdown[index];
        entry.sets += 1;
        entry.total_volume += volume;
        entry.total_reps = entry.total_reps.saturating_add(strength.reps);
        weight_sums[index] += strength.weight_kg;

        total_volume += volume;
        total_sets += 1;
    }

    for (entry, weight_sum) in breakdown.iter_mut().zip(weight_sums) {
        entry.avg_weight = round1(weight_sum / entry.sets as f64);
    }

    VolumeAnalysis {
        workout_date: workout.date,
        total_volume: round1(total_volume),
        total_sets,
        exercise_breakdown: breakdown,
    }
}

/// Unrounded Σ weight × reps over working strength sets of many workouts
pub fn training_volume<'a>(workouts: impl IntoIterator<Item = &'a Workout>) -> f64 {
    workouts
        .into_iter()
        .flat_map(working_strength_sets)
        .map(|(_, set, _)| set.volume_kg())
        .sum()
}

// ============================================================================
// Lifetime summary
// ============================================================================

/// Lifetime training figures for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Every logged workout, completed or not
    pub total_workouts: usize,
    /// Non-warm-up sets of any kind
    pub total_sets: usize,
    /// One decimal
    pub total_volume: f64,
    pub latest_workout_date: Option<NaiveDate>,
}

pub fn user_summary(log: &ActivityLog) -> UserSummary {
    UserSummary {
        total_workouts: log.workouts.len(),
        total_sets: log
            .workouts
            .iter()
            .flat_map(Workout::sets)
            .filter(|(_, set)| !set.is_warmup)
            .count(),
        total_volume: round1(training_volume(&log.workouts)),
        latest_workout_date: log.workouts.iter().map(|w| w.date).max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calories::{CalorieMethod, CalorieSettings};
    use crate::models::{CardioSet, Exercise};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn strength_exercise(name: &str, sets: Vec<SetRecord>) -> WorkoutExercise {
        WorkoutExercise::new(Exercise::new(name, "chest", ExerciseType::Strength), sets)
    }

    fn cardio_exercise(name: &str, sets: Vec<SetRecord>) -> WorkoutExercise {
        WorkoutExercise::new(Exercise::new(name, "cardio", ExerciseType::Cardio), sets)
    }

    fn interval(seconds: u32, km: Option<f64>, hr: Option<u32>) -> CardioSet {
        CardioSet {
            duration_seconds: Some(seconds),
            distance_km: km,
            incline_percent: None,
            avg_heart_rate: hr,
        }
    }

    #[test]
    fn test_strength_duration_inferred_per_set() {
        let exercises = vec![strength_exercise(
            "Cable Crossover",
            vec![
                SetRecord::strength(1, 20.0, 12),
                SetRecord::strength(2, 20.0, 12),
                SetRecord::strength(3, 20.0, 10),
            ],
        )];
        // 3 × 600s, × 0.35, 3.5 METs, 70kg
        assert_eq!(aggregate_workout_calories(&exercises), 43);
    }

    #[test]
    fn test_seconds_per_set_setting() {
        let estimator = CalorieEstimator::new(CalorieSettings {
            strength_seconds_per_set: 300,
            ..Default::default()
        });
        let aggregator = WorkoutCalorieAggregator::new(estimator);
        let we = strength_exercise("Cable Crossover", vec![SetRecord::strength(1, 20.0, 12); 6]);
        let params = aggregator.exercise_params(&we).unwrap();
        assert_eq!(params.duration_seconds, Some(1800.0));
    }

    #[test]
    fn test_empty_exercises_skipped() {
        let exercises = vec![
            strength_exercise("Bench Press", vec![]),
            cardio_exercise("running", vec![]),
        ];
        assert_eq!(aggregate_workout_calories(&exercises), 0);
        assert_eq!(aggregate_workout_calories(&[]), 0);
    }

    #[test]
    fn test_heart_rate_averaged_over_reporting_sets() {
        let sets = vec![
            SetRecord::cardio(1, interval(600, None, Some(140))),
            SetRecord::cardio(2, interval(600, None, None)),
            SetRecord::cardio(3, interval(600, None, Some(160))),
        ];
        let totals = ExerciseTotals::from_sets(&sets);
        assert_eq!(totals.avg_heart_rate, 150.0);
        assert_eq!(totals.total_duration_seconds, 1800.0);

        let aggregator = WorkoutCalorieAggregator::default().with_body_weight(Some(70.0));
        let estimate = aggregator
            .exercise_estimate(&cardio_exercise("running", sets))
            .unwrap();
        assert_eq!(estimate.method, CalorieMethod::HeartRate);
        assert_eq!(estimate.kcal, 427);
    }

    #[test]
    fn test_cardio_distance_summed() {
        let sets = vec![
            SetRecord::cardio(1, interval(900, Some(2.5), None)),
            SetRecord::cardio(2, interval(900, Some(2.5), None)),
        ];
        let aggregator = WorkoutCalorieAggregator::default().with_body_weight(Some(60.0));
        let estimate = aggregator
            .exercise_estimate(&cardio_exercise("running", sets))
            .unwrap();
        // 5km in 30min → 10km/h → factor 1.0
        assert_eq!(estimate.method, CalorieMethod::Distance);
        assert_eq!(estimate.kcal, 300);
    }

    #[test]
    fn test_workout_total_is_sum_of_exercises() {
        let lift = strength_exercise("bench press", vec![SetRecord::strength(1, 80.0, 8); 3]);
        let run = cardio_exercise("running", vec![SetRecord::cardio(1, interval(3600, None, None))]);
        let aggregator = WorkoutCalorieAggregator::default();
        let workout = Workout::new(date(2025, 3, 3), vec![lift.clone(), run.clone()]);
        assert_eq!(
            aggregator.workout(&workout),
            aggregator.exercise_calories(&lift) + aggregator.exercise_calories(&run)
        );
        assert_eq!(aggregator.exercise_calories(&run), 560);
    }

    #[test]
    fn test_day_total() {
        let run = cardio_exercise("running", vec![SetRecord::cardio(1, interval(1800, None, None))]);
        let workouts = vec![
            Workout::new(date(2025, 3, 3), vec![run.clone()]),
            Workout::new(date(2025, 3, 3), vec![run.clone()]),
            Workout::new(date(2025, 3, 4), vec![run]),
        ];
        let aggregator = WorkoutCalorieAggregator::default();
        assert_eq!(aggregator.day(&workouts, date(2025, 3, 3)), 560);
        assert_eq!(aggregator.day(&workouts, date(2025, 3, 5)), 0);
    }

    #[test]
    fn test_volume_breakdown() {
        let workout = Workout::new(
            date(2025, 3, 3),
            vec![
                strength_exercise(
                    "Bench Press",
                    vec![
                        SetRecord::strength(1, 40.0, 10).warmup(),
                        SetRecord::strength(2, 80.0, 8),
                        SetRecord::strength(3, 85.0, 6),
                    ],
                ),
                cardio_exercise("running", vec![SetRecord::cardio(1, interval(600, Some(2.0), None))]),
                strength_exercise("Bench Press", vec![SetRecord::strength(1, 70.0, 10)]),
            ],
        );

        let analysis = analyze_volume(&workout);
        assert_eq!(analysis.total_sets, 3);
        assert_eq!(analysis.total_volume, 640.0 + 510.0 + 700.0);
        assert_eq!(analysis.exercise_breakdown.len(), 1);

        let bench = &analysis.exercise_breakdown[0];
        assert_eq!(bench.sets, 3);
        assert_eq!(bench.total_reps, 24);
        assert_eq!(bench.avg_weight, 78.3);
        assert_eq!(training_volume([&workout]), 1850.0);
    }

    #[test]
    fn test_huge_durations_saturate() {
        let endless = vec![
            SetRecord::cardio(
                1,
                CardioSet {
                    duration_seconds: Some(u32::MAX),
                    ..Default::default()
                }
            );
            8
        ];
        let exercises = vec![
            cardio_exercise("running", endless.clone()),
            cardio_exercise("cycling", endless),
        ];

        let aggregator = WorkoutCalorieAggregator::default();
        assert!(aggregator.exercise_calories(&exercises[1]) > 0);
        assert_eq!(aggregate_workout_calories(&exercises), u32::MAX);

        let workouts = vec![
            Workout::new(date(2025, 3, 3), exercises.clone()),
            Workout::new(date(2025, 3, 3), exercises),
        ];
        assert_eq!(aggregator.day(&workouts, date(2025, 3, 3)), u32::MAX);
    }

    #[test]
    fn test_huge_rep_counts_saturate() {
        let sets = vec![SetRecord::strength(1, 1.0, u32::MAX), SetRecord::strength(2, 1.0, u32::MAX)];
        assert_eq!(ExerciseTotals::from_sets(&sets).total_reps, u32::MAX);

        let workout = Workout::new(date(2025, 3, 3), vec![strength_exercise("Plank", sets)]);
        assert_eq!(analyze_volume(&workout).exercise_breakdown[0].total_reps, u32::MAX);
    }

    #[test]
    fn test_user_summary() {
        let mut unfinished = Workout::new(
            date(2025, 3, 9),
            vec![cardio_exercise("running", vec![SetRecord::cardio(1, interval(600, None, None))])],
        );
        unfinished.is_completed = false;
        let log = ActivityLog {
            workouts: vec![
                Workout::new(
                    date(2025, 3, 3),
                    vec![strength_exercise(
                        "Bench Press",
                        vec![SetRecord::strength(1, 40.0, 10).warmup(), SetRecord::strength(2, 80.5, 5)],
                    )],
                ),
                unfinished,
            ],
            body_metrics: vec![],
        };

        let summary = user_summary(&log);
        assert_eq!(summary.total_workouts, 2);
        assert_eq!(summary.total_sets, 2);
        assert_eq!(summary.total_volume, 402.5);
        assert_eq!(summary.latest_workout_date, Some(date(2025, 3, 9)));

        let empty = user_summary(&ActivityLog::default());
        assert_eq!(empty.total_sets, 0);
        assert_eq!(empty.latest_workout_date, None);
    }
}
