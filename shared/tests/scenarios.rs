//! End-to-end checks through the public API

use chrono::{Duration, NaiveDate};
use fake::faker::lorem::en::Word;
use fake::Fake;
use fitlog_shared::calendar::consecutive_days_ending_at;
use fitlog_shared::mets::{DEFAULT_CARDIO_METS, DEFAULT_STRENGTH_METS};
use fitlog_shared::one_rep_max::OneRepMaxFormula;
use fitlog_shared::{
    aggregate_workout_calories, calculate_calories_by_distance, calculate_calories_by_heart_rate,
    calculate_calories_by_mets, calculate_optimal_calories, calculate_strength_calories,
    estimate_one_rep_max, lookup_mets, ActivityLog, CalorieCalculationParams, Exercise,
    ExerciseType, SetRecord, WorkoutExercise, STREAK_CAP,
};
use rstest::rstest;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[rstest]
#[case(ExerciseType::Strength, DEFAULT_STRENGTH_METS)]
#[case(ExerciseType::Cardio, DEFAULT_CARDIO_METS)]
fn met_fallback_for_missing_name(#[case] exercise_type: ExerciseType, #[case] expected: f64) {
    assert_eq!(lookup_mets(None, exercise_type), expected);
}

#[test]
fn met_fallback_for_unlisted_name() {
    let word: String = Word().fake();
    let name = format!("custom {}", word);
    assert_eq!(lookup_mets(Some(&name), ExerciseType::Strength), 3.5);
    assert_eq!(lookup_mets(Some(&name), ExerciseType::Cardio), 6.0);
}

#[test]
fn scenario_running_by_mets() {
    let params = CalorieCalculationParams::new(ExerciseType::Cardio)
        .with_weight(70.0)
        .with_duration(3600.0)
        .with_name("ランニング");
    assert_eq!(calculate_calories_by_mets(&params), 560);
}

#[test]
fn scenario_epley() {
    let result = estimate_one_rep_max(100.0, 5);
    assert_eq!(result.estimated_weight_kg, 116.7);
    assert_eq!(result.formula, OneRepMaxFormula::Epley);
}

#[test]
fn scenario_strength_without_duration() {
    let exercise = WorkoutExercise::new(
        Exercise::new("Cable Crossover", "chest", ExerciseType::Strength),
        (1..=3).map(|i| SetRecord::strength(i, 20.0, 12)).collect(),
    );
    assert_eq!(aggregate_workout_calories(&[exercise]), 43);
}

#[test]
fn scenario_empty_streak() {
    let records: Vec<NaiveDate> = Vec::new();
    assert_eq!(consecutive_days_ending_at(&records, date(2025, 1, 1)), 0);
}

#[test]
fn heart_rate_and_distance_fall_back_to_mets() {
    let base = CalorieCalculationParams::new(ExerciseType::Cardio)
        .with_weight(65.0)
        .with_duration(1500.0)
        .with_name("cycling");
    let mets = calculate_calories_by_mets(&base);

    assert_eq!(calculate_calories_by_heart_rate(&base.clone().with_heart_rate(0.0)), mets);
    assert_eq!(calculate_calories_by_distance(&base.clone().with_distance(0.0)), mets);
}

#[test]
fn negative_energy_clamps_to_zero() {
    let params = CalorieCalculationParams::new(ExerciseType::Cardio)
        .with_weight(-80.0)
        .with_duration(600.0)
        .with_name("rowing");
    assert!(params.validate().is_err());
    assert_eq!(calculate_calories_by_mets(&params), 0);
    assert_eq!(calculate_calories_by_distance(&params), 0);
    assert_eq!(calculate_strength_calories(&params), 0);
    assert_eq!(calculate_optimal_calories(&params), 0);
}

#[test]
fn streak_cap_and_break() {
    let target = date(2025, 3, 31);
    let long_run: Vec<NaiveDate> = (0..40).map(|i| target - Duration::days(i)).collect();
    assert_eq!(consecutive_days_ending_at(&long_run, target), STREAK_CAP);

    let gapped = vec![target, target - Duration::days(1), target - Duration::days(3)];
    assert_eq!(consecutive_days_ending_at(&gapped, target), 2);
}

#[test]
fn activity_log_from_json() {
    let json = r#"{
        "workouts": [
            {
                "date": "2025-04-02",
                "is_completed": true,
                "exercises": [
                    {
                        "exercise": {"name": "ランニング", "exercise_type": "cardio"},
                        "sets": [
                            {"set_index": 1, "type": "cardio", "duration_seconds": 1800, "avg_heart_rate": 150}
                        ]
                    },
                    {
                        "exercise": {"name": "Bench Press", "muscle_group": "chest", "exercise_type": "strength"},
                        "sets": [
                            {"set_index": 1, "type": "strength", "weight_kg": 60, "reps": 10, "is_warmup": true},
                            {"set_index": 2, "type": "strength", "weight_kg": 100, "reps": 5}
                        ]
                    }
                ]
            }
        ],
        "body_metrics": [{"date": "2025-04-01", "body_weight": 70.0}]
    }"#;

    let log: ActivityLog = serde_json::from_str(json).unwrap();
    assert_eq!(log.latest_weight_kg(), Some(70.0));

    let workout = &log.workouts[0];
    // 427 from heart rate, 3.5 × 70 × (1200 s × 0.35) = 29 from strength
    assert_eq!(aggregate_workout_calories(&workout.exercises), 427 + 29);
    assert_eq!(fitlog_shared::analyze_volume(workout).total_volume, 500.0);
}
