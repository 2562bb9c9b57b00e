//! Metabolic equivalent (MET) reference values
//!
//! A fixed lookup from exercise name to MET value. Names that are not in the
//! table fall back to a per-family default, so lookup never fails.

use crate::models::ExerciseType;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// MET value used for strength exercises missing from the table
pub const DEFAULT_STRENGTH_METS: f64 = 3.5;

/// MET value used for cardio exercises missing from the table
pub const DEFAULT_CARDIO_METS: f64 = 6.0;

static METS_TABLE: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        // Strength
        ("ベンチプレス", 3.5),
        ("bench press", 3.5),
        ("スクワット", 5.0),
        ("squat", 5.0),
        ("デッドリフト", 6.0),
        ("deadlift", 6.0),
        ("プルアップ", 6.0),
        ("pull-up", 6.0),
        ("ショルダープレス", 5.0),
        ("shoulder press", 5.0),
        ("バーベルロウ", 5.0),
        ("barbell row", 5.0),
        ("レッグプレス", 4.0),
        ("leg press", 4.0),
        ("チェストフライ", 4.5),
        ("chest fly", 4.5),
        ("ラットプルダウン", 5.0),
        ("lat pulldown", 5.0),
        ("レッグカール", 3.5),
        ("leg curl", 3.5),
        ("レッグエクステンション", 3.5),
        ("leg extension", 3.5),
        ("ダンベルカール", 3.0),
        ("dumbbell curl", 3.0),
        ("筋トレ", DEFAULT_STRENGTH_METS),
        // Cardio
        ("ランニング", 8.0),
        ("running", 8.0),
        ("ジョギング", 7.0),
        ("jogging", 7.0),
        ("ウォーキング", 3.5),
        ("walking", 3.5),
        ("サイクリング", 7.5),
        ("cycling", 7.5),
        ("エリプティカル", 5.0),
        ("elliptical", 5.0),
        ("水泳", 8.0),
        ("swimming", 8.0),
        ("ローイング", 7.0),
        ("rowing", 7.0),
        ("有酸素運動", DEFAULT_CARDIO_METS),
    ]
    .into_iter()
    .collect()
});

/// Default MET value for an exercise family
pub fn default_mets(exercise_type: ExerciseType) -> f64 {
    match exercise_type {
        ExerciseType::Strength => DEFAULT_STRENGTH_METS,
        ExerciseType::Cardio => DEFAULT_CARDIO_METS,
    }
}

/// Look up the MET value for an exercise
///
/// Names are matched after trimming and lower-casing. Unknown or missing
/// names yield the family default.
pub fn lookup_mets(exercise_name: Option<&str>, exercise_type: ExerciseType) -> f64 {
    exercise_name
        .map(|name| name.trim().to_lowercase())
        .and_then(|key| METS_TABLE.get(key.as_str()).copied())
        .unwrap_or_else(|| default_mets(exercise_type))
}

/// Whether the table has an entry for this name
pub fn is_known_exercise(exercise_name: &str) -> bool {
    METS_TABLE.contains_key(exercise_name.trim().to_lowercase().as_str())
}
